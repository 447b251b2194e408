//! Decoded audio buffers and the collaborators that move audio in and out of them.

mod buffer;
mod decode;
pub mod level;
mod wav;

pub(crate) use buffer::ms_to_frames;
pub use buffer::AudioBuffer;
pub use decode::{DecodeError, decode_bytes, decode_file};
pub use wav::{EncodeError, WAV_MEDIA_TYPE, encode_wav, write_wav};
