use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

use super::AudioBuffer;

/// Media type attached to exported WAV data.
pub const WAV_MEDIA_TYPE: &str = "audio/wav";

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to encode WAV data: {0}")]
    Encode(#[from] hound::Error),
    #[error("Failed to write WAV file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: hound::Error,
    },
}

/// Encode the buffer as a 32-bit float WAV held in memory.
pub fn encode_wav(buffer: &AudioBuffer) -> Result<Vec<u8>, EncodeError> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, export_spec(buffer))?;
        write_samples(&mut writer, buffer.samples())?;
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Write the buffer to `path` as a 32-bit float WAV.
pub fn write_wav(path: &Path, buffer: &AudioBuffer) -> Result<(), EncodeError> {
    let map_err = |source| EncodeError::WriteFile {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = WavWriter::create(path, export_spec(buffer)).map_err(map_err)?;
    write_samples(&mut writer, buffer.samples()).map_err(map_err)?;
    writer.finalize().map_err(map_err)
}

fn export_spec(buffer: &AudioBuffer) -> WavSpec {
    WavSpec {
        channels: buffer.channels().max(1),
        sample_rate: buffer.sample_rate().max(1),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    }
}

fn write_samples<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    samples: &[f32],
) -> Result<(), hound::Error> {
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    Ok(())
}
