use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, DecoderOptions},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use thiserror::Error;

use super::AudioBuffer;

/// Reasons an upload could not be turned into an [`AudioBuffer`].
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No registered container format recognized the data.
    #[error("Unsupported or unreadable audio in {origin}: {source}")]
    Probe {
        origin: String,
        source: SymphoniaError,
    },
    #[error("No decodable audio track in {0}")]
    NoTrack(String),
    #[error("Missing sample rate for {0}")]
    MissingSampleRate(String),
    #[error("Missing channel count for {0}")]
    MissingChannels(String),
    /// The track's codec has no decoder available.
    #[error("No decoder available for {origin}: {source}")]
    Codec {
        origin: String,
        source: SymphoniaError,
    },
    #[error("Packet read failed for {origin}: {source}")]
    Packet {
        origin: String,
        source: SymphoniaError,
    },
    #[error("Decode failed for {origin}: {source}")]
    Decode {
        origin: String,
        source: SymphoniaError,
    },
    #[error("Decoded 0 samples for {0}")]
    NoSamples(String),
}

/// Decode a file on disk, using its extension as the format hint.
pub fn decode_file(path: &Path) -> Result<AudioBuffer, DecodeError> {
    let file = File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let extension = path.extension().and_then(|ext| ext.to_str());
    decode_stream(mss, extension, &path.display().to_string())
}

/// Decode in-memory bytes, optionally hinted by a file extension such as `"mp3"`.
pub fn decode_bytes(bytes: Vec<u8>, extension: Option<&str>) -> Result<AudioBuffer, DecodeError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());
    decode_stream(mss, extension, "in-memory audio")
}

fn decode_stream(
    mss: MediaSourceStream,
    extension: Option<&str>,
    origin: &str,
) -> Result<AudioBuffer, DecodeError> {
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|source| DecodeError::Probe {
            origin: origin.to_string(),
            source,
        })?;
    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| DecodeError::NoTrack(origin.to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|layout| layout.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|source| DecodeError::Codec {
            origin: origin.to_string(),
            source,
        })?;

    let mut samples = Vec::new();
    let mut skipped_packets = 0usize;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(_)) => break,
            Err(source) => {
                return Err(DecodeError::Packet {
                    origin: origin.to_string(),
                    source,
                });
            }
        };
        if packet.track_id() != track_id {
            continue;
        }
        let audio_buf = match decoder.decode(&packet) {
            Ok(audio_buf) => audio_buf,
            Err(SymphoniaError::DecodeError(_)) => {
                skipped_packets += 1;
                continue;
            }
            Err(source) => {
                return Err(DecodeError::Decode {
                    origin: origin.to_string(),
                    source,
                });
            }
        };
        let spec = *audio_buf.spec();
        if sample_rate.is_none() {
            sample_rate = Some(spec.rate);
        }
        if channels.is_none() {
            channels = Some(spec.channels.count() as u16);
        }
        let mut sample_buf = SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        samples.extend_from_slice(sample_buf.samples());
    }

    if skipped_packets > 0 {
        tracing::warn!("Skipped {skipped_packets} corrupt packet(s) while decoding {origin}");
    }
    let sample_rate = sample_rate
        .filter(|rate| *rate > 0)
        .ok_or_else(|| DecodeError::MissingSampleRate(origin.to_string()))?;
    let channels = channels
        .filter(|count| *count > 0)
        .ok_or_else(|| DecodeError::MissingChannels(origin.to_string()))?;
    if samples.is_empty() {
        return Err(DecodeError::NoSamples(origin.to_string()));
    }

    let buffer = AudioBuffer::new(samples, sample_rate, channels);
    tracing::debug!(
        "Decoded {origin}: {} frames, {} Hz, {} channel(s)",
        buffer.frames(),
        sample_rate,
        channels
    );
    Ok(buffer)
}
