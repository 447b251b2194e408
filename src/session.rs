//! State for one uploaded recording: the staged upload, its decoded audio and
//! the latest analysis.
//!
//! A [`Session`] owns the temporary file backing the current upload. Replacing
//! the upload, calling [`Session::clear`], or dropping the session deletes it.
//! The segmenter and reassembler stay pure; the session only feeds them.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::audio::{
    AudioBuffer, DecodeError, EncodeError, WAV_MEDIA_TYPE, decode_file, encode_wav,
};
use crate::config::{ProcessingConfig, RemovalPolicy, SEEK_STEP_MS};
use crate::reassemble::{self, Progress, ReassembleError};
use crate::silence::{
    self, Interval, PauseReport, SegmentError, SilenceSummary, derive_pauses, merge_short_gaps,
};

/// File name offered for the processed download.
pub const EXPORT_FILE_NAME: &str = "audio_no_pauses.wav";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No audio file has been uploaded")]
    NoUpload,
    #[error("Audio has not been analyzed yet")]
    NotAnalyzed,
    /// The upload could not be staged to disk.
    #[error("Failed to stage upload {name}: {source}")]
    Upload {
        name: String,
        source: std::io::Error,
    },
    #[error("Failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The upload was rejected because it could not be decoded.
    #[error("Upload rejected: {0}")]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Segment(#[from] SegmentError),
    #[error(transparent)]
    Reassemble(#[from] ReassembleError),
    #[error("Export failed: {0}")]
    Encode(#[from] EncodeError),
}

/// A decoded upload and the temporary file it was staged in.
#[derive(Debug)]
pub struct Upload {
    name: String,
    size_bytes: u64,
    file: NamedTempFile,
    audio: AudioBuffer,
}

impl Upload {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Path of the staged temporary copy.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn audio(&self) -> &AudioBuffer {
        &self.audio
    }

    pub fn duration_ms(&self) -> u64 {
        self.audio.duration_ms()
    }
}

/// Segmentation result plus the pause preview built from it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Analysis {
    /// Parameters the analysis ran with.
    pub config: ProcessingConfig,
    pub duration_ms: u64,
    pub intervals: Vec<Interval>,
    pub pauses: PauseReport,
    pub summary: SilenceSummary,
}

impl Analysis {
    /// Run the segmenter and pause deriver over `audio`.
    pub fn run(audio: &AudioBuffer, config: &ProcessingConfig) -> Result<Self, SegmentError> {
        let min_silence_ms = config.min_silence_ms();
        let intervals = silence::segment(
            audio,
            config.silence_threshold_db,
            min_silence_ms,
            SEEK_STEP_MS,
        )?;
        let duration_ms = audio.duration_ms();
        let pauses = derive_pauses(&intervals, min_silence_ms);
        let summary = SilenceSummary::new(&intervals, &pauses, duration_ms);
        Ok(Self {
            config: config.clone(),
            duration_ms,
            intervals,
            pauses,
            summary,
        })
    }

    pub fn is_fully_silent(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn has_pauses(&self) -> bool {
        !self.pauses.is_empty()
    }

    /// Intervals handed to the reassembler under `removal`.
    pub fn keep_intervals(&self, removal: RemovalPolicy) -> Vec<Interval> {
        match removal {
            RemovalPolicy::AllGaps => self.intervals.clone(),
            RemovalPolicy::PreviewedPauses => {
                merge_short_gaps(&self.intervals, self.config.min_silence_ms())
            }
        }
    }
}

/// Reassembled audio with before/after durations.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedAudio {
    pub audio: AudioBuffer,
    pub original_ms: u64,
}

impl ProcessedAudio {
    pub fn new_duration_ms(&self) -> u64 {
        self.audio.duration_ms()
    }

    pub fn time_saved_ms(&self) -> u64 {
        self.original_ms.saturating_sub(self.new_duration_ms())
    }

    pub fn time_saved_percent(&self) -> f64 {
        if self.original_ms == 0 {
            return 0.0;
        }
        self.time_saved_ms() as f64 / self.original_ms as f64 * 100.0
    }

    /// Encode for download.
    pub fn export(&self) -> Result<Export, EncodeError> {
        Ok(Export {
            file_name: EXPORT_FILE_NAME,
            media_type: WAV_MEDIA_TYPE,
            bytes: encode_wav(&self.audio)?,
        })
    }
}

/// Downloadable WAV bytes with a fixed name and media type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub file_name: &'static str,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Write the export into `dir` under its file name.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        let path = dir.join(self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Result of [`Session::process`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProcessOutcome {
    Processed(ProcessedAudio),
    /// The analysis found no pauses (or no audio), so there is nothing to cut.
    NothingToRemove,
}

/// One upload/analyze/process cycle.
#[derive(Debug, Default)]
pub struct Session {
    upload: Option<Upload>,
    analysis: Option<Analysis>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage and decode an uploaded file's bytes, replacing the current upload.
    ///
    /// If decoding fails the upload is rejected and the previous upload and
    /// analysis are kept.
    pub fn upload_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<&Upload, SessionError> {
        let staged = stage_upload(name, bytes)?;
        let audio = decode_file(staged.path())?;
        tracing::info!(
            "Loaded {name}: {:.1}s, {} Hz, {} channel(s)",
            audio.duration_seconds(),
            audio.sample_rate(),
            audio.channels()
        );
        if let Some(previous) = self.upload.as_ref() {
            tracing::debug!("Replacing upload {}", previous.name);
        }
        self.analysis = None;
        let upload = self.upload.insert(Upload {
            name: name.to_string(),
            size_bytes: bytes.len() as u64,
            file: staged,
            audio,
        });
        Ok(upload)
    }

    /// Upload a file from disk.
    pub fn upload_file(&mut self, path: &Path) -> Result<&Upload, SessionError> {
        let bytes = std::fs::read(path).map_err(|source| SessionError::ReadInput {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload");
        self.upload_bytes(name, &bytes)
    }

    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Segment the current upload and build the pause preview.
    pub fn analyze(&mut self, config: &ProcessingConfig) -> Result<&Analysis, SessionError> {
        let upload = self.upload.as_ref().ok_or(SessionError::NoUpload)?;
        let analysis = Analysis::run(upload.audio(), config)?;
        tracing::info!(
            "Analysis of {}: {} segment(s), {} pause(s), {:.1}s silence",
            upload.name,
            analysis.summary.speech_segments,
            analysis.summary.pause_count,
            analysis.pauses.total_silence_seconds()
        );
        Ok(self.analysis.insert(analysis))
    }

    /// Cut the analyzed pauses out of the current upload.
    ///
    /// Padding comes from `config`; the intervals come from the last analysis.
    pub fn process<F>(
        &self,
        config: &ProcessingConfig,
        on_progress: F,
    ) -> Result<ProcessOutcome, SessionError>
    where
        F: FnMut(Progress),
    {
        let upload = self.upload.as_ref().ok_or(SessionError::NoUpload)?;
        let analysis = self.analysis.as_ref().ok_or(SessionError::NotAnalyzed)?;
        if analysis.is_fully_silent() || !analysis.has_pauses() {
            tracing::info!("Nothing to remove from {}", upload.name);
            return Ok(ProcessOutcome::NothingToRemove);
        }

        let keep = analysis.keep_intervals(config.removal);
        let audio = reassemble::reassemble(
            upload.audio(),
            &keep,
            &config.reassembly_params(),
            on_progress,
        )?;
        let processed = ProcessedAudio {
            audio,
            original_ms: upload.duration_ms(),
        };
        tracing::info!(
            "Processed {}: {:.1}s -> {:.1}s",
            upload.name,
            processed.original_ms as f64 / 1000.0,
            processed.new_duration_ms() as f64 / 1000.0
        );
        Ok(ProcessOutcome::Processed(processed))
    }

    /// Drop the current upload and analysis, deleting the staged file.
    pub fn clear(&mut self) {
        self.analysis = None;
        self.upload = None;
    }
}

fn stage_upload(name: &str, bytes: &[u8]) -> Result<NamedTempFile, SessionError> {
    let map_err = |source| SessionError::Upload {
        name: name.to_string(),
        source,
    };
    let suffix = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    let mut file = tempfile::Builder::new()
        .prefix("pausetrim-upload-")
        .suffix(&suffix)
        .tempfile()
        .map_err(map_err)?;
    file.write_all(bytes).map_err(map_err)?;
    file.flush().map_err(map_err)?;
    Ok(file)
}
