//! Processing parameters, the ranges they are clamped to, and fixed constants.
//!
//! Parameters can be read from an explicitly named TOML file. Nothing is
//! written back; every run starts from the file or the defaults.

mod defaults;
mod load;

use std::fmt;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reassemble::{OverlapPolicy, ReassemblyParams};
use defaults::*;

/// Crossfade applied at every splice.
pub const CROSSFADE_MS: u64 = 60;
/// Output peak sits this far below full scale.
pub const NORMALIZE_HEADROOM_DB: f32 = 1.0;
/// Scan granularity of the silence detector.
pub const SEEK_STEP_MS: u64 = 100;

pub const SILENCE_THRESHOLD_DB_RANGE: RangeInclusive<f32> = -60.0..=-20.0;
pub const MIN_SILENCE_LENGTH_S_RANGE: RangeInclusive<f32> = 0.5..=5.0;
pub const KEEP_MS_RANGE: RangeInclusive<u64> = 0..=1_000;

/// Errors that may occur while loading processing parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Which gaps the reassembler is allowed to cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Cut only gaps listed in the pause preview, plus leading and trailing silence.
    #[default]
    PreviewedPauses,
    /// Cut everything outside the padded non-silent intervals.
    AllGaps,
}

impl FromStr for RemovalPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "previewed_pauses" => Ok(Self::PreviewedPauses),
            "all_gaps" => Ok(Self::AllGaps),
            other => Err(format!(
                "Unknown removal policy '{other}' (expected previewed-pauses or all-gaps)"
            )),
        }
    }
}

impl fmt::Display for RemovalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreviewedPauses => f.write_str("previewed-pauses"),
            Self::AllGaps => f.write_str("all-gaps"),
        }
    }
}

/// User-adjustable parameters for one analyze/process cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Level in dBFS at or below which audio counts as silent.
    #[serde(default = "default_silence_threshold_db")]
    pub silence_threshold_db: f32,
    /// Shortest silence, in seconds, that is treated as a pause.
    #[serde(default = "default_min_silence_length_s")]
    pub min_silence_length_s: f32,
    /// Room tone kept before each non-silent interval.
    #[serde(default = "default_keep_before_ms")]
    pub keep_before_ms: u64,
    /// Room tone kept after each non-silent interval.
    #[serde(default = "default_keep_after_ms")]
    pub keep_after_ms: u64,
    #[serde(default)]
    pub removal: RemovalPolicy,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            silence_threshold_db: default_silence_threshold_db(),
            min_silence_length_s: default_min_silence_length_s(),
            keep_before_ms: default_keep_before_ms(),
            keep_after_ms: default_keep_after_ms(),
            removal: RemovalPolicy::default(),
        }
    }
}

impl ProcessingConfig {
    /// Pull every value into its accepted range; non-finite values fall back to defaults.
    pub fn clamped(self) -> Self {
        Self {
            silence_threshold_db: clamp_f32(
                self.silence_threshold_db,
                &SILENCE_THRESHOLD_DB_RANGE,
                default_silence_threshold_db(),
            ),
            min_silence_length_s: clamp_f32(
                self.min_silence_length_s,
                &MIN_SILENCE_LENGTH_S_RANGE,
                default_min_silence_length_s(),
            ),
            keep_before_ms: clamp_keep_ms(self.keep_before_ms),
            keep_after_ms: clamp_keep_ms(self.keep_after_ms),
            removal: self.removal,
        }
    }

    pub fn min_silence_ms(&self) -> u64 {
        (self.min_silence_length_s.max(0.0) as f64 * 1000.0).round() as u64
    }

    /// Reassembly parameters with the fixed crossfade and headroom.
    pub fn reassembly_params(&self) -> ReassemblyParams {
        ReassemblyParams {
            preroll_ms: self.keep_before_ms,
            postroll_ms: self.keep_after_ms,
            crossfade_ms: CROSSFADE_MS,
            headroom_db: NORMALIZE_HEADROOM_DB,
            overlap: OverlapPolicy::Merge,
        }
    }
}
