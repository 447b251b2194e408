//! Library exports for the CLI, benchmarks and tests.
/// Application directory helpers.
pub mod app_dirs;
/// Decoded audio buffers plus decoding and WAV export.
pub mod audio;
/// Processing parameters and fixed constants.
pub mod config;
/// Logging setup.
pub mod logging;
/// Padding, crossfading and normalization of kept audio.
pub mod reassemble;
/// State for one uploaded recording.
pub mod session;
/// Silence segmentation and the pause preview.
pub mod silence;
