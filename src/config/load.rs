use std::path::Path;

use super::{ConfigError, ProcessingConfig};

impl ProcessingConfig {
    /// Read parameters from a TOML file; missing keys keep their defaults.
    ///
    /// Values are clamped on the way in, so the core never sees an
    /// out-of-range parameter.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded processing config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let config: Self = toml::from_str(text)?;
        Ok(config.clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::super::RemovalPolicy;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config = ProcessingConfig::from_toml_str("keep_after_ms = 300\n").unwrap();
        assert_eq!(config.keep_after_ms, 300);
        assert_eq!(config.keep_before_ms, 100);
        assert_eq!(config.silence_threshold_db, -40.0);
    }

    #[test]
    fn loaded_values_are_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pausetrim.toml");
        std::fs::write(
            &path,
            "silence_threshold_db = -10.0\nmin_silence_length_s = 0.1\nremoval = \"all_gaps\"\n",
        )
        .unwrap();
        let config = ProcessingConfig::load_from(&path).unwrap();
        assert_eq!(config.silence_threshold_db, -20.0);
        assert_eq!(config.min_silence_length_s, 0.5);
        assert_eq!(config.removal, RemovalPolicy::AllGaps);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "keep_before_ms = \"lots\"").unwrap();
        let err = ProcessingConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn missing_file_reports_read_error() {
        let dir = tempdir().unwrap();
        let err = ProcessingConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
