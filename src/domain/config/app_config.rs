//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{Duration, QualityPreset};

/// Log level used when nothing else is configured
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub quality: Option<String>,
    pub duration: Option<String>,
    pub recordings_dir: Option<String>,
    pub playback_during_recording: Option<bool>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            quality: Some(QualityPreset::default().to_string()),
            duration: Some(Duration::default_duration().to_string()),
            recordings_dir: None,
            playback_during_recording: Some(true),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            quality: other.quality.or(self.quality),
            duration: other.duration.or(self.duration),
            recordings_dir: other.recordings_dir.or(self.recordings_dir),
            playback_during_recording: other
                .playback_during_recording
                .or(self.playback_during_recording),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get quality as parsed preset, or default if not set/invalid
    pub fn quality_or_default(&self) -> QualityPreset {
        self.quality
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get duration as parsed Duration, or default if not set/invalid
    pub fn duration_or_default(&self) -> Duration {
        self.duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Configured recordings directory, if any
    pub fn recordings_dir(&self) -> Option<PathBuf> {
        self.recordings_dir
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    pub fn playback_during_recording_or_default(&self) -> bool {
        self.playback_during_recording.unwrap_or(true)
    }

    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.quality, Some("high".to_string()));
        assert_eq!(config.duration, Some("5s".to_string()));
        assert!(config.recordings_dir.is_none());
        assert_eq!(config.playback_during_recording, Some(true));
        assert_eq!(config.log_level_or_default(), "info");
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            quality: Some("high".to_string()),
            duration: Some("10s".to_string()),
            ..Default::default()
        };
        let other = AppConfig {
            quality: Some("low".to_string()),
            duration: None,
            recordings_dir: Some("/tmp/memos".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.quality_or_default(), QualityPreset::Low);
        assert_eq!(merged.duration, Some("10s".to_string()));
        assert_eq!(merged.recordings_dir(), Some(PathBuf::from("/tmp/memos")));
    }

    #[test]
    fn merge_preserves_base_when_other_is_empty() {
        let base = AppConfig {
            playback_during_recording: Some(false),
            ..Default::default()
        };
        let merged = base.merge(AppConfig::empty());
        assert!(!merged.playback_during_recording_or_default());
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = AppConfig {
            quality: Some("ultra".to_string()),
            duration: Some("forever".to_string()),
            recordings_dir: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.quality_or_default(), QualityPreset::High);
        assert_eq!(config.duration_or_default().as_secs(), 5);
        assert!(config.recordings_dir().is_none());
    }

    #[test]
    fn empty_config_boolean_default() {
        assert!(AppConfig::empty().playback_during_recording_or_default());
    }
}
