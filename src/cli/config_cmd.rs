//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::{Duration, QualityPreset};
use crate::infrastructure::logging::LOG_LEVELS;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    require_known_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    require_known_key(key)?;

    let config = store.load().await?;
    presenter.output(read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn require_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Validate `value` for `key` and store it in its normalized form
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "quality" => {
            let preset: QualityPreset = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            config.quality = Some(preset.to_string());
        }
        "duration" => {
            let duration: Duration = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            config.duration = Some(duration.to_string());
        }
        "recordings_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value cannot be empty".to_string()));
            }
            config.recordings_dir = Some(value.to_string());
        }
        "playback_during_recording" => {
            let enabled = parse_bool(value)
                .map_err(|_| invalid("Value must be 'true' or 'false'".to_string()))?;
            config.playback_during_recording = Some(enabled);
        }
        "log_level" => {
            let level = value.to_lowercase();
            if !LOG_LEVELS.contains(&level.as_str()) {
                return Err(invalid(format!(
                    "Invalid value '{}'. Valid options: {}",
                    value,
                    LOG_LEVELS.join(", ")
                )));
            }
            config.log_level = Some(level);
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "quality" => config.quality.clone(),
        "duration" => config.duration.clone(),
        "recordings_dir" => config.recordings_dir.clone(),
        "playback_during_recording" => config.playback_during_recording.map(|b| b.to_string()),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("NO"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert!(parse_bool("sometimes").is_err());
    }

    #[test]
    fn quality_is_normalized() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "quality", "low_quality").unwrap();
        assert_eq!(config.quality, Some("low".to_string()));
    }

    #[test]
    fn invalid_quality_is_rejected() {
        let mut config = AppConfig::empty();
        let err = apply_value(&mut config, "quality", "ultra").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref key, .. } if key == "quality"));
        assert!(config.quality.is_none());
    }

    #[test]
    fn duration_is_validated() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "duration", "1m30s").is_ok());
        assert!(apply_value(&mut config, "duration", "soon").is_err());
        assert!(apply_value(&mut config, "duration", "99999999999999999s").is_err());
        assert_eq!(config.duration, Some("1m30s".to_string()));
    }

    #[test]
    fn playback_flag_accepts_bool_words() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "playback_during_recording", "no").unwrap();
        assert_eq!(config.playback_during_recording, Some(false));
        assert_eq!(
            read_value(&config, "playback_during_recording"),
            Some("false".to_string())
        );
    }

    #[test]
    fn log_level_must_be_known() {
        let mut config = AppConfig::empty();
        apply_value(&mut config, "log_level", "DEBUG").unwrap();
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(apply_value(&mut config, "log_level", "chatty").is_err());
    }

    #[test]
    fn empty_recordings_dir_is_rejected() {
        let mut config = AppConfig::empty();
        assert!(apply_value(&mut config, "recordings_dir", "  ").is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(require_known_key("api_key").is_err());
        assert!(require_known_key("log_level").is_ok());
    }
}
