//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::recording::QualityPreset;

/// SoundMemo - record a sound and play it back
#[derive(Parser, Debug)]
#[command(name = "sound-memo")]
#[command(version)]
#[command(about = "Record a sound from the microphone and play the last recording back")]
#[command(long_about = None)]
pub struct Cli {
    /// Show debug logs
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Without a subcommand the interactive recorder starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record for a fixed time, then print where the sound was stored
    Record(RecordArgs),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options for a scripted recording
#[derive(clap::Args, Debug, Default)]
pub struct RecordArgs {
    /// Recording duration (e.g., 5s, 1m, 1m30s)
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Play the recording once it is stored
    #[arg(short = 'p', long)]
    pub play: bool,

    /// Recording quality
    #[arg(short = 'q', long, value_name = "PRESET")]
    pub quality: Option<QualityArg>,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Quality argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    High,
    Low,
}

impl From<QualityArg> for QualityPreset {
    fn from(arg: QualityArg) -> Self {
        match arg {
            QualityArg::High => QualityPreset::High,
            QualityArg::Low => QualityPreset::Low,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "quality",
    "duration",
    "recordings_dir",
    "playback_during_recording",
    "log_level",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_without_subcommand_is_interactive() {
        let cli = Cli::parse_from(["sound-memo"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn cli_parses_verbose_after_subcommand() {
        let cli = Cli::parse_from(["sound-memo", "record", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn cli_parses_record_options() {
        let cli = Cli::parse_from([
            "sound-memo",
            "record",
            "--duration",
            "10s",
            "--play",
            "--quality",
            "low",
        ]);
        let Some(Commands::Record(args)) = cli.command else {
            panic!("Expected Record command");
        };
        assert_eq!(args.duration, Some("10s".to_string()));
        assert!(args.play);
        assert_eq!(args.quality, Some(QualityArg::Low));
    }

    #[test]
    fn record_defaults_are_unset() {
        let cli = Cli::parse_from(["sound-memo", "record"]);
        let Some(Commands::Record(args)) = cli.command else {
            panic!("Expected Record command");
        };
        assert!(args.duration.is_none());
        assert!(!args.play);
        assert!(args.quality.is_none());
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["sound-memo", "config", "set", "quality", "low"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "quality");
            assert_eq!(value, "low");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn quality_arg_converts_to_preset() {
        assert_eq!(QualityPreset::from(QualityArg::High), QualityPreset::High);
        assert_eq!(QualityPreset::from(QualityArg::Low), QualityPreset::Low);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("quality"));
        assert!(is_valid_config_key("recordings_dir"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
