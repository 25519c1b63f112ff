//! SoundMemo CLI entry point

use std::process::ExitCode;

use clap::Parser;

use sound_memo::cli::{
    handle_config_command, load_merged_config, run_interactive, run_record, Cli, Commands,
    Presenter, EXIT_ERROR,
};
use sound_memo::domain::config::{AppConfig, DEFAULT_LOG_LEVEL};
use sound_memo::domain::recording::QualityPreset;
use sound_memo::infrastructure::{init_logging, XdgConfigStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    match cli.command {
        Some(Commands::Config { action }) => {
            init_logging(DEFAULT_LOG_LEVEL, cli.verbose);
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Record(args)) => {
            let cli_config = AppConfig {
                quality: args.quality.map(|q| QualityPreset::from(q).to_string()),
                duration: args.duration,
                ..Default::default()
            };
            let config = load_merged_config(cli_config).await;
            init_logging(config.log_level_or_default(), cli.verbose);

            run_record(&config, args.play).await
        }
        None => {
            let config = load_merged_config(AppConfig::empty()).await;
            init_logging(config.log_level_or_default(), cli.verbose);

            run_interactive(&config).await
        }
    }
}
