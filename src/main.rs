mod app_error;
mod cli;
mod config;
mod model;
mod repositories;
mod services;

use crate::cli::Cli;
use crate::config::config::Config;
use crate::repositories::rekognition_repository::RekognitionRepository;
use crate::services::model_starter::ModelStarter;
use clap::Parser;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    enable_logging(cli.verbose);

    let Some(config) = Config::from_path(&cli.config_path) else {
        return ExitCode::FAILURE;
    };
    let resolved = match config.apply_overrides(cli.overrides()).resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let repository = RekognitionRepository::new(resolved.region).await;
    let starter = ModelStarter::new(repository);
    let mut stdout = std::io::stdout().lock();
    match starter.run(&resolved.request, &mut stdout).await {
        Ok(_) => {
            info!("Model {} is running", resolved.request.version_name);
            ExitCode::SUCCESS
        }
        Err(e) => ExitCode::from(&e),
    }
}

fn enable_logging(verbose: u8) {
    let log_level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
