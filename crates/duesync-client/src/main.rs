//! duesync CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use duesync_client::cli::{AuthProvider, Cli, Command, ConfigAction};
use duesync_client::commands;
use duesync_client::config::ClientConfig;
use duesync_client::error::{ClientError, ClientResult};
use duesync_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path)
    } else {
        ClientConfig::load()
    }
    .map_err(ClientError::Config)?;

    match cli.command {
        #[cfg(all(feature = "google", feature = "gradescope"))]
        None | Some(Command::Sync) => commands::sync::run(&config).await,
        #[cfg(not(all(feature = "google", feature = "gradescope")))]
        None => Err(ClientError::Config(
            "sync needs both the google and gradescope features".to_string(),
        )),
        #[cfg(feature = "gradescope")]
        Some(Command::Scrape) => commands::scrape::run(&config).await.map(|_| ()),
        #[cfg(feature = "google")]
        Some(Command::Upload) => commands::upload::run(&config).await,
        #[cfg(feature = "google")]
        Some(Command::Delete) => commands::delete::run(&config).await,
        Some(Command::Auth { provider }) => match provider {
            #[cfg(feature = "google")]
            AuthProvider::Google {
                client_id,
                client_secret,
                credentials_file,
                force,
            } => {
                commands::auth::google(
                    client_id,
                    client_secret,
                    credentials_file,
                    force,
                    &config,
                    &config_path,
                )
                .await
            }
        },
        Some(Command::Config { action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config_path),
        },
    }
}
