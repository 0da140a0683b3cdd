//! Main entry point for the Nacos CLI.
//!
//! Parses arguments, installs logging, builds one client session from the
//! layered settings, and dispatches the subcommand.

mod cli;
mod commands;
mod logging;
mod settings;

use std::process::ExitCode;

use clap::Parser;
use nacos_cli_client::NacosClient;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::logging::LoggingConfig;
use crate::settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging_config = LoggingConfig {
        filter: cli.log_level.clone(),
        log_dir: cli.log_dir.clone(),
    };
    let _logging_guard = match logging::init_logging(&logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(&cli)?;
    let client_config = settings.client_config();
    debug!(
        "Connecting to {} (namespace '{}', auth {})",
        client_config.server_addr,
        client_config.namespace,
        client_config.effective_auth_type()
    );
    let client = NacosClient::connect(&client_config).await?;

    match cli.command {
        Command::List {
            data_id,
            group,
            namespace,
            page,
            size,
            json,
        } => commands::list(&client, &data_id, &group, &namespace, page, size, json).await,
        Command::Get { data_id, group } => commands::get(&client, &data_id, &group).await,
        Command::Publish {
            data_id,
            group,
            content,
            file,
        } => {
            commands::publish(
                &client,
                &data_id,
                &group,
                content.as_deref(),
                file.as_deref(),
            )
            .await
        }
        Command::Watch {
            data_id,
            group,
            interval,
        } => commands::watch(client, &data_id, &group, interval).await,
    }
}
