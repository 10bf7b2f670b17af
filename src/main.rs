// esmigrate - Elasticsearch scroll-to-bulk migration tool
// Copyright (c) 2025 esmigrate Contributors
// Licensed under the MIT License

use esmigrate::cli::commands::load_migration_config;
use esmigrate::cli::{Cli, Commands};
use esmigrate::config::LoggingConfig;
use esmigrate::logging::init_logging;
use clap::Parser;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Optional; a missing .env is ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging only applies to migrations, and only when configured
    let (config_level, logging_config) = match &cli.command {
        Commands::Migrate(_) => match load_migration_config(cli.config.as_deref()) {
            Ok(config) => (Some(config.application.log_level), config.logging),
            Err(_) => (None, LoggingConfig::default()),
        },
        _ => (None, LoggingConfig::default()),
    };

    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(e.exit_code());
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "esmigrate - Elasticsearch index migration"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler, listening for Ctrl+C only");
                    if tokio::signal::ctrl_c().await.is_ok() {
                        request_shutdown(&shutdown_tx, "SIGINT (Ctrl+C)");
                    }
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => request_shutdown(&shutdown_tx, "SIGINT (Ctrl+C)"),
                _ = sigterm.recv() => request_shutdown(&shutdown_tx, "SIGTERM"),
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                request_shutdown(&shutdown_tx, "SIGINT (Ctrl+C)");
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush file logs before exiting
    drop(logging_guard);
    process::exit(exit_code);
}

fn request_shutdown(shutdown_tx: &watch::Sender<bool>, signal_name: &str) {
    tracing::info!(signal = signal_name, "Received shutdown signal, stopping migration");
    println!("\n⚠️  Shutdown signal received, stopping migration...");
    let _ = shutdown_tx.send(true);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Migrate(args) => args.execute(config_path, shutdown_signal).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
