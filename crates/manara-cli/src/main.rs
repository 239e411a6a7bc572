//! Manara CLI
//!
//! Command-line interface for Manara - serve, inspect and back up the site's
//! content and settings.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use manara_core::{Config, ContentStore, StorageError};

mod commands;
mod logging;
mod output;
mod prompt;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "manara")]
#[command(about = "Manara - content backend for a personal Arabic site")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Listen address (overrides config)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Inspect the content document
    Content {
        #[command(subcommand)]
        command: Option<ShowCommands>,
    },
    /// Inspect the settings document
    Settings {
        #[command(subcommand)]
        command: Option<ShowCommands>,
    },
    /// Write a backup of both documents
    Export {
        /// Output file or directory (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore from a backup
    Import {
        /// Backup file produced by `export`
        file: PathBuf,
    },
    /// Replace both documents with the built-in defaults
    Reset {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Show where the documents live and whether they have been saved
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum ShowCommands {
    /// Print the current document
    Show,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, bind, admin_tokens, strict_fallback, cors_origins, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            if let Some(hint) = recovery_hint(&e) {
                eprintln!();
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file itself, before anything is opened
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    let serving = matches!(cli.command, Commands::Serve { .. });
    logging::init(&config, if serving { "info" } else { "warn" });
    tracing::debug!("Using data directory {:?}", config.data_dir);

    if let Commands::Serve { bind } = cli.command {
        if let Some(bind) = bind {
            config.bind = bind;
        }
        return commands::serve::run(&config).await;
    }

    let store = ContentStore::open(&config);

    match cli.command {
        Commands::Content { .. } => commands::content::show_content(&store, &output),
        Commands::Settings { .. } => commands::content::show_settings(&store, &output),
        Commands::Export { output: path } => {
            commands::snapshot::export(&store, path.as_deref(), &output)
        }
        Commands::Import { file } => commands::snapshot::import(&store, &file, &output),
        Commands::Reset { yes } => commands::snapshot::reset(&store, yes, &output),
        Commands::Status => commands::status::show(&store, &config, &output),
        Commands::Serve { .. } | Commands::Config { .. } => Ok(()), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Suggestion for the storage failure behind `err`, if there is one
fn recovery_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<StorageError>())
        .and_then(StorageError::recovery_suggestion)
}
