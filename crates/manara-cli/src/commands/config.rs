//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use manara_core::auth::token_fingerprint;
use manara_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
///
/// Admin tokens are never printed, only their fingerprints.
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    let fingerprints: Vec<String> = config
        .admin_tokens
        .iter()
        .map(|t| token_fingerprint(t))
        .collect();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "bind": config.bind,
                    "admin_tokens": fingerprints,
                    "strict_fallback": config.strict_fallback,
                    "cors_origins": config.cors_origins,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:        {}", config.data_dir.display());
            println!("  bind:            {}", config.bind);
            println!("  admin_tokens:    {}", list_or_unset(&fingerprints));
            println!("  strict_fallback: {}", config.strict_fallback);
            println!("  cors_origins:    {}", list_or_unset(&config.cors_origins));
            println!(
                "  log_file:        {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    let shown = if key == "admin_tokens" {
        "(hidden)"
    } else {
        value.as_str()
    };
    output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            config.data_dir = value.into();
        }
        "bind" => {
            if value.is_empty() {
                bail!("bind cannot be empty");
            }
            config.bind = value.to_string();
        }
        "admin_tokens" => {
            config.admin_tokens = split_list(value);
        }
        "strict_fallback" => {
            config.strict_fallback = value
                .parse()
                .context("Invalid value for strict_fallback. Use 'true' or 'false'.")?;
        }
        "cors_origins" => {
            config.cors_origins = split_list(value);
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, bind, admin_tokens, strict_fallback, cors_origins, log_file",
                key
            );
        }
    }
    Ok(())
}

/// Comma-separated list; empty or `none` clears it
fn split_list(value: &str) -> Vec<String> {
    if value == "none" {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn list_or_unset(items: &[String]) -> String {
    if items.is_empty() {
        "(not set)".to_string()
    } else {
        items.join(", ")
    }
}
