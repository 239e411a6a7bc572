//! Status command handler

use anyhow::Result;

use manara_core::{Config, ContentStore};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &ContentStore, config: &Config, output: &Output) -> Result<()> {
    let status = store.status();
    let stats = store.storage_stats();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "bind": config.bind,
                    "admin_tokens": config.admin_tokens.len(),
                    "storage": status,
                    "total_size": stats.total_size()
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let saved = |persisted: bool, size: Option<u64>| match (persisted, size) {
                (true, Some(size)) => format!("saved ({} bytes)", size),
                (true, None) => "saved".to_string(),
                (false, _) => "not saved, serving default".to_string(),
            };

            println!("Manara Status");
            println!("=============");
            println!();
            println!("Documents:");
            println!(
                "  Content:  {}",
                saved(status.content_persisted, status.content_size)
            );
            println!(
                "  Settings: {}",
                saved(status.settings_persisted, status.settings_size)
            );
            println!(
                "  Fallback: {}",
                if status.strict { "strict" } else { "lenient" }
            );
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Size:     {}", stats.total_size_human());
            println!();
            println!("Service:");
            println!("  Bind:         {}", config.bind);
            println!(
                "  Admin tokens: {}",
                if config.admin_tokens.is_empty() {
                    "none (writes refused)".to_string()
                } else {
                    config.admin_tokens.len().to_string()
                }
            );
        }
    }

    Ok(())
}
