//! Backup command handlers

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use manara_core::snapshot::SNAPSHOT_FILE_NAME;
use manara_core::ContentStore;

use crate::output::{Output, OutputFormat};
use crate::prompt::confirm;

/// Write a snapshot to a file, or to stdout when no path is given
pub fn export(store: &ContentStore, path: Option<&Path>, output: &Output) -> Result<()> {
    let snapshot = store.export_snapshot().context("Failed to export snapshot")?;

    let Some(path) = path else {
        println!("{}", snapshot);
        return Ok(());
    };

    let target = export_target(path);
    fs::write(&target, snapshot.as_bytes())
        .with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!("Exported {} bytes to {:?}", snapshot.len(), target);

    if output.is_quiet() {
        println!("{}", target.display());
    } else {
        output.success(&format!("Exported backup to {}", target.display()));
    }
    Ok(())
}

/// Import a snapshot file
pub fn import(store: &ContentStore, file: &Path, output: &Output) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let summary = store
        .import_snapshot(&text)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    tracing::info!("Imported {:?}", file);

    match output.format {
        OutputFormat::Json => output.print_json(&summary)?,
        OutputFormat::Quiet => {}
        OutputFormat::Human => {
            let mut restored = Vec::new();
            if summary.content {
                restored.push("content");
            }
            if summary.settings {
                restored.push("settings");
            }
            output.success(&format!("Restored {}", restored.join(" and ")));
        }
    }
    Ok(())
}

/// Reset both documents to the built-in defaults
pub fn reset(store: &ContentStore, yes: bool, output: &Output) -> Result<()> {
    if !yes {
        if !output.should_prompt() {
            bail!("Refusing to reset without --yes");
        }
        println!("This replaces all content and settings with the defaults.");
        if !confirm("Are you sure?")? {
            tracing::debug!("Reset cancelled at the prompt");
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .reset_to_default()
        .context("Failed to reset content")?;

    output.success("Reset content and settings to defaults");
    Ok(())
}

/// A directory gets the default backup file name
fn export_target(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(SNAPSHOT_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}
