//! Content and settings command handlers

use anyhow::Result;

use manara_core::ContentStore;

use crate::output::Output;

/// Print the content document
pub fn show_content(store: &ContentStore, output: &Output) -> Result<()> {
    let content = store.get_content()?;
    output.print_content(&content)
}

/// Print the settings document
pub fn show_settings(store: &ContentStore, output: &Output) -> Result<()> {
    let settings = store.get_settings()?;
    output.print_settings(&settings)
}
