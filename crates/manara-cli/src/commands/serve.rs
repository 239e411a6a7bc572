//! Serve command handler

use anyhow::Result;

use manara_core::{service, Config};

/// Run the HTTP service until interrupted
pub async fn run(config: &Config) -> Result<()> {
    service::serve(config).await
}
