pub mod build;
pub mod calendars;
pub mod init;

use std::path::Path;

use anyhow::{Context, Result};
use blop_core::config::SiteConfig;

fn load_config(path: &Path) -> Result<SiteConfig> {
    let config = SiteConfig::load(path)
        .with_context(|| format!("Could not load config from {}", path.display()))?;
    tracing::debug!(?config, "Loaded config");
    Ok(config)
}
