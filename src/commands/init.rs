use std::path::Path;

use anyhow::{Context, Result};
use blop_core::config::SiteConfig;
use owo_colors::OwoColorize;

pub fn run(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    SiteConfig::create_default_config(config_path)
        .with_context(|| format!("Could not create {}", config_path.display()))?;

    println!("{} {}", "Created".green(), config_path.display());
    println!("Set sheet_csv_url in it, then run `blop build`.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("blop.toml");

        run(&path).unwrap();
        assert!(path.exists());

        std::fs::write(&path, "base_url = \"https://example.org\"\n").unwrap();
        assert!(run(&path).is_err());
        let kept = std::fs::read_to_string(&path).unwrap();
        assert!(kept.contains("example.org"), "existing config must be left alone");
    }
}
