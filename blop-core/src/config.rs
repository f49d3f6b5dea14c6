//! Build configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BASE_URL;
use crate::error::{BlopError, BlopResult};

/// Config file looked up in the working directory by default.
pub const DEFAULT_CONFIG_PATH: &str = "blop.toml";

/// Environment variable older deployments use for the feed URL.
pub const LEGACY_FEED_URL_VAR: &str = "SHEET_CSV_URL";

static DEFAULT_OUTPUT_DIR: &str = ".";
static DEFAULT_ICAL_DIR: &str = "assets/ical";
static DEFAULT_MANIFEST_FILE: &str = "site.json";
static DEFAULT_FEED_FILE: &str = "events.json";

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_ical_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ICAL_DIR)
}

fn default_manifest_file() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST_FILE)
}

fn default_feed_file() -> PathBuf {
    PathBuf::from(DEFAULT_FEED_FILE)
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Site build settings, from `blop.toml` and `BLOP_*` environment variables.
///
/// Relative `ical_dir`, `manifest_file` and `feed_file` are resolved against
/// `output_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Published CSV export of the submissions sheet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_csv_url: Option<String>,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_ical_dir")]
    pub ical_dir: PathBuf,

    #[serde(default = "default_manifest_file")]
    pub manifest_file: PathBuf,

    #[serde(default = "default_feed_file")]
    pub feed_file: PathBuf,

    /// Public origin used for permalinks in the feed
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            sheet_csv_url: None,
            output_dir: default_output_dir(),
            ical_dir: default_ical_dir(),
            manifest_file: default_manifest_file(),
            feed_file: default_feed_file(),
            base_url: default_base_url(),
        }
    }
}

impl SiteConfig {
    /// Load the config file at `path` (optional) with `BLOP_*` environment
    /// overrides. `SHEET_CSV_URL` fills in the feed URL if nothing else does.
    pub fn load(path: &Path) -> BlopResult<Self> {
        let mut config: SiteConfig = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("BLOP"))
            .build()
            .map_err(|e| BlopError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| BlopError::Config(e.to_string()))?;

        if config.sheet_csv_url.is_none() {
            config.sheet_csv_url = std::env::var(LEGACY_FEED_URL_VAR)
                .ok()
                .filter(|url| !url.trim().is_empty());
        }

        Ok(config)
    }

    /// Output directory with `~` expanded.
    pub fn output_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.output_dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    pub fn ical_path(&self) -> PathBuf {
        self.output_path().join(&self.ical_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_path().join(&self.manifest_file)
    }

    pub fn feed_path(&self) -> PathBuf {
        self.output_path().join(&self.feed_file)
    }

    pub fn save(&self, path: &Path) -> BlopResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| BlopError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| BlopError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> BlopResult<()> {
        let contents = format!(
            "\
# blop site configuration

# Published CSV export of the submissions sheet
# (the SHEET_CSV_URL environment variable works too):
# sheet_csv_url = \"https://docs.google.com/spreadsheets/d/e/.../pub?output=csv\"

# Where the site is built:
# output_dir = \"{}\"

# Calendar files, relative to output_dir:
# ical_dir = \"{}\"

# Build manifest and public feed, relative to output_dir:
# manifest_file = \"{}\"
# feed_file = \"{}\"

# Public origin for permalinks:
# base_url = \"{}\"
",
            DEFAULT_OUTPUT_DIR, DEFAULT_ICAL_DIR, DEFAULT_MANIFEST_FILE, DEFAULT_FEED_FILE, DEFAULT_BASE_URL
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BlopError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| BlopError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
