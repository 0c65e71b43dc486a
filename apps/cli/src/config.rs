//! CLI configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/intake/cli.toml`
//! - Windows: `%APPDATA%/intake/cli.toml`

use std::path::{Path, PathBuf};

use intake_protocol::UploadSource;
use intake_uploader::{IntakePolicy, Messages};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// API root, e.g. `http://localhost:5001/console/api`.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Upload source tag; `datasets` or empty for none.
    #[serde(default = "default_source")]
    pub source: String,

    /// Skip the file-count ceiling.
    #[serde(default)]
    pub unlimited: bool,

    /// Accept at most one file.
    #[serde(default)]
    pub single_file_only: bool,

    #[serde(default)]
    pub messages: Messages,
}

fn default_server_url() -> String {
    "http://localhost:5001/console/api".into()
}

fn default_source() -> String {
    UploadSource::Datasets.as_str().into()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            source: default_source(),
            unlimited: false,
            single_file_only: false,
            messages: Messages::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from `path` or the default location, creating a
    /// default file if none exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path(),
        };

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: CliConfig = toml::from_str(&content)?;
            tracing::debug!(path = %path.display(), "configuration loaded");
            Ok(config)
        } else {
            let config = CliConfig::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Parsed upload source, `None` when empty.
    pub fn upload_source(&self) -> anyhow::Result<Option<UploadSource>> {
        match self.source.trim() {
            "" => Ok(None),
            s if s == UploadSource::Datasets.as_str() => Ok(Some(UploadSource::Datasets)),
            other => anyhow::bail!("unknown upload source: {other}"),
        }
    }

    pub fn policy(&self) -> IntakePolicy {
        IntakePolicy {
            unlimited: self.unlimited,
            single_file_only: self.single_file_only,
        }
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("intake").join("cli.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("intake")
            .join("cli.toml")
    }
}
