use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DOWNLOAD_FOLDER: &str = "Instagram Reels";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_download_folder")]
    pub download_folder: String,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default = "default_logging_format")]
    pub format: String,
}

fn default_download_folder() -> String {
    DEFAULT_DOWNLOAD_FOLDER.to_string()
}

fn default_logging_format() -> String {
    "plain".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            download_folder: default_download_folder(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: default_logging_format(),
        }
    }
}

impl Settings {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(settings)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path))?;
        Ok(())
    }

    pub fn download_folder(&self) -> &str {
        &self.download_folder
    }

    /// Trims the value; empty input resets to the default folder.
    pub fn set_download_folder(&mut self, value: &str) {
        let trimmed = value.trim();
        self.download_folder = if trimmed.is_empty() {
            default_download_folder()
        } else {
            trimmed.to_string()
        };
    }

    pub fn logging_format(&self) -> &str {
        &self.logging.format
    }
}
