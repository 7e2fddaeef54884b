//! Clubhouse configuration file handling
//!
//! Settings live in a flat `clubhouse.toml`; every key is optional and
//! falls back to the platform defaults.
//!
//! ```toml
//! support_email = "it@stuysu.org"
//! storage_bucket = "public-files"
//! picture_prefix = "org-pictures"
//! default_meeting_time = "15:45"
//! default_meeting_public = true
//! compensation_attempts = 1
//! ```

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    /// Address quoted in every "contact support" notice
    #[serde(default = "default_support_email")]
    pub support_email: String,
    /// Object-storage bucket holding organization pictures
    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,
    /// Path prefix for organization pictures inside the bucket
    #[serde(default = "default_picture_prefix")]
    pub picture_prefix: String,
    /// Time of day prefilled for new meetings, `HH:MM`
    #[serde(default = "default_meeting_time")]
    pub default_meeting_time: String,
    #[serde(default = "default_true")]
    pub default_meeting_public: bool,
    /// How many times each compensating step is tried
    #[serde(default = "default_compensation_attempts")]
    pub compensation_attempts: u32,
}

fn default_support_email() -> String {
    "it@stuysu.org".to_string()
}

fn default_storage_bucket() -> String {
    "public-files".to_string()
}

fn default_picture_prefix() -> String {
    "org-pictures".to_string()
}

fn default_meeting_time() -> String {
    "15:45".to_string()
}

fn default_true() -> bool {
    true
}

fn default_compensation_attempts() -> u32 {
    1
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            support_email: default_support_email(),
            storage_bucket: default_storage_bucket(),
            picture_prefix: default_picture_prefix(),
            default_meeting_time: default_meeting_time(),
            default_meeting_public: default_true(),
            compensation_attempts: default_compensation_attempts(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse clubhouse config")?;
        config.meeting_time()?;
        if config.compensation_attempts == 0 {
            anyhow::bail!("compensation_attempts must be at least 1");
        }
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize clubhouse config")
    }

    /// The prefilled meeting time of day
    pub fn meeting_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(&self.default_meeting_time, "%H:%M").with_context(|| {
            format!(
                "default_meeting_time must be HH:MM, got {:?}",
                self.default_meeting_time
            )
        })
    }
}
