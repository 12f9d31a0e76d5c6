//! Configuration loading and management.

use std::path::{Path, PathBuf};

use anyhow::Context;
use cs_core::{AnalyticsConfig, DEFAULT_MEDIA_PLACEHOLDER, StopWords};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// File with one stop word per line, replacing the built-in list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_words_path: Option<PathBuf>,

    /// Exact message text that marks an omitted attachment.
    pub media_placeholder: String,

    /// Number of rows in the common words table.
    pub common_words_limit: usize,

    /// Number of rows in the busiest participants ranking.
    pub busy_users_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        let analytics = AnalyticsConfig::default();
        Self {
            stop_words_path: None,
            media_placeholder: DEFAULT_MEDIA_PLACEHOLDER.to_string(),
            common_words_limit: analytics.common_words_limit,
            busy_users_limit: analytics.busy_users_limit,
        }
    }
}

impl Config {
    /// Loads configuration from default locations, optionally layering a
    /// specific file on top.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CHATSTAT_*)
        figment = figment.merge(Env::prefixed("CHATSTAT_"));

        figment.extract()
    }

    /// Builds the analytics configuration, reading the stop-word file if set.
    pub fn analytics(&self) -> anyhow::Result<AnalyticsConfig> {
        let stop_words = match &self.stop_words_path {
            Some(path) => {
                let list = std::fs::read_to_string(path).with_context(|| {
                    format!("failed to read stop words from {}", path.display())
                })?;
                StopWords::parse(&list)
            }
            None => StopWords::builtin(),
        };
        tracing::debug!(stop_words = stop_words.len(), "loaded stop words");

        Ok(AnalyticsConfig {
            stop_words,
            media_placeholder: self.media_placeholder.clone(),
            common_words_limit: self.common_words_limit,
            busy_users_limit: self.busy_users_limit,
        })
    }
}

/// Returns the platform-specific config directory for chatstat.
///
/// On Linux: `~/.config/chatstat`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("chatstat"))
}
