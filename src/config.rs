use serde::Deserialize;
use std::path::Path;

use crate::registry::{Category, FeedRegistry, FeedSource};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Per-feed request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    pub registry: RegistryTable,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

/// Static category -> feed URL tables from the config file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegistryTable {
    #[serde(default)]
    pub local: Vec<String>,
    #[serde(default)]
    pub national: Vec<String>,
    #[serde(default)]
    pub international: Vec<String>,
}

impl RegistryTable {
    /// Build the immutable registry, local then national then international.
    pub fn into_registry(self) -> FeedRegistry {
        let mut sources = Vec::new();
        for (urls, category) in [
            (self.local, Category::Local),
            (self.national, Category::National),
            (self.international, Category::International),
        ] {
            sources.extend(urls.into_iter().map(|url| FeedSource { url, category }));
        }
        FeedRegistry::new(sources)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
