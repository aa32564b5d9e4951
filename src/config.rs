use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// API key for the upstream news feed
    pub api_key: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_country() -> String {
    "us".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_base_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_database_url() -> String {
    "sqlite:headlines.db?mode=rwc".to_string()
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
