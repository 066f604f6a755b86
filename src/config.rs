use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::debug;

use crate::api::types::DEFAULT_PAGE_SIZE;

/// Radius used for a map click when the filter has none
const DEFAULT_RADIUS_KM: f64 = 10.0;
const DEFAULT_ZOOM: u8 = 10;

const CONFIG_PATH_ENV: &str = "RENTAL_SCOUT_CONFIG";
const API_URL_ENV: &str = "RENTAL_API_URL";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_seconds: u64,
    pub page_size: u32,
    pub default_radius_km: f64,
    pub map_zoom: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_seconds: 30,
            page_size: DEFAULT_PAGE_SIZE,
            default_radius_km: DEFAULT_RADIUS_KM,
            map_zoom: DEFAULT_ZOOM,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text)
    }

    /// `.env`, then the optional TOML file, then `RENTAL_API_URL`
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                debug!("Reading config from {}", path);
                Self::from_file(path)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(url) = env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml(r#"api_base_url = "https://rentals.example/api""#).unwrap();
        assert_eq!(config.api_base_url, "https://rentals.example/api");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.default_radius_km, 10.0);
        assert_eq!(config.map_zoom, 10);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(Config::from_toml("page_size = \"many\"").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_file("/nonexistent/rental-scout.toml").is_err());
    }
}
