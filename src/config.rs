use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::store::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Collection name in the document store.
    pub collection: String,
    /// Page size of the listing window.
    pub page_size: usize,
    /// Whether listings keep past events visible by default. The hosted
    /// variants disagreed on this; it is an explicit policy here.
    pub toon_verleden: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            collection: "rommelmarkten".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            toon_verleden: true,
        }
    }
}

/// Local stand-in for the third-party identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub uid: String,
    pub email: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { uid: "lokaal".to_string(), email: "bezoeker@example.com".to_string() }
    }
}

/// Admin gating by e-mail allow-list, evaluated client-side only. Advisory:
/// nothing on the backend enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    pub emails: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("be", "buurtmarkt", "buurtmarkt")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.listing.collection, "rommelmarkten");
        assert_eq!(config.listing.page_size, 12);
        assert!(config.listing.toon_verleden);
        assert!(config.admin.emails.is_empty());
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let mut config = Config::default();
        config.admin.emails.push("beheer@example.com".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.admin.emails, vec!["beheer@example.com"]);
        assert_eq!(parsed.listing.page_size, config.listing.page_size);
    }
}
