use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Context;
use log::warn;
use serde::Deserialize;
use toml::Table;

const APP_DIR: &str = "expense-tracker";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_CURRENCY: &str = "₹";

#[derive(Deserialize, Debug, PartialEq)]
pub(crate) struct Config {
    /// Directory holding the transaction storage
    pub(crate) data_dir: Option<PathBuf>,

    /// Symbol printed in front of amounts
    #[serde(default = "default_currency")]
    pub(crate) currency: String,

    /// Category name to one regex or a list of regexes matched against descriptions
    #[serde(default)]
    pub(crate) categories: Table,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Config {
    pub(crate) fn empty() -> Config {
        Config { data_dir: None, currency: default_currency(), categories: Table::new() }
    }

    /// Load config from `file_path`. A missing file gives the defaults; so does a broken one,
    /// after a warning.
    pub(crate) fn load_from_file(file_path: &Path) -> Config {
        if !file_path.is_file() {
            return Config::empty();
        }

        match Config::parse_file(file_path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file: {e:#}");
                Config::empty()
            }
        }
    }

    fn parse_file(file_path: &Path) -> anyhow::Result<Config> {
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("unable to read {}", file_path.display()))?;
        toml::from_str::<Config>(&content)
            .with_context(|| format!("unable to parse {}", file_path.display()))
    }

    /// Storage directory: the config's `data_dir`, else the platform data directory.
    pub(crate) fn resolve_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir().map(|d| d.join(APP_DIR)).unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// Platform config file location, e.g. `~/.config/expense-tracker/config.toml` on Linux.
pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR).join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let config: Config = toml::from_str(r#"
            data_dir = "/tmp/finance"
            currency = "$"

            [categories]
            food = ["woolworths", "coles"]
            transport = "uber"
        "#).unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/finance")));
        assert_eq!(config.currency, "$");
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/tmp/finance"));
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::empty());
        assert_eq!(config.currency, "₹");
    }

    #[test]
    fn test_load_missing_or_broken_file() {
        let dir = std::env::temp_dir().join(format!("expense-tracker-config-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();

        assert_eq!(Config::load_from_file(&dir.join("missing.toml")), Config::empty());

        let broken = dir.join("broken.toml");
        fs::write(&broken, "currency = [").unwrap();
        assert_eq!(Config::load_from_file(&broken), Config::empty());

        let good = dir.join("good.toml");
        fs::write(&good, "currency = \"€\"").unwrap();
        assert_eq!(Config::load_from_file(&good).currency, "€");

        fs::remove_dir_all(&dir).unwrap();
    }
}
