//! `vantage.toml` configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vantage::output::{DEFAULT_ICON_BASE_URL, DEFAULT_PORTFOLIO_ICON, IconConfig};

/// File name looked up in the user config directory.
pub(crate) const CONFIG_FILE: &str = "vantage.toml";

/// Errors while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// File could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User settings; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct VantageConfig {
    /// Start of the window when `--from` is not given.
    #[serde(default = "default_start")]
    pub(crate) default_start: NaiveDate,

    /// Pause after each Yahoo request, in milliseconds. Requests run a few
    /// at a time and the pause applies per in-flight slot.
    #[serde(default = "default_request_delay_ms")]
    pub(crate) request_delay_ms: u64,

    /// Listed-companies CSV replacing the built-in universe.
    pub(crate) universe_csv: Option<PathBuf>,

    /// Base URL of the ticker icons.
    #[serde(default = "default_icon_base_url")]
    pub(crate) icon_base_url: String,

    /// Icon of the portfolio card.
    #[serde(default = "default_portfolio_icon")]
    pub(crate) portfolio_icon: String,

    /// Log filter used when `RUST_LOG` is unset.
    pub(crate) log_filter: Option<String>,
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

const fn default_request_delay_ms() -> u64 {
    250
}

fn default_icon_base_url() -> String {
    DEFAULT_ICON_BASE_URL.to_string()
}

fn default_portfolio_icon() -> String {
    DEFAULT_PORTFOLIO_ICON.to_string()
}

impl Default for VantageConfig {
    fn default() -> Self {
        Self {
            default_start: default_start(),
            request_delay_ms: default_request_delay_ms(),
            universe_csv: None,
            icon_base_url: default_icon_base_url(),
            portfolio_icon: default_portfolio_icon(),
            log_filter: None,
        }
    }
}

impl VantageConfig {
    /// Parse a TOML document.
    pub(crate) fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `explicit` if given, else the default location when it exists,
    /// else the built-in defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Delay between provider requests.
    pub(crate) const fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Icon sources for the summary cards.
    pub(crate) fn icons(&self) -> IconConfig {
        IconConfig {
            base_url: self.icon_base_url.clone(),
            portfolio_icon: self.portfolio_icon.clone(),
        }
    }
}

/// `<config dir>/vantage/vantage.toml`.
pub(crate) fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vantage").join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = VantageConfig::from_toml("").unwrap();

        assert_eq!(config, VantageConfig::default());
        assert_eq!(config.default_start.to_string(), "2023-01-01");
        assert_eq!(config.request_delay(), Duration::from_millis(250));
        assert_eq!(config.icons(), IconConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config = VantageConfig::from_toml(
            r#"
default_start = "2022-06-01"
universe_csv = "acoes-listadas-b3.csv"
portfolio_icon = "wallet.svg"
"#,
        )
        .unwrap();

        assert_eq!(config.default_start.to_string(), "2022-06-01");
        assert_eq!(
            config.universe_csv.as_deref(),
            Some(Path::new("acoes-listadas-b3.csv"))
        );
        assert_eq!(config.icons().portfolio_icon, "wallet.svg");
        assert_eq!(config.icon_base_url, DEFAULT_ICON_BASE_URL);
        assert_eq!(config.request_delay_ms, 250);
    }

    #[rstest]
    #[case("request_delay_ms = \"fast\"")]
    #[case("default_start = \"01/01/2023\"")]
    #[case("default_start = ")]
    fn test_invalid_file(#[case] content: &str) {
        assert!(matches!(
            VantageConfig::from_toml(content),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = VantageConfig::load(Some(Path::new("/nonexistent/vantage.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_default_path_name() {
        if let Some(path) = default_path() {
            assert!(path.ends_with("vantage/vantage.toml"));
        }
    }
}
