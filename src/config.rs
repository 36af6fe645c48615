//! Runtime configuration resolved from CLI flags and environment

use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;

use crate::types::{PriceCompareError, Result};

/// Default comparison API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Comparison API base URL
    pub api_url: String,
    pub timeout: Duration,
    /// Directory holding search history and the TUI log
    pub data_dir: PathBuf,
}

impl Config {
    /// Build a config, falling back to `~/.pricecmp` when no data dir is given
    pub fn new(api_url: String, timeout_secs: u64, data_dir: Option<PathBuf>) -> Result<Self> {
        if api_url.trim().is_empty() {
            return Err(PriceCompareError::Config("API URL must not be empty".into()));
        }
        if timeout_secs == 0 {
            return Err(PriceCompareError::Config(
                "timeout must be at least 1 second".into(),
            ));
        }

        let data_dir = match data_dir {
            Some(dir) => dir,
            None => Self::default_data_dir()?,
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            data_dir,
        })
    }

    /// Get the default data directory (~/.pricecmp)
    pub fn default_data_dir() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| PriceCompareError::Config("Cannot determine home directory".into()))?;
        Ok(base_dirs.home_dir().join(".pricecmp"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("pricecmp.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_with_explicit_data_dir() {
        let config = Config::new(
            "http://api.local".into(),
            5,
            Some(PathBuf::from("/tmp/pc")),
        )
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pc/pricecmp.log"));
    }

    #[test]
    fn test_config_rejects_empty_url() {
        let err = Config::new("  ".into(), 5, None).unwrap_err();
        assert!(matches!(err, PriceCompareError::Config(_)));
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let err = Config::new(DEFAULT_API_URL.into(), 0, Some(PathBuf::from("x"))).unwrap_err();
        assert!(matches!(err, PriceCompareError::Config(_)));
    }
}
