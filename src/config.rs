use crate::error::{ChainParamsError, Result};

/// Network selected when nothing else is configured
pub const DEFAULT_NETWORK: &str = "main";

/// Environment overrides
pub const NETWORK_ENV: &str = "CHAINPARAMS_NETWORK";
pub const SEARCH_BATCH_ENV: &str = "CHAINPARAMS_SEARCH_BATCH";
pub const PROGRESS_INTERVAL_ENV: &str = "CHAINPARAMS_PROGRESS_INTERVAL";

/// Nonces hashed in parallel before the stop flag is polled again
pub const SEARCH_BATCH_SIZE: u32 = 256;

/// Attempts between search progress reports
pub const SEARCH_PROGRESS_INTERVAL: u64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub batch_size: u32,
    pub progress_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            batch_size: SEARCH_BATCH_SIZE,
            progress_interval: SEARCH_PROGRESS_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub network: String,
    pub search: SearchConfig,
}

impl ToolConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so overrides can be exercised
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = ToolConfig {
            network: DEFAULT_NETWORK.to_string(),
            search: SearchConfig::default(),
        };

        if let Some(network) = lookup(NETWORK_ENV) {
            config.network = network;
        }
        if let Some(raw) = lookup(SEARCH_BATCH_ENV) {
            let batch: u32 = parse_override(SEARCH_BATCH_ENV, &raw)?;
            if batch == 0 {
                return Err(ChainParamsError::InvalidConfig(format!("{SEARCH_BATCH_ENV} must be at least 1")));
            }
            config.search.batch_size = batch;
        }
        if let Some(raw) = lookup(PROGRESS_INTERVAL_ENV) {
            config.search.progress_interval = parse_override(PROGRESS_INTERVAL_ENV, &raw)?;
        }

        Ok(config)
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ChainParamsError::InvalidConfig(format!("{key}={raw} is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ToolConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.network, "main");
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ToolConfig::from_lookup(lookup(&[
            (NETWORK_ENV, "regtest"),
            (SEARCH_BATCH_ENV, "64"),
            (PROGRESS_INTERVAL_ENV, " 10 "),
        ]))
        .unwrap();
        assert_eq!(config.network, "regtest");
        assert_eq!(config.search.batch_size, 64);
        assert_eq!(config.search.progress_interval, 10);
    }

    #[test]
    fn test_bad_numbers_rejected() {
        let err = ToolConfig::from_lookup(lookup(&[(SEARCH_BATCH_ENV, "lots")])).unwrap_err();
        assert!(matches!(err, ChainParamsError::InvalidConfig(_)));

        let err = ToolConfig::from_lookup(lookup(&[(SEARCH_BATCH_ENV, "0")])).unwrap_err();
        assert!(matches!(err, ChainParamsError::InvalidConfig(_)));
    }
}
