//! Host configuration loaded from environment variables.

use std::path::PathBuf;

/// Default number of activity entries shown by the CLI.
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// Reads from environment variables:
/// - `PAYLATER_DB_PATH`: persistent store directory (default: none, in-memory)
/// - `PAYLATER_LOG_LIMIT`: activity entries to print (default: `100`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub log_limit: usize,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            db_path: lookup("PAYLATER_DB_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            log_limit: lookup("PAYLATER_LOG_LIMIT")
                .and_then(|l| l.parse().ok())
                .unwrap_or(defaults.log_limit),
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_limit: DEFAULT_LOG_LIMIT,
            log_filter: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_limit, 100);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PAYLATER_DB_PATH", "/tmp/paylater"),
            ("PAYLATER_LOG_LIMIT", "5"),
            ("RUST_LOG", "debug"),
        ]);
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/paylater")));
        assert_eq!(config.log_limit, 5);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn test_invalid_limit_falls_back() {
        let config = Config::from_lookup(|k| (k == "PAYLATER_LOG_LIMIT").then(|| "many".to_string()));
        assert_eq!(config.log_limit, DEFAULT_LOG_LIMIT);
    }
}
