//! Runtime configuration from the environment (and `.env`, if present).
//!
//! - `RECORDS_DB_PATH`   SQLite file (default: `<data dir>/campus-records/records.db`)
//! - `RECORDS_BIND_ADDR` listen address (default: `127.0.0.1:5000`)
//! - `RECORDS_LOG`       log level when `RUST_LOG` is unset (default: `info`)

use crate::error::AppError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub log_level: String,
}

fn app_data_dir() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("campus-records")
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let db_path = non_empty("RECORDS_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| app_data_dir().join("records.db"));

        let addr = non_empty("RECORDS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("RECORDS_BIND_ADDR '{}': {}", addr, e)))?;

        let log_level = non_empty("RECORDS_LOG").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            db_path,
            bind_addr,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr.port(), 5000);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.db_path.ends_with("campus-records/records.db"));
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("RECORDS_DB_PATH", "/tmp/x.db"),
            ("RECORDS_BIND_ADDR", "0.0.0.0:8080"),
            ("RECORDS_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[("RECORDS_BIND_ADDR", "  ")])).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn bad_bind_addr_is_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("RECORDS_BIND_ADDR", "nowhere")])).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
