use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use alloy::primitives::Address;
use bridge_pacer_commons::error::{CodedError, ErrorCode, ExternalError};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path:?}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {field}: {reason}")]
    InvalidRange { field: &'static str, reason: String },
    #[error("failed to parse inbox_address")]
    InvalidAddress {
        #[source]
        source: ExternalError,
    },
}

impl CodedError for ConfigError {
    fn code(&self) -> ErrorCode {
        match self {
            ConfigError::ReadFile { .. } => ErrorCode::ConfigReadFile,
            ConfigError::Parse { .. } => ErrorCode::ConfigParse,
            ConfigError::InvalidRange { .. } => ErrorCode::ConfigInvalidRange,
            ConfigError::InvalidAddress { .. } => ErrorCode::ConfigInvalidAddress,
        }
    }
}

fn default_confirm_timeout_secs() -> u64 {
    300
}

/// Immutable run parameters, read once at startup from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    /// Probed from the node when absent.
    #[serde(default)]
    pub chain_id: Option<u64>,
    pub inbox_address: String,
    pub min_tx_per_day: u32,
    pub max_tx_per_day: u32,
    pub min_amount_eth: f64,
    pub max_amount_eth: f64,
    pub min_delay_secs: u64,
    pub max_delay_secs: u64,
    pub priority_fee_gwei: f64,
    /// Signed minutes from UTC defining where "midnight" falls.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,
}

impl Config {
    pub fn load(path: &Path) -> ConfigResult<Arc<Self>> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        debug!("Loaded config from {}", path.display());
        Ok(Arc::new(config))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_tx_per_day < 1 {
            return Err(invalid("min_tx_per_day", "must be at least 1"));
        }
        if self.min_tx_per_day > self.max_tx_per_day {
            return Err(invalid("max_tx_per_day", "must be >= min_tx_per_day"));
        }
        if self.min_amount_eth < 0.0 {
            return Err(invalid("min_amount_eth", "must be non-negative"));
        }
        // Written as a negated <= so NaN bounds are rejected too.
        if !(self.min_amount_eth <= self.max_amount_eth) {
            return Err(invalid("max_amount_eth", "must be >= min_amount_eth"));
        }
        if self.min_delay_secs > self.max_delay_secs {
            return Err(invalid("max_delay_secs", "must be >= min_delay_secs"));
        }
        if !(self.priority_fee_gwei >= 0.0) {
            return Err(invalid("priority_fee_gwei", "must be non-negative"));
        }
        if self.confirm_timeout_secs == 0 {
            return Err(invalid("confirm_timeout_secs", "must be positive"));
        }
        Ok(())
    }

    pub fn inbox_address(&self) -> ConfigResult<Address> {
        self.inbox_address
            .parse()
            .map_err(|e: alloy::hex::FromHexError| ConfigError::InvalidAddress {
                source: ExternalError::from(e.to_string()),
            })
    }

    /// Priority fee converted to the chain's smallest unit.
    pub fn priority_fee_wei(&self) -> u128 {
        gwei_to_wei(self.priority_fee_gwei)
    }
}

pub fn gwei_to_wei(gwei: f64) -> u128 {
    (gwei * 1e9).floor() as u128
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidRange {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> Config {
        Config {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: None,
            inbox_address: "0x000000000000000000000000000000000000dead".to_string(),
            min_tx_per_day: 2,
            max_tx_per_day: 5,
            min_amount_eth: 0.001,
            max_amount_eth: 0.01,
            min_delay_secs: 30,
            max_delay_secs: 600,
            priority_fee_gwei: 1.5,
            utc_offset_minutes: 0,
            confirm_timeout_secs: 300,
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_zero_min_tx_per_day() {
        let mut config = valid_config();
        config.min_tx_per_day = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange {
                field: "min_tx_per_day",
                ..
            })
        ));
    }

    #[test]
    fn rejects_inverted_tx_range() {
        let mut config = valid_config();
        config.min_tx_per_day = 6;
        config.max_tx_per_day = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_amount_range() {
        let mut config = valid_config();
        config.min_amount_eth = 0.02;
        config.max_amount_eth = 0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_amount_bound() {
        let mut config = valid_config();
        config.max_amount_eth = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_delay_range() {
        let mut config = valid_config();
        config.min_delay_secs = 10;
        config.max_delay_secs = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_negative_priority_fee() {
        let mut config = valid_config();
        config.priority_fee_gwei = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_inbox_address() {
        let config = valid_config();
        let addr = config.inbox_address().unwrap();
        assert_eq!(addr, "0x000000000000000000000000000000000000dead".parse::<Address>().unwrap());
    }

    #[test]
    fn rejects_bad_inbox_address() {
        let mut config = valid_config();
        config.inbox_address = "not-an-address".to_string();
        assert!(matches!(config.inbox_address(), Err(ConfigError::InvalidAddress { .. })));
    }

    #[test]
    fn gwei_conversion_floors_fractional_wei() {
        assert_eq!(gwei_to_wei(1.0), 1_000_000_000);
        assert_eq!(gwei_to_wei(0.5), 500_000_000);
        assert_eq!(gwei_to_wei(1.5), 1_500_000_000);
        // sub-wei fractions are dropped
        assert_eq!(gwei_to_wei(0.000_000_000_4), 0);
    }

    #[test]
    fn load_applies_defaults_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "rpc_url": "http://localhost:8545",
                "inbox_address": "0x000000000000000000000000000000000000dead",
                "min_tx_per_day": 1,
                "max_tx_per_day": 3,
                "min_amount_eth": 0.001,
                "max_amount_eth": 0.002,
                "min_delay_secs": 0,
                "max_delay_secs": 60,
                "priority_fee_gwei": 1.0
            }}"#
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.chain_id, None);
        assert_eq!(config.utc_offset_minutes, 0);
        assert_eq!(config.confirm_timeout_secs, 300);
    }

    #[test]
    fn load_rejects_invalid_ranges() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
                "rpc_url": "http://localhost:8545",
                "inbox_address": "0x000000000000000000000000000000000000dead",
                "min_tx_per_day": 5,
                "max_tx_per_day": 3,
                "min_amount_eth": 0.001,
                "max_amount_eth": 0.002,
                "min_delay_secs": 0,
                "max_delay_secs": 60,
                "priority_fee_gwei": 1.0
            }}"#
        )
        .unwrap();

        assert!(matches!(Config::load(&path), Err(ConfigError::InvalidRange { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("/definitely/missing/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
        assert_eq!(err.code(), ErrorCode::ConfigReadFile);
    }
}
