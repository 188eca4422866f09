//! Typed view over the merged config JSON.
//!
//! Every key is optional; absent keys take the defaults below. Present keys
//! with the wrong type or an out-of-range value are errors, not defaults.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8899";

const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://127.0.0.1",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DiscountSettings {
    pub code: String,
    pub percent: u32,
}

impl Default for DiscountSettings {
    fn default() -> Self {
        Self {
            code: "SAVE10".to_string(),
            percent: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSettings {
    pub daemon: DaemonSettings,
    pub pagination: PaginationSettings,
    pub discount: DiscountSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDaemon {
    bind_addr: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCors {
    allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    daemon: RawDaemon,
    cors: RawCors,
    pagination: PaginationSettings,
    discount: DiscountSettings,
}

impl StoreSettings {
    pub fn from_config_json(config_json: &Value) -> Result<Self> {
        let raw: RawSettings = if config_json.is_null() {
            RawSettings::default()
        } else {
            serde_json::from_value(config_json.clone()).context("CONFIG_INVALID: settings shape")?
        };

        let mut daemon = DaemonSettings::default();
        if let Some(addr) = raw.daemon.bind_addr {
            daemon.bind_addr = addr;
        }
        if let Some(origins) = raw.cors.allowed_origins {
            daemon.allowed_origins = origins;
        }

        let settings = Self {
            daemon,
            pagination: raw.pagination,
            discount: raw.discount,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.daemon.bind_addr.trim().is_empty() {
            bail!("CONFIG_INVALID: daemon.bind_addr must not be empty");
        }
        if self.pagination.default_limit == 0 || self.pagination.max_limit == 0 {
            bail!("CONFIG_INVALID: pagination limits must be >= 1");
        }
        if self.pagination.default_limit > self.pagination.max_limit {
            bail!(
                "CONFIG_INVALID: pagination.default_limit ({}) exceeds max_limit ({})",
                self.pagination.default_limit,
                self.pagination.max_limit
            );
        }
        if self.discount.code.trim().is_empty() {
            bail!("CONFIG_INVALID: discount.code must not be empty");
        }
        if !(1..=100).contains(&self.discount.percent) {
            bail!(
                "CONFIG_INVALID: discount.percent must be within 1..=100 (got {})",
                self.discount.percent
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_config_yields_defaults() {
        let s = StoreSettings::from_config_json(&json!({})).unwrap();
        assert_eq!(s, StoreSettings::default());
        assert_eq!(s.daemon.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(s.discount.code, "SAVE10");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let s = StoreSettings::from_config_json(&json!({
            "pagination": { "max_limit": 50 },
            "discount": { "percent": 15 }
        }))
        .unwrap();
        assert_eq!(s.pagination.default_limit, 10);
        assert_eq!(s.pagination.max_limit, 50);
        assert_eq!(s.discount.code, "SAVE10");
        assert_eq!(s.discount.percent, 15);
    }

    #[test]
    fn out_of_range_percent_is_rejected() {
        let err = StoreSettings::from_config_json(&json!({ "discount": { "percent": 0 } }))
            .unwrap_err();
        assert!(err.to_string().contains("discount.percent"));
    }

    #[test]
    fn default_above_max_is_rejected() {
        let err = StoreSettings::from_config_json(&json!({
            "pagination": { "default_limit": 20, "max_limit": 5 }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("exceeds max_limit"));
    }

    #[test]
    fn wrong_type_is_an_error_not_a_default() {
        assert!(StoreSettings::from_config_json(&json!({ "discount": { "percent": "ten" } })).is_err());
    }
}
