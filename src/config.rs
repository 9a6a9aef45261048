//! Application configuration
//!
//! Everything tunable outside the formulas, loadable from a TOML file. Missing
//! sections and fields fall back to their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{BsError, BsResult};
use crate::data::{CacheConfig, YahooConfig};
use crate::sweep::SweepConfig;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub yahoo: YahooConfig,
    pub cache: CacheConfig,
    pub sweep: SweepConfig,
    pub defaults: DefaultInputs,
}

/// Starting values for inputs the user may leave to defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultInputs {
    pub spot: f64,
    pub strike: f64,
    /// Years
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
}

impl Default for DefaultInputs {
    fn default() -> Self {
        Self {
            spot: 100.0,
            strike: 100.0,
            time_to_expiry: 1.0,
            risk_free_rate: 0.05,
            volatility: 0.2,
        }
    }
}

impl AppConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> BsResult<Self> {
        toml::from_str(text).map_err(|e| BsError::config(e.to_string()))
    }

    /// Load from a file
    pub fn load(path: impl AsRef<Path>) -> BsResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| BsError::config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load when the file exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> BsResult<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> BsResult<String> {
        toml::to_string_pretty(self).map_err(|e| BsError::Serialization(e.to_string()))
    }
}
