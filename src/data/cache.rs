//! Local data caching
//!
//! Caches stock snapshots locally to reduce API calls and enable offline runs.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{MarketDataSource, StockInfo};
use crate::core::{BsError, BsResult};

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory
    pub cache_dir: PathBuf,
    /// Maximum age before refresh (in hours)
    pub max_age_hours: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./data/cache"),
            max_age_hours: 24,
            enabled: true,
        }
    }
}

/// Data cache manager
pub struct DataCache {
    config: CacheConfig,
}

impl DataCache {
    pub fn new(config: CacheConfig) -> BsResult<Self> {
        if config.enabled && !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir)?;
        }

        Ok(Self { config })
    }

    fn cache_path(&self, symbol: &str) -> PathBuf {
        self.config
            .cache_dir
            .join(format!("{}_info.json", symbol.trim().to_uppercase()))
    }

    /// Check if cache is valid (exists and not expired)
    pub fn is_valid(&self, symbol: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let path = self.cache_path(symbol);
        let Ok(modified) = fs::metadata(&path).and_then(|m| m.modified()) else {
            return false;
        };
        let modified: DateTime<Utc> = modified.into();
        // Ages too large for a Duration never expire
        match Duration::try_hours(self.config.max_age_hours) {
            Some(max_age) => Utc::now() - modified < max_age,
            None => true,
        }
    }

    /// Save a snapshot to cache
    pub fn save(&self, info: &StockInfo) -> BsResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let path = self.cache_path(&info.symbol);
        let json = serde_json::to_string_pretty(info)
            .map_err(|e| BsError::Serialization(e.to_string()))?;
        fs::write(&path, json)?;

        tracing::info!("Cached {} at {:?}", info.symbol, path);
        Ok(())
    }

    /// Load a snapshot from cache, `None` when missing or stale
    pub fn load(&self, symbol: &str) -> BsResult<Option<StockInfo>> {
        if !self.is_valid(symbol) {
            return Ok(None);
        }

        let json = fs::read_to_string(self.cache_path(symbol))?;
        let info: StockInfo =
            serde_json::from_str(&json).map_err(|e| BsError::Serialization(e.to_string()))?;

        tracing::debug!("Loaded {} from cache", symbol);
        Ok(Some(info))
    }

    /// Clear cache for a symbol
    pub fn clear(&self, symbol: &str) -> BsResult<()> {
        let path = self.cache_path(symbol);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// List cached symbols
    pub fn list_cached(&self) -> BsResult<Vec<String>> {
        let mut symbols = Vec::new();

        if !self.config.cache_dir.exists() {
            return Ok(symbols);
        }

        for entry in fs::read_dir(&self.config.cache_dir)? {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if let Some(symbol) = file_name.strip_suffix("_info.json") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}

/// Cached data source - serves fresh snapshots from disk, otherwise asks `inner`
pub struct CachedSource<S> {
    cache: DataCache,
    inner: S,
}

impl<S: MarketDataSource> CachedSource<S> {
    pub fn new(inner: S, config: CacheConfig) -> BsResult<Self> {
        Ok(Self {
            cache: DataCache::new(config)?,
            inner,
        })
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    /// Force refresh (bypass cache)
    pub fn refresh(&self, symbol: &str) -> BsResult<StockInfo> {
        self.cache.clear(symbol)?;
        self.stock_info(symbol)
    }
}

impl<S: MarketDataSource> MarketDataSource for CachedSource<S> {
    fn stock_info(&self, symbol: &str) -> BsResult<StockInfo> {
        // A broken cache file should not block a live fetch
        match self.cache.load(symbol) {
            Ok(Some(info)) => return Ok(info),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring unreadable cache for {}: {}", symbol, e),
        }

        tracing::info!("Fetching fresh data for {}", symbol);
        let info = self.inner.stock_info(symbol)?;

        if let Err(e) = self.cache.save(&info) {
            tracing::warn!("Failed to cache {}: {}", symbol, e);
        }

        Ok(info)
    }
}
