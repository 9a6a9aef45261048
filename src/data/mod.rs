//! Market data
//!
//! Handles:
//! - Yahoo Finance spot price and daily history (free, delayed)
//! - Historical volatility estimation
//! - Local caching and a static in-memory source
//!
//! Every source hands the pricer a `StockInfo`: a spot price and a volatility
//! estimate. How the estimate was produced stays behind the trait.

pub mod cache;
pub mod volatility;
pub mod yahoo;

pub use cache::*;
pub use volatility::*;
pub use yahoo::*;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{BsError, BsResult};

/// Snapshot of an underlying: current price and volatility estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Ticker symbol, upper-cased
    pub symbol: String,
    /// Company or fund name ("N/A" when unknown)
    pub name: String,
    /// Latest close
    pub current_price: f64,
    /// Annualized historical volatility
    pub volatility: f64,
    /// Quote currency
    pub currency: String,
    /// When the snapshot was taken
    pub as_of: DateTime<Utc>,
}

/// Supplier of (spot, volatility) for a ticker
pub trait MarketDataSource {
    fn stock_info(&self, symbol: &str) -> BsResult<StockInfo>;
}

impl<S: MarketDataSource + ?Sized> MarketDataSource for &S {
    fn stock_info(&self, symbol: &str) -> BsResult<StockInfo> {
        (**self).stock_info(symbol)
    }
}

impl<S: MarketDataSource + ?Sized> MarketDataSource for Box<S> {
    fn stock_info(&self, symbol: &str) -> BsResult<StockInfo> {
        (**self).stock_info(symbol)
    }
}

/// Fixed in-memory quotes, for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    quotes: HashMap<String, StockInfo>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a quote
    pub fn insert(&mut self, info: StockInfo) {
        self.quotes.insert(info.symbol.to_uppercase(), info);
    }

    pub fn with(mut self, info: StockInfo) -> Self {
        self.insert(info);
        self
    }

    pub fn with_quote(self, symbol: &str, price: f64, volatility: f64) -> Self {
        self.with(StockInfo {
            symbol: symbol.to_uppercase(),
            name: "N/A".to_string(),
            current_price: price,
            volatility,
            currency: "USD".to_string(),
            as_of: Utc::now(),
        })
    }
}

impl MarketDataSource for StaticSource {
    fn stock_info(&self, symbol: &str) -> BsResult<StockInfo> {
        self.quotes
            .get(&symbol.trim().to_uppercase())
            .cloned()
            .ok_or_else(|| BsError::data(format!("no data for {}", symbol)))
    }
}
