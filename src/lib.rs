//! # BS Options - Black-Scholes Pricing and Greeks
//!
//! Closed-form prices and sensitivities for European options on non-dividend
//! paying underlyings, optionally seeded with live market data.
//!
//! ## Key Components
//!
//! - **Black-Scholes**: price, delta, gamma, vega, theta, rho from one d1/d2 pass
//! - **Market Data**: Yahoo Finance spot and historical volatility, disk cache
//! - **Engine**: pricing seeded by any `MarketDataSource`
//! - **Sweeps**: price and Greek curves against one varying input
//!
//! ## Usage
//!
//! ```rust
//! use bs_options::prelude::*;
//!
//! let params = OptionParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap();
//! let call = bs_price(&params, OptionType::Call).unwrap();
//! let greeks = bs_greeks(&params, OptionType::Call).unwrap();
//!
//! assert!((call - 10.45).abs() < 1e-2);
//! assert!(greeks.delta > 0.5 && greeks.delta < 1.0);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - American exercise or dividends
//! - Implied volatility solving
//! - Any model other than Black-Scholes
//! - Limiting behaviour at expiry or zero volatility (those inputs are rejected)

pub mod config;
pub mod core;
pub mod data;
pub mod engine;
pub mod models;
pub mod sweep;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        years_between, BsError, BsResult, Greek, Greeks, OptionParams, OptionType,
    };

    // Pricing
    pub use crate::models::{
        greeks as bs_greeks, norm_cdf, norm_pdf, price as bs_price, value, value_batch,
        value_both, Valuation,
    };

    // Market data
    pub use crate::data::{
        historical_volatility, CacheConfig, CachedSource, MarketDataSource, ReturnKind,
        StaticSource, StockInfo, YahooClient, YahooConfig,
    };

    // Engine
    pub use crate::engine::{quote, ContractTerms, MarketQuote, PricingEngine, Quote};

    // Sweeps and configuration
    pub use crate::config::AppConfig;
    pub use crate::sweep::{
        greek_curve, price_curve, PriceCurve, SweepConfig, SweepRange, SweepVariable,
    };
}

// Re-export main types at crate root
pub use crate::core::{BsError, BsResult, Greeks, OptionParams, OptionType};
pub use crate::engine::PricingEngine;
