//! Pricing models
//!
//! Implements:
//! - Black-Scholes (European, no dividends): price, Greeks, batch valuation

pub mod black_scholes;

pub use black_scholes::*;
