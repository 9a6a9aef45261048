//! Core data types for the pricer
//!
//! Defines fundamental types:
//! - OptionParams: spot, strike, time, rate, volatility
//! - OptionType: call/put selector
//! - Greeks: the five sensitivities
//! - BsError: error taxonomy

pub mod error;
pub mod greeks;
pub mod option;

pub use error::*;
pub use greeks::*;
pub use option::*;
