//! Historical volatility estimation
//!
//! Annualized standard deviation of periodic returns from a close-price series.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::core::{BsError, BsResult};

/// Trading days used to annualize daily returns
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// How period returns are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnKind {
    /// (p1 - p0) / p0
    #[default]
    Simple,
    /// ln(p1 / p0)
    Log,
}

/// Period-over-period returns. Pairs containing a non-positive or non-finite price
/// are skipped.
pub fn returns(closes: &[f64], kind: ReturnKind) -> Vec<f64> {
    closes
        .windows(2)
        .filter(|w| w.iter().all(|p| p.is_finite() && *p > 0.0))
        .map(|w| match kind {
            ReturnKind::Simple => w[1] / w[0] - 1.0,
            ReturnKind::Log => (w[1] / w[0]).ln(),
        })
        .collect()
}

/// Annualized volatility: sample standard deviation (n-1) of returns times
/// sqrt(periods_per_year)
pub fn historical_volatility(
    closes: &[f64],
    kind: ReturnKind,
    periods_per_year: f64,
) -> BsResult<f64> {
    let rets = returns(closes, kind);
    if rets.len() < 2 {
        return Err(BsError::data(format!(
            "need at least 2 valid returns to estimate volatility, got {}",
            rets.len()
        )));
    }
    if periods_per_year.is_nan() || periods_per_year <= 0.0 {
        return Err(BsError::invalid_parameter(format!(
            "periods_per_year must be > 0, got {}",
            periods_per_year
        )));
    }

    let std_dev = rets.iter().std_dev();
    if !std_dev.is_finite() {
        return Err(BsError::data("volatility estimate is not finite"));
    }
    Ok(std_dev * periods_per_year.sqrt())
}
