//! Black-Scholes Model
//!
//! Provides:
//! - European option pricing (no dividends)
//! - Greeks computation
//! - Parallel batch valuation
//!
//! Every entry point validates its parameters before touching a formula, so a
//! zero volatility or expiry is reported as an error instead of surfacing as NaN.
//! Results that still overflow (e.g. exp(-rT) for a long, negative-rate contract)
//! are rejected the same way.

use std::f64::consts::{PI, SQRT_2};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::core::{BsError, BsResult, Greeks, OptionParams, OptionType};

/// Standard normal CDF
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Intermediate terms shared by the price and every Greek
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DTerms {
    pub d1: f64,
    pub d2: f64,
    /// sqrt(T)
    pub sqrt_t: f64,
    /// exp(-rT)
    pub discount: f64,
}

impl DTerms {
    /// Compute d1/d2 for already validated parameters.
    ///
    /// Inputs that are individually valid can still overflow sigma^2*T or exp(-rT);
    /// those are rejected here so no infinite term reaches a formula.
    fn compute(p: &OptionParams) -> BsResult<Self> {
        let sqrt_t = p.time_to_expiry.sqrt();
        let vol_sqrt_t = p.volatility * sqrt_t;
        let variance = p.volatility * p.volatility * p.time_to_expiry;
        let d1 = ((p.spot / p.strike).ln()
            + (p.risk_free_rate + 0.5 * p.volatility * p.volatility) * p.time_to_expiry)
            / vol_sqrt_t;
        let terms = Self {
            d1,
            d2: d1 - vol_sqrt_t,
            sqrt_t,
            discount: p.discount_factor(),
        };

        if !variance.is_finite()
            || !terms.d1.is_finite()
            || !terms.d2.is_finite()
            || !terms.discount.is_finite()
        {
            return Err(out_of_range(p, "d1/d2 or discount factor overflow"));
        }
        Ok(terms)
    }
}

/// Validate and compute the d1/d2 terms
pub fn d_terms(params: &OptionParams) -> BsResult<DTerms> {
    params.validate()?;
    DTerms::compute(params)
}

/// Price and Greeks of one contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub option_type: OptionType,
    pub price: f64,
    pub greeks: Greeks,
}

/// Black-Scholes European option price
pub fn price(params: &OptionParams, option_type: OptionType) -> BsResult<f64> {
    let d = d_terms(params)?;
    price_from_terms(params, option_type, &d)
}

/// Black-Scholes Greeks
pub fn greeks(params: &OptionParams, option_type: OptionType) -> BsResult<Greeks> {
    let d = d_terms(params)?;
    greeks_from_terms(params, option_type, &d)
}

/// Price and Greeks from a single d1/d2 evaluation
pub fn value(params: &OptionParams, option_type: OptionType) -> BsResult<Valuation> {
    let d = d_terms(params)?;
    Ok(Valuation {
        option_type,
        price: price_from_terms(params, option_type, &d)?,
        greeks: greeks_from_terms(params, option_type, &d)?,
    })
}

/// Call and put valuations for the same parameters
pub fn value_both(params: &OptionParams) -> BsResult<(Valuation, Valuation)> {
    Ok((
        value(params, OptionType::Call)?,
        value(params, OptionType::Put)?,
    ))
}

/// Value independent requests in parallel.
///
/// Output order matches input order and each request fails on its own.
pub fn value_batch(requests: &[(OptionParams, OptionType)]) -> Vec<BsResult<Valuation>> {
    tracing::debug!(count = requests.len(), "valuing batch");
    requests
        .par_iter()
        .map(|(params, option_type)| value(params, *option_type))
        .collect()
}

fn out_of_range(p: &OptionParams, what: &str) -> BsError {
    BsError::invalid_parameter(format!(
        "{} for S={}, K={}, T={}, r={}, sigma={}",
        what, p.spot, p.strike, p.time_to_expiry, p.risk_free_rate, p.volatility
    ))
}

fn price_from_terms(p: &OptionParams, option_type: OptionType, d: &DTerms) -> BsResult<f64> {
    let pv_strike = p.strike * d.discount;
    let price = match option_type {
        OptionType::Call => p.spot * norm_cdf(d.d1) - pv_strike * norm_cdf(d.d2),
        OptionType::Put => pv_strike * norm_cdf(-d.d2) - p.spot * norm_cdf(-d.d1),
    };
    if !price.is_finite() {
        return Err(out_of_range(p, "price is not finite"));
    }
    // Cancellation can leave a few ulps below zero deep out of the money
    Ok(price.max(0.0))
}

fn greeks_from_terms(
    p: &OptionParams,
    option_type: OptionType,
    d: &DTerms,
) -> BsResult<Greeks> {
    let pdf_d1 = norm_pdf(d.d1);
    let pv_strike = p.strike * d.discount;

    // Delta
    let delta = match option_type {
        OptionType::Call => norm_cdf(d.d1),
        OptionType::Put => norm_cdf(d.d1) - 1.0,
    };

    // Gamma and vega do not depend on the option type
    let gamma = pdf_d1 / (p.spot * p.volatility * d.sqrt_t);
    let vega = p.spot * pdf_d1 * d.sqrt_t / 100.0;

    // Theta (per day)
    let decay = -p.spot * pdf_d1 * p.volatility / (2.0 * d.sqrt_t);
    let theta = match option_type {
        OptionType::Call => decay - p.risk_free_rate * pv_strike * norm_cdf(d.d2),
        OptionType::Put => decay + p.risk_free_rate * pv_strike * norm_cdf(-d.d2),
    };
    let theta_per_day = theta / 365.0;

    // Rho (per 1% rate move)
    let rho = match option_type {
        OptionType::Call => p.time_to_expiry * pv_strike * norm_cdf(d.d2) / 100.0,
        OptionType::Put => -p.time_to_expiry * pv_strike * norm_cdf(-d.d2) / 100.0,
    };

    let greeks = Greeks::new(delta, gamma, vega, theta_per_day, rho);
    if let Some((greek, _)) = greeks.iter().find(|(_, v)| !v.is_finite()) {
        return Err(out_of_range(p, &format!("{} is not finite", greek)));
    }
    Ok(greeks)
}
