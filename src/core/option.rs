//! Option contract parameters
//!
//! The five market/contract inputs of a European option plus the call/put selector.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{BsError, BsResult};

/// Days per year used to convert calendar dates into year fractions (ACT/365)
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub const ALL: [OptionType; 2] = [OptionType::Call, OptionType::Put];

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionType::Call => "CALL",
            OptionType::Put => "PUT",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for OptionType {
    type Err = BsError;

    /// Accepts `call`/`c` and `put`/`p`, case-insensitive. Anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(BsError::UnknownOptionType(s.to_string())),
        }
    }
}

/// Black-Scholes inputs for a single evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParams {
    /// Current underlying price (S)
    pub spot: f64,
    /// Strike price (K)
    pub strike: f64,
    /// Time to expiry in years (T)
    pub time_to_expiry: f64,
    /// Continuously-compounded annual risk-free rate (r)
    pub risk_free_rate: f64,
    /// Annualized volatility of log-returns (sigma)
    pub volatility: f64,
}

impl OptionParams {
    /// Create validated parameters
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        volatility: f64,
    ) -> BsResult<Self> {
        let params = Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            volatility,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the domain constraints of the closed-form solution.
    ///
    /// Spot, strike, time and volatility must be finite and strictly positive; the
    /// rate may take any finite value. NaN fails every check.
    pub fn validate(&self) -> BsResult<()> {
        check_positive("spot", self.spot)?;
        check_positive("strike", self.strike)?;
        check_positive("time_to_expiry", self.time_to_expiry)?;
        check_positive("volatility", self.volatility)?;
        if !self.risk_free_rate.is_finite() {
            return Err(BsError::invalid_parameter(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }

    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    pub fn with_strike(self, strike: f64) -> Self {
        Self { strike, ..self }
    }

    pub fn with_time_to_expiry(self, time_to_expiry: f64) -> Self {
        Self {
            time_to_expiry,
            ..self
        }
    }

    pub fn with_risk_free_rate(self, risk_free_rate: f64) -> Self {
        Self {
            risk_free_rate,
            ..self
        }
    }

    pub fn with_volatility(self, volatility: f64) -> Self {
        Self { volatility, ..self }
    }

    /// Discount factor exp(-rT)
    pub fn discount_factor(&self) -> f64 {
        (-self.risk_free_rate * self.time_to_expiry).exp()
    }

    /// Present value of the strike, K*exp(-rT)
    pub fn discounted_strike(&self) -> f64 {
        self.strike * self.discount_factor()
    }
}

/// Year fraction between two dates (ACT/365)
pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

fn check_positive(name: &str, value: f64) -> BsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BsError::invalid_parameter(format!(
            "{} must be finite and > 0, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atm() -> OptionParams {
        OptionParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
    }

    #[test]
    fn test_option_type() {
        assert_eq!(OptionType::Call.intrinsic(110.0, 100.0), 10.0);
        assert_eq!(OptionType::Put.intrinsic(90.0, 100.0), 10.0);
        assert_eq!(OptionType::Call.intrinsic(90.0, 100.0), 0.0);
    }

    #[test]
    fn test_parse_option_type() {
        assert_eq!("call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" PUT ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("c".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!("P".parse::<OptionType>().unwrap(), OptionType::Put);
    }

    #[test]
    fn test_parse_rejects_unknown_option_type() {
        for bad in ["cal", "straddle", "", "puts"] {
            match bad.parse::<OptionType>() {
                Err(BsError::UnknownOptionType(s)) => assert_eq!(s, bad),
                other => panic!("expected UnknownOptionType for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_validation() {
        assert!(OptionParams::new(0.0, 100.0, 1.0, 0.05, 0.2).is_err());
        assert!(OptionParams::new(100.0, -5.0, 1.0, 0.05, 0.2).is_err());
        assert!(OptionParams::new(100.0, 100.0, 0.0, 0.05, 0.2).is_err());
        assert!(OptionParams::new(100.0, 100.0, 1.0, 0.05, 0.0).is_err());
        assert!(OptionParams::new(f64::NAN, 100.0, 1.0, 0.05, 0.2).is_err());
        assert!(OptionParams::new(100.0, 100.0, f64::INFINITY, 0.05, 0.2).is_err());
        assert!(OptionParams::new(100.0, 100.0, 1.0, f64::NAN, 0.2).is_err());

        // Negative rates are allowed
        assert!(OptionParams::new(100.0, 100.0, 1.0, -0.01, 0.2).is_ok());
    }

    #[test]
    fn test_builders_keep_other_fields() {
        let p = atm().with_spot(120.0).with_volatility(0.3);
        assert_eq!(p.spot, 120.0);
        assert_eq!(p.volatility, 0.3);
        assert_eq!(p.strike, 100.0);
        assert_eq!(p.time_to_expiry, 1.0);
    }

    #[test]
    fn test_discounting() {
        let p = atm();
        assert!((p.discounted_strike() - 100.0 * (-0.05_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_years_between() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!((years_between(from, to) - 1.0).abs() < 1e-12);
        assert!(years_between(to, from) < 0.0);
    }
}
