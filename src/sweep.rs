//! One-parameter sweeps
//!
//! Price and Greek curves obtained by varying a single input while the others stay
//! fixed. These feed the chart viewer.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::core::{BsError, BsResult, Greek, OptionParams, OptionType};
use crate::models::black_scholes;

/// Input varied along a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepVariable {
    Spot,
    Strike,
    Volatility,
    Time,
    Rate,
}

impl SweepVariable {
    /// Axis label for charts
    pub fn label(&self) -> &'static str {
        match self {
            SweepVariable::Spot => "Stock Price ($)",
            SweepVariable::Strike => "Strike Price ($)",
            SweepVariable::Volatility => "Volatility (%)",
            SweepVariable::Time => "Time to Expiration (years)",
            SweepVariable::Rate => "Risk-free Rate (%)",
        }
    }

    /// Multiplier from the raw value to the displayed axis value
    pub fn display_scale(&self) -> f64 {
        match self {
            SweepVariable::Volatility | SweepVariable::Rate => 100.0,
            _ => 1.0,
        }
    }

    /// Replace this input in `base`
    pub fn apply(&self, base: &OptionParams, x: f64) -> OptionParams {
        match self {
            SweepVariable::Spot => base.with_spot(x),
            SweepVariable::Strike => base.with_strike(x),
            SweepVariable::Volatility => base.with_volatility(x),
            SweepVariable::Time => base.with_time_to_expiry(x),
            SweepVariable::Rate => base.with_risk_free_rate(x),
        }
    }
}

/// Evenly spaced grid, endpoints included
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl SweepRange {
    pub fn new(start: f64, end: f64, points: usize) -> BsResult<Self> {
        let range = Self { start, end, points };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> BsResult<()> {
        if self.points < 2 {
            return Err(BsError::invalid_parameter(format!(
                "sweep needs at least 2 points, got {}",
                self.points
            )));
        }
        if !self.start.is_finite() || !self.end.is_finite() || self.start == self.end {
            return Err(BsError::invalid_parameter(format!(
                "sweep interval [{}, {}] is empty or not finite",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn grid(&self) -> Array1<f64> {
        Array1::linspace(self.start, self.end, self.points)
    }
}

/// Sweep grid settings: point count and relative/absolute bounds per variable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub points: usize,
    /// Spot bounds as multiples of the strike
    pub spot_multiple: (f64, f64),
    /// Strike bounds as multiples of the spot
    pub strike_multiple: (f64, f64),
    pub volatility: (f64, f64),
    /// Years
    pub time: (f64, f64),
    pub rate: (f64, f64),
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            points: 100,
            spot_multiple: (0.5, 1.5),
            strike_multiple: (0.5, 1.5),
            volatility: (0.05, 0.80),
            time: (0.01, 2.0),
            rate: (0.0, 0.10),
        }
    }
}

impl SweepConfig {
    /// Grid for `variable` around `base`
    pub fn range_for(&self, variable: SweepVariable, base: &OptionParams) -> SweepRange {
        let (start, end) = match variable {
            SweepVariable::Spot => (
                base.strike * self.spot_multiple.0,
                base.strike * self.spot_multiple.1,
            ),
            SweepVariable::Strike => (
                base.spot * self.strike_multiple.0,
                base.spot * self.strike_multiple.1,
            ),
            SweepVariable::Volatility => self.volatility,
            SweepVariable::Time => self.time,
            SweepVariable::Rate => self.rate,
        };
        SweepRange {
            start,
            end,
            points: self.points,
        }
    }
}

/// Call and put prices along a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceCurve {
    pub variable: SweepVariable,
    pub xs: Vec<f64>,
    pub call: Vec<f64>,
    pub put: Vec<f64>,
}

impl PriceCurve {
    /// (x, price) pairs with x in display units
    pub fn points(&self, option_type: OptionType) -> Vec<[f64; 2]> {
        let ys = match option_type {
            OptionType::Call => &self.call,
            OptionType::Put => &self.put,
        };
        let scale = self.variable.display_scale();
        self.xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| [x * scale, y])
            .collect()
    }
}

/// Price both option types at every grid point
pub fn price_curve(
    base: &OptionParams,
    variable: SweepVariable,
    range: &SweepRange,
) -> BsResult<PriceCurve> {
    range.validate()?;
    let xs = range.grid().to_vec();
    let mut call = Vec::with_capacity(xs.len());
    let mut put = Vec::with_capacity(xs.len());

    for &x in &xs {
        let params = variable.apply(base, x);
        call.push(black_scholes::price(&params, OptionType::Call)?);
        put.push(black_scholes::price(&params, OptionType::Put)?);
    }

    Ok(PriceCurve {
        variable,
        xs,
        call,
        put,
    })
}

/// One Greek at every grid point, as (x in display units, value) pairs
pub fn greek_curve(
    base: &OptionParams,
    variable: SweepVariable,
    range: &SweepRange,
    greek: Greek,
    option_type: OptionType,
) -> BsResult<Vec<[f64; 2]>> {
    range.validate()?;
    let scale = variable.display_scale();
    range
        .grid()
        .iter()
        .map(|&x| -> BsResult<[f64; 2]> {
            let g = black_scholes::greeks(&variable.apply(base, x), option_type)?;
            Ok([x * scale, g.get(greek)])
        })
        .collect()
}
