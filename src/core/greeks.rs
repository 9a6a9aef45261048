//! Option Greeks
//!
//! First and second order sensitivities, in the scaled units the pricer reports:
//! vega and rho per one percentage point, theta per calendar day.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Option Greeks (sensitivities)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Vega: dV/dσ per 1% vol move
    pub vega: f64,
    /// Theta: dV/dt per calendar day
    pub theta: f64,
    /// Rho: dV/dr per 1% rate move
    pub rho: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, vega: f64, theta: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            vega,
            theta,
            rho,
        }
    }

    /// Value of a single sensitivity
    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
            Greek::Rho => self.rho,
        }
    }

    /// (greek, value) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Greek, f64)> + '_ {
        Greek::ALL.into_iter().map(move |g| (g, self.get(g)))
    }
}

/// Names one of the five sensitivities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Greek {
    Delta,
    Gamma,
    Vega,
    Theta,
    Rho,
}

impl Greek {
    pub const ALL: [Greek; 5] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Vega,
        Greek::Theta,
        Greek::Rho,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Greek::Delta => "Delta",
            Greek::Gamma => "Gamma",
            Greek::Vega => "Vega",
            Greek::Theta => "Theta",
            Greek::Rho => "Rho",
        }
    }

    /// Unit the value is expressed in
    pub fn unit(&self) -> &'static str {
        match self {
            Greek::Delta => "per $1 spot",
            Greek::Gamma => "per $1 spot, squared",
            Greek::Vega => "per 1% vol",
            Greek::Theta => "per day",
            Greek::Rho => "per 1% rate",
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_matches_fields() {
        let g = Greeks::new(0.5, 0.02, 0.4, -0.01, 0.3);
        assert_eq!(g.get(Greek::Delta), 0.5);
        assert_eq!(g.get(Greek::Gamma), 0.02);
        assert_eq!(g.get(Greek::Vega), 0.4);
        assert_eq!(g.get(Greek::Theta), -0.01);
        assert_eq!(g.get(Greek::Rho), 0.3);
    }

    #[test]
    fn test_iter_order() {
        let g = Greeks::new(1.0, 2.0, 3.0, 4.0, 5.0);
        let labels: Vec<&str> = g.iter().map(|(k, _)| k.label()).collect();
        assert_eq!(labels, ["Delta", "Gamma", "Vega", "Theta", "Rho"]);
        let values: Vec<f64> = g.iter().map(|(_, v)| v).collect();
        assert_eq!(values, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
