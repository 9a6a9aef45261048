//! Pricing engine seeded by a market-data source
//!
//! The one place where market data meets the Black-Scholes formulas. The source is
//! injected, so live Yahoo data, a disk cache and fixed test quotes all share the
//! same pricing path.

use serde::{Deserialize, Serialize};

use crate::core::{BsResult, OptionParams, OptionType};
use crate::data::{MarketDataSource, StockInfo};
use crate::models::black_scholes::{self, Valuation};

/// Contract terms supplied by the user when spot and volatility come from data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub strike: f64,
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
    /// Replaces the estimated volatility when set
    pub volatility_override: Option<f64>,
}

/// Call and put valuations for one parameter set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub params: OptionParams,
    pub call: Valuation,
    pub put: Valuation,
}

impl Quote {
    pub fn get(&self, option_type: OptionType) -> &Valuation {
        match option_type {
            OptionType::Call => &self.call,
            OptionType::Put => &self.put,
        }
    }
}

/// Quote for a ticker together with the snapshot that seeded it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub stock: StockInfo,
    pub quote: Quote,
}

pub struct PricingEngine<S> {
    source: S,
}

impl<S: MarketDataSource> PricingEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Snapshot for a ticker, straight from the source
    pub fn stock_info(&self, symbol: &str) -> BsResult<StockInfo> {
        self.source.stock_info(symbol)
    }

    /// Build parameters from a snapshot and user terms
    pub fn params_for(&self, stock: &StockInfo, terms: &ContractTerms) -> BsResult<OptionParams> {
        OptionParams::new(
            stock.current_price,
            terms.strike,
            terms.time_to_expiry,
            terms.risk_free_rate,
            terms.volatility_override.unwrap_or(stock.volatility),
        )
    }

    /// Fetch a snapshot and value both option types on it
    pub fn quote_symbol(&self, symbol: &str, terms: &ContractTerms) -> BsResult<MarketQuote> {
        let stock = self.source.stock_info(symbol)?;
        let params = self.params_for(&stock, terms)?;
        tracing::debug!(symbol = %stock.symbol, ?params, "pricing from market data");
        Ok(MarketQuote {
            quote: quote(&params)?,
            stock,
        })
    }
}

/// Value both option types for manually entered parameters
pub fn quote(params: &OptionParams) -> BsResult<Quote> {
    let (call, put) = black_scholes::value_both(params)?;
    Ok(Quote {
        params: *params,
        call,
        put,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BsError;
    use crate::data::StaticSource;

    fn engine() -> PricingEngine<StaticSource> {
        PricingEngine::new(StaticSource::new().with_quote("ACME", 100.0, 0.2))
    }

    fn terms() -> ContractTerms {
        ContractTerms {
            strike: 100.0,
            time_to_expiry: 1.0,
            risk_free_rate: 0.05,
            volatility_override: None,
        }
    }

    #[test]
    fn test_quote_symbol_uses_source_spot_and_vol() {
        let mq = engine().quote_symbol("acme", &terms()).unwrap();
        assert_eq!(mq.stock.symbol, "ACME");
        assert_eq!(mq.quote.params.spot, 100.0);
        assert_eq!(mq.quote.params.volatility, 0.2);
        assert!((mq.quote.call.price - 10.45).abs() < 1e-2);
        assert!((mq.quote.put.price - 5.57).abs() < 1e-2);
    }

    #[test]
    fn test_volatility_override() {
        let t = ContractTerms {
            volatility_override: Some(0.4),
            ..terms()
        };
        let mq = engine().quote_symbol("ACME", &t).unwrap();
        assert_eq!(mq.quote.params.volatility, 0.4);
        assert!(mq.quote.call.price > 10.45);
    }

    #[test]
    fn test_matches_manual_quote() {
        let mq = engine().quote_symbol("ACME", &terms()).unwrap();
        let manual = quote(&OptionParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()).unwrap();
        assert_eq!(mq.quote, manual);
        assert_eq!(manual.get(OptionType::Put), &manual.put);
    }

    #[test]
    fn test_source_errors_pass_through() {
        assert!(matches!(
            engine().quote_symbol("NOPE", &terms()),
            Err(BsError::Data(_))
        ));
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let t = ContractTerms {
            strike: -5.0,
            ..terms()
        };
        assert!(matches!(
            engine().quote_symbol("ACME", &t),
            Err(BsError::InvalidParameter(_))
        ));
    }
}
