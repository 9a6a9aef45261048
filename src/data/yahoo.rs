//! Yahoo Finance data fetcher
//!
//! Pulls the latest close and a year of daily closes from the unofficial v8 chart
//! endpoint and turns them into a spot price and a historical volatility estimate.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::volatility::{historical_volatility, ReturnKind, TRADING_DAYS_PER_YEAR};
use super::{MarketDataSource, StockInfo};
use crate::core::{BsError, BsResult};

/// Yahoo client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YahooConfig {
    /// Chart endpoint, symbol is appended as a path segment
    pub base_url: String,
    /// History window used for the volatility estimate (Yahoo range syntax)
    pub range: String,
    /// Bar interval (Yahoo interval syntax)
    pub interval: String,
    /// Return definition for the volatility estimate
    pub return_kind: ReturnKind,
    /// Annualization factor matching `interval`
    pub periods_per_year: f64,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            range: "1y".to_string(),
            interval: "1d".to_string(),
            return_kind: ReturnKind::Simple,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"
                .to_string(),
            timeout_secs: 10,
        }
    }
}

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    config: YahooConfig,
}

impl YahooClient {
    pub fn new(config: YahooConfig) -> BsResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BsError::network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn with_defaults() -> BsResult<Self> {
        Self::new(YahooConfig::default())
    }

    /// Daily price history over the configured range
    pub fn get_history(&self, symbol: &str) -> BsResult<PriceHistory> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(BsError::data("empty ticker symbol"));
        }

        let url = format!("{}/{}", self.config.base_url, symbol);
        tracing::debug!(%url, range = %self.config.range, "fetching chart");

        let body = self
            .client
            .get(&url)
            .query(&[
                ("range", self.config.range.as_str()),
                ("interval", self.config.interval.as_str()),
            ])
            .send()
            .map_err(|e| BsError::network(e.to_string()))?
            .text()
            .map_err(|e| BsError::network(e.to_string()))?;

        parse_chart(&symbol, &body)
    }
}

impl MarketDataSource for YahooClient {
    fn stock_info(&self, symbol: &str) -> BsResult<StockInfo> {
        let history = self.get_history(symbol)?;
        let info = history.to_stock_info(self.config.return_kind, self.config.periods_per_year)?;
        tracing::info!(
            symbol = %info.symbol,
            price = info.current_price,
            volatility = info.volatility,
            "fetched stock info"
        );
        Ok(info)
    }
}

/// Close-price series for one symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub name: Option<String>,
    pub currency: Option<String>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub closes: Vec<f64>,
}

impl PriceHistory {
    pub fn last_close(&self) -> Option<f64> {
        self.closes.last().copied()
    }

    /// Spot rounded to cents, volatility rounded to 4 decimals
    pub fn to_stock_info(&self, kind: ReturnKind, periods_per_year: f64) -> BsResult<StockInfo> {
        let last = self
            .last_close()
            .ok_or_else(|| BsError::data(format!("no prices for {}", self.symbol)))?;
        let volatility = historical_volatility(&self.closes, kind, periods_per_year)?;

        Ok(StockInfo {
            symbol: self.symbol.clone(),
            name: self.name.clone().unwrap_or_else(|| "N/A".to_string()),
            current_price: round2(last),
            volatility: round4(volatility),
            currency: self.currency.clone().unwrap_or_else(|| "USD".to_string()),
            as_of: self.timestamps.last().copied().unwrap_or_else(Utc::now),
        })
    }
}

/// Parse a v8 chart response. Bars with a null close are dropped.
pub fn parse_chart(symbol: &str, body: &str) -> BsResult<PriceHistory> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| BsError::data(format!("failed to parse chart for {}: {}", symbol, e)))?;

    if let Some(err) = response.chart.error {
        return Err(BsError::data(format!(
            "{}: {}",
            symbol,
            err.description.unwrap_or(err.code)
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| BsError::data(format!("no chart data returned for {}", symbol)))?;

    let raw_closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    let raw_times = result.timestamp.unwrap_or_default();

    let mut timestamps = Vec::with_capacity(raw_closes.len());
    let mut closes = Vec::with_capacity(raw_closes.len());
    for (i, close) in raw_closes.into_iter().enumerate() {
        let Some(close) = close else { continue };
        let ts = raw_times
            .get(i)
            .and_then(|&t| DateTime::from_timestamp(t, 0))
            .unwrap_or_else(Utc::now);
        timestamps.push(ts);
        closes.push(close);
    }

    if closes.is_empty() {
        return Err(BsError::data(format!("no prices for {}", symbol)));
    }

    let meta = result.meta;
    Ok(PriceHistory {
        symbol: meta.symbol.unwrap_or_else(|| symbol.to_uppercase()),
        name: meta.long_name.or(meta.short_name),
        currency: meta.currency,
        timestamps,
        closes,
    })
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    symbol: Option<String>,
    currency: Option<String>,
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuoteBars>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteBars {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {
                    "currency": "USD",
                    "symbol": "TEST",
                    "longName": "Test Corp",
                    "regularMarketPrice": 99.004
                },
                "timestamp": [1700000000, 1700086400, 1700172800, 1700259200],
                "indicators": {
                    "quote": [{ "close": [100.0, 110.0, null, 99.004] }]
                }
            }],
            "error": null
        }
    }"#;

    const NOT_FOUND: &str = r#"{
        "chart": {
            "result": null,
            "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
        }
    }"#;

    #[test]
    fn test_parse_chart_skips_null_closes() {
        let history = parse_chart("TEST", CHART).unwrap();
        assert_eq!(history.symbol, "TEST");
        assert_eq!(history.name.as_deref(), Some("Test Corp"));
        assert_eq!(history.closes, vec![100.0, 110.0, 99.004]);
        assert_eq!(history.timestamps.len(), 3);
        assert_eq!(history.timestamps[2].timestamp(), 1700259200);
    }

    #[test]
    fn test_to_stock_info_rounds() {
        let history = parse_chart("TEST", CHART).unwrap();
        let info = history.to_stock_info(ReturnKind::Simple, 252.0).unwrap();
        assert_eq!(info.current_price, 99.0);
        assert_eq!(info.currency, "USD");
        assert_eq!(info.name, "Test Corp");
        assert!(info.volatility > 0.0);
        assert_eq!(info.volatility, round4(info.volatility));
    }

    #[test]
    fn test_parse_chart_error() {
        match parse_chart("ZZZZ", NOT_FOUND) {
            Err(BsError::Data(msg)) => assert!(msg.contains("delisted")),
            other => panic!("expected data error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_garbage() {
        assert!(matches!(parse_chart("X", "<html>"), Err(BsError::Data(_))));
    }

    #[test]
    fn test_defaults_when_meta_sparse() {
        let body = r#"{"chart":{"result":[{"meta":{},"timestamp":[1,2,3],
            "indicators":{"quote":[{"close":[10.0, 11.0, 10.5]}]}}],"error":null}}"#;
        let info = parse_chart("abc", body)
            .unwrap()
            .to_stock_info(ReturnKind::Log, 252.0)
            .unwrap();
        assert_eq!(info.symbol, "ABC");
        assert_eq!(info.name, "N/A");
        assert_eq!(info.currency, "USD");
    }

    #[test]
    #[ignore] // Requires network
    fn test_live_stock_info() {
        let client = YahooClient::with_defaults().unwrap();
        let info = client.stock_info("SPY").unwrap();

        assert!(info.current_price > 0.0);
        assert!(info.volatility > 0.0);
        println!("SPY: {:?}", info);
    }
}
