//! Property tests for the Black-Scholes engine through the public API

use approx::{assert_abs_diff_eq, assert_relative_eq};
use proptest::prelude::*;

use bs_options::prelude::*;

fn params_strategy() -> impl Strategy<Value = OptionParams> {
    (
        1.0..1000.0f64,
        1.0..1000.0f64,
        0.01..5.0f64,
        -0.05..0.15f64,
        0.01..1.5f64,
    )
        .prop_map(|(spot, strike, time_to_expiry, risk_free_rate, volatility)| OptionParams {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            volatility,
        })
}

fn scale(p: &OptionParams) -> f64 {
    p.spot.max(p.strike)
}

proptest! {
    #[test]
    fn put_call_parity(p in params_strategy()) {
        let call = bs_price(&p, OptionType::Call).unwrap();
        let put = bs_price(&p, OptionType::Put).unwrap();
        let rhs = p.spot - p.strike * (-p.risk_free_rate * p.time_to_expiry).exp();
        prop_assert!((call - put - rhs).abs() <= 1e-6 * scale(&p));
    }

    #[test]
    fn prices_are_non_negative(p in params_strategy()) {
        prop_assert!(bs_price(&p, OptionType::Call).unwrap() >= 0.0);
        prop_assert!(bs_price(&p, OptionType::Put).unwrap() >= 0.0);
    }

    #[test]
    fn monotone_in_spot(p in params_strategy(), bump in 0.01..200.0f64) {
        let higher = p.with_spot(p.spot + bump);
        let tol = 1e-9 * scale(&higher);
        let call_lo = bs_price(&p, OptionType::Call).unwrap();
        let call_hi = bs_price(&higher, OptionType::Call).unwrap();
        let put_lo = bs_price(&p, OptionType::Put).unwrap();
        let put_hi = bs_price(&higher, OptionType::Put).unwrap();
        prop_assert!(call_hi >= call_lo - tol);
        prop_assert!(put_hi <= put_lo + tol);
    }

    #[test]
    fn delta_bounds(p in params_strategy()) {
        let call = bs_greeks(&p, OptionType::Call).unwrap();
        let put = bs_greeks(&p, OptionType::Put).unwrap();
        prop_assert!((0.0..=1.0).contains(&call.delta));
        prop_assert!((-1.0..=0.0).contains(&put.delta));
    }

    #[test]
    fn gamma_and_vega_ignore_option_type(p in params_strategy()) {
        let call = bs_greeks(&p, OptionType::Call).unwrap();
        let put = bs_greeks(&p, OptionType::Put).unwrap();
        prop_assert_eq!(call.gamma, put.gamma);
        prop_assert_eq!(call.vega, put.vega);
    }

    #[test]
    fn value_is_price_plus_greeks(p in params_strategy()) {
        for option_type in OptionType::ALL {
            let v = value(&p, option_type).unwrap();
            prop_assert_eq!(v.price, bs_price(&p, option_type).unwrap());
            prop_assert_eq!(v.greeks, bs_greeks(&p, option_type).unwrap());
        }
    }
}

fn reference() -> OptionParams {
    OptionParams::new(100.0, 100.0, 1.0, 0.05, 0.2).unwrap()
}

#[test]
fn reference_scenario() {
    let (call, put) = value_both(&reference()).unwrap();

    assert_abs_diff_eq!(call.price, 10.45, epsilon = 1e-2);
    assert_abs_diff_eq!(put.price, 5.57, epsilon = 1e-2);

    assert_abs_diff_eq!(call.greeks.delta, 0.6368, epsilon = 1e-3);
    assert_abs_diff_eq!(call.greeks.gamma, 0.0188, epsilon = 1e-3);
    assert_abs_diff_eq!(call.greeks.vega, 0.3752, epsilon = 1e-3);
    assert_abs_diff_eq!(call.greeks.theta, -0.0176, epsilon = 1e-3);
    assert_abs_diff_eq!(call.greeks.rho, 0.5323, epsilon = 1e-3);

    assert_abs_diff_eq!(put.greeks.delta, -0.3632, epsilon = 1e-3);
    assert_abs_diff_eq!(put.greeks.theta, -0.0045, epsilon = 1e-3);
    assert_abs_diff_eq!(put.greeks.rho, -0.4189, epsilon = 1e-3);
}

#[test]
fn rejects_degenerate_inputs() {
    let base = reference();
    for p in [
        base.with_spot(0.0),
        base.with_strike(-5.0),
        base.with_time_to_expiry(0.0),
        base.with_volatility(0.0),
    ] {
        assert!(matches!(
            bs_price(&p, OptionType::Call),
            Err(BsError::InvalidParameter(_))
        ));
        assert!(matches!(
            bs_greeks(&p, OptionType::Put),
            Err(BsError::InvalidParameter(_))
        ));
    }
}

#[test]
fn deep_in_the_money_call() {
    let p = reference().with_spot(1.0e6);
    let call = value(&p, OptionType::Call).unwrap();
    let intrinsic_forward = p.spot - p.discounted_strike();

    assert_relative_eq!(call.price, intrinsic_forward, max_relative = 1e-9);
    assert_abs_diff_eq!(call.greeks.delta, 1.0, epsilon = 1e-12);
}

#[test]
fn deep_out_of_the_money_call() {
    let p = reference().with_spot(1.0e-6);
    let call = value(&p, OptionType::Call).unwrap();

    assert_abs_diff_eq!(call.price, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(call.greeks.delta, 0.0, epsilon = 1e-12);
}

#[test]
fn batch_matches_sequential() {
    let base = reference();
    let requests: Vec<(OptionParams, OptionType)> = (1..=200)
        .map(|i| {
            let option_type = if i % 2 == 0 {
                OptionType::Call
            } else {
                OptionType::Put
            };
            (base.with_strike(50.0 + i as f64), option_type)
        })
        .collect();

    let batch = value_batch(&requests);
    assert_eq!(batch.len(), requests.len());
    for ((p, t), result) in requests.iter().zip(batch) {
        assert_eq!(result.unwrap(), value(p, *t).unwrap());
    }
}

#[test]
fn engine_with_static_source() {
    let engine = PricingEngine::new(StaticSource::new().with_quote("XYZ", 100.0, 0.2));
    let terms = ContractTerms {
        strike: 100.0,
        time_to_expiry: 1.0,
        risk_free_rate: 0.05,
        volatility_override: None,
    };

    let mq = engine.quote_symbol("xyz", &terms).unwrap();
    assert_eq!(mq.quote, quote(&reference()).unwrap());
}
