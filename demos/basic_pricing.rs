//! Example: Basic options pricing with Black-Scholes
//!
//! Run with: cargo run --example basic_pricing

use bs_options::prelude::*;

fn main() -> BsResult<()> {
    // Option parameters
    let spot = 100.0;
    let strike = 100.0;
    let time = 1.0; // 1 year
    let rate = 0.05; // 5% risk-free rate
    let vol = 0.20; // 20% volatility

    println!("=== Black-Scholes Pricing ===\n");
    println!("Spot:     ${:.2}", spot);
    println!("Strike:   ${:.2}", strike);
    println!("Time:     {:.2} years ({:.0} days)", time, time * 365.0);
    println!("Rate:     {:.1}%", rate * 100.0);
    println!("Vol:      {:.1}%\n", vol * 100.0);

    let params = OptionParams::new(spot, strike, time, rate, vol)?;

    let call_price = bs_price(&params, OptionType::Call)?;
    println!("Call Price: ${:.4}", call_price);

    let put_price = bs_price(&params, OptionType::Put)?;
    println!("Put Price:  ${:.4}", put_price);

    // Verify put-call parity: C - P = S - K*e^(-rT)
    let parity_lhs = call_price - put_price;
    let parity_rhs = spot - params.discounted_strike();
    println!("\nPut-Call Parity Check:");
    println!("  C - P = {:.4}", parity_lhs);
    println!("  S - K*e^(-rT) = {:.4}", parity_rhs);
    println!("  Difference: {:.6}", (parity_lhs - parity_rhs).abs());

    for option_type in OptionType::ALL {
        println!("\n=== Greeks ({}) ===\n", option_type);
        let greeks = bs_greeks(&params, option_type)?;
        for (greek, value) in greeks.iter() {
            println!("{:<6}  {:>8.4}  ({})", greek, value, greek.unit());
        }
    }

    // Batch valuation across a strike ladder
    println!("\n=== Strike Ladder ===\n");
    let requests: Vec<(OptionParams, OptionType)> = (80..=120)
        .step_by(10)
        .flat_map(|k| {
            let p = params.with_strike(k as f64);
            [(p, OptionType::Call), (p, OptionType::Put)]
        })
        .collect();

    for ((p, _), result) in requests.iter().zip(value_batch(&requests)) {
        let v = result?;
        println!(
            "K={:>6.1}  {:<4}  price {:>8.4}  delta {:>7.4}",
            p.strike, v.option_type, v.price, v.greeks.delta
        );
    }

    // Rejected input
    println!("\n=== Invalid Input ===\n");
    match bs_price(&params.with_volatility(0.0), OptionType::Call) {
        Ok(p) => println!("Unexpected price {}", p),
        Err(e) => println!("Zero volatility rejected: {}", e),
    }

    Ok(())
}
