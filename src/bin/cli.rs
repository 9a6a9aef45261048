//! Black-Scholes CLI
//!
//! Prices a call and a put from command-line flags, interactive prompts, or a
//! ticker whose spot price and volatility come from Yahoo Finance.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bs_options::prelude::*;

/// Black-Scholes option pricing model
#[derive(Parser)]
#[command(name = "bs-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed spot price and volatility from this ticker (e.g. AAPL, TSLA, MSFT)
    #[arg(long)]
    ticker: Option<String>,

    /// Current stock price
    #[arg(long)]
    spot: Option<f64>,

    /// Strike price
    #[arg(short = 'k', long)]
    strike: Option<f64>,

    /// Time to expiration in years
    #[arg(short, long, conflicts_with = "expiry")]
    time: Option<f64>,

    /// Expiration date (YYYY-MM-DD), converted to years from today
    #[arg(long)]
    expiry: Option<NaiveDate>,

    /// Risk-free rate as a decimal (0.05 for 5%)
    #[arg(short, long, allow_negative_numbers = true)]
    rate: Option<f64>,

    /// Volatility as a decimal (0.2 for 20%); overrides the ticker estimate
    #[arg(long)]
    vol: Option<f64>,

    /// Only show one side (call or put)
    #[arg(long = "type")]
    option_type: Option<OptionType>,

    /// Configuration file path
    #[arg(short, long, default_value = "bs.toml")]
    config: PathBuf,

    /// Always fetch live data
    #[arg(long)]
    no_cache: bool,

    /// Print the valuations as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// No pricing input on the command line: run the full menu
    fn is_interactive(&self) -> bool {
        self.ticker.is_none()
            && self.spot.is_none()
            && self.strike.is_none()
            && self.time.is_none()
            && self.expiry.is_none()
            && self.rate.is_none()
            && self.vol.is_none()
    }

    fn time_to_expiry(&self) -> Option<f64> {
        self.time.or_else(|| {
            self.expiry
                .map(|expiry| years_between(Utc::now().date_naive(), expiry))
        })
    }
}

/// Line-based prompts that re-ask until the answer parses.
///
/// Prompt text goes to `output`, which is stderr under `--json` so stdout only
/// carries the JSON document.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    fn say(&mut self, text: &str) -> BsResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn line(&mut self, prompt: &str) -> BsResult<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(BsError::IO(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(buf.trim().to_string())
    }

    fn number(&mut self, prompt: &str) -> BsResult<f64> {
        loop {
            let answer = self.line(prompt)?;
            match answer.parse::<f64>() {
                Ok(x) if x.is_finite() => return Ok(x),
                _ => self.say(&format!("  '{}' is not a number, try again.", answer))?,
            }
        }
    }

    fn number_or(&mut self, given: Option<f64>, prompt: &str) -> BsResult<f64> {
        match given {
            Some(x) => Ok(x),
            None => self.number(prompt),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(args: &Args) -> BsResult<()> {
    let config = AppConfig::load_or_default(&args.config)?;
    let interactive = args.is_interactive();
    let stdin = io::stdin();
    let output: Box<dyn Write> = if args.json {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let mut prompt = Prompter {
        input: stdin.lock(),
        output,
    };

    if !args.json {
        print_banner("BLACK-SCHOLES OPTION PRICING MODEL");
    }

    let ticker = if interactive {
        choose_ticker(&mut prompt)?
    } else {
        args.ticker.clone()
    };

    let quote = match ticker {
        Some(symbol) => market_quote(args, &config, &symbol, interactive, &mut prompt)?,
        None => manual_quote(args, &mut prompt)?,
    };

    if args.json {
        print_json(args, &quote)?;
    } else {
        for option_type in OptionType::ALL {
            if args.option_type.map_or(true, |t| t == option_type) {
                print_valuation(quote.get(option_type));
            }
        }
    }
    Ok(())
}

/// Input-method menu; `Some(ticker)` when the user picks real stock data
fn choose_ticker<R: BufRead, W: Write>(
    prompt: &mut Prompter<R, W>,
) -> BsResult<Option<String>> {
    prompt.say("\nChoose input method:")?;
    prompt.say("1. Use real stock data (enter ticker symbol)")?;
    prompt.say("2. Manual input (enter all parameters)")?;
    if prompt.line("\nEnter choice (1 or 2): ")? != "1" {
        return Ok(None);
    }
    let symbol = prompt.line("\nEnter stock ticker (e.g., AAPL, TSLA, MSFT): ")?;
    Ok(Some(symbol.to_uppercase()))
}

fn market_quote<R: BufRead, W: Write>(
    args: &Args,
    config: &AppConfig,
    symbol: &str,
    interactive: bool,
    prompt: &mut Prompter<R, W>,
) -> BsResult<Quote> {
    let yahoo = YahooClient::new(config.yahoo.clone())?;
    let source: Box<dyn MarketDataSource> = if args.no_cache {
        Box::new(yahoo)
    } else {
        Box::new(CachedSource::new(yahoo, config.cache.clone())?)
    };
    let engine = PricingEngine::new(source);

    let stock = engine.stock_info(symbol).map_err(|e| {
        BsError::data(format!("could not retrieve data for {}: {}", symbol, e))
    })?;
    if !args.json {
        print_stock_info(&stock);
    }

    let strike = prompt.number_or(
        args.strike,
        &format!(
            "\nEnter strike price (current price is ${}): $",
            stock.current_price
        ),
    )?;
    let time_to_expiry =
        prompt.number_or(args.time_to_expiry(), "Enter time to expiration (years): ")?;
    let risk_free_rate = prompt.number_or(
        args.rate,
        "Enter risk-free rate (as decimal, e.g., 0.05 for 5%): ",
    )?;

    let mut volatility_override = args.vol;
    if interactive {
        let keep = prompt.line(&format!(
            "\nUse estimated volatility of {:.2}%? (y/n): ",
            stock.volatility * 100.0
        ))?;
        if !keep.eq_ignore_ascii_case("y") {
            volatility_override = Some(
                prompt.number("Enter custom volatility (as decimal, e.g., 0.2 for 20%): ")?,
            );
        }
    }

    let terms = ContractTerms {
        strike,
        time_to_expiry,
        risk_free_rate,
        volatility_override,
    };
    let params = engine.params_for(&stock, &terms)?;
    quote(&params)
}

fn manual_quote<R: BufRead, W: Write>(
    args: &Args,
    prompt: &mut Prompter<R, W>,
) -> BsResult<Quote> {
    let spot = prompt.number_or(args.spot, "\nEnter current stock price: $")?;
    let strike = prompt.number_or(args.strike, "Enter strike price: $")?;
    let time = prompt.number_or(args.time_to_expiry(), "Enter time to expiration (years): ")?;
    let rate = prompt.number_or(
        args.rate,
        "Enter risk-free rate (as decimal, e.g., 0.05 for 5%): ",
    )?;
    let vol = prompt.number_or(
        args.vol,
        "Enter volatility (as decimal, e.g., 0.2 for 20%): ",
    )?;

    let params = OptionParams::new(spot, strike, time, rate, vol)?;
    quote(&params)
}

fn print_banner(title: &str) {
    println!("{}", "=".repeat(50));
    println!("{}", title);
    println!("{}", "=".repeat(50));
}

fn print_stock_info(stock: &StockInfo) {
    println!();
    print_banner("STOCK INFORMATION");
    println!("Symbol: {}", stock.symbol);
    println!("Company: {}", stock.name);
    println!("Current Price: ${}", stock.current_price);
    println!("Estimated Volatility: {:.2}%", stock.volatility * 100.0);
    println!("Currency: {}", stock.currency);
}

fn print_valuation(v: &Valuation) {
    println!();
    print_banner(&format!("{} OPTION", v.option_type));
    println!("Price: ${:.2}", v.price);
    for (greek, value) in v.greeks.iter() {
        println!("{}: {:.4}", greek, value);
    }
}

fn print_json(args: &Args, quote: &Quote) -> BsResult<()> {
    let json = match args.option_type {
        Some(t) => serde_json::to_string_pretty(quote.get(t)),
        None => serde_json::to_string_pretty(quote),
    }
    .map_err(|e| BsError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
