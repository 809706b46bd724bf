//! Dividend Mortgage CLI
//!
//! Runs one simulation from a JSON request or command-line flags

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use dividend_mortgage::{
    loan::months_from_years,
    portfolio::load_instruments,
    report::{write_ledger_file, write_yearly_file},
    DividendStrategy, LoanTerms, Portfolio, PurchaseSchedule, SimulationConfig, SimulationEngine,
    SimulationInput, SimulationRequest,
};

#[derive(Parser, Debug)]
#[command(name = "dividend_mortgage")]
#[command(about = "Simulate paying down a mortgage with ETF dividends")]
struct Args {
    /// JSON request file; overrides all loan and strategy flags
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Loan principal
    #[arg(long, default_value_t = 10_000_000.0)]
    principal: f64,

    /// Annual interest rate in percent
    #[arg(long, default_value_t = 2.0)]
    rate: f64,

    /// Loan term in years
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Instrument CSV file (default: built-in Taiwan ETF preset)
    #[arg(long)]
    instruments: Option<PathBuf>,

    /// mortgage, full-reinvest or mortgage-then-reinvest
    #[arg(short, long, default_value = DividendStrategy::MORTGAGE)]
    strategy: String,

    /// Instrument bought with dividend cash by the reinvest strategies
    #[arg(short, long)]
    target: Option<String>,

    /// every-month or dividend-months
    #[arg(long, default_value = "every-month")]
    purchase_schedule: String,

    /// Monthly ledger CSV output path
    #[arg(short, long, default_value = "ledger_output.csv")]
    output: PathBuf,

    /// Yearly rollup CSV output path
    #[arg(long)]
    yearly_output: Option<PathBuf>,

    /// Print the full result as JSON instead of the text summary
    #[arg(long)]
    json: bool,
}

fn build_input(args: &Args) -> Result<SimulationInput> {
    if let Some(path) = &args.input {
        let request = SimulationRequest::from_path(path)
            .with_context(|| format!("reading request {}", path.display()))?;
        return request.into_input().context("invalid request");
    }

    let loan = LoanTerms::new(args.principal, args.rate, months_from_years(args.years)?)?;
    let portfolio = match &args.instruments {
        Some(path) => load_instruments(path)
            .with_context(|| format!("loading instruments from {}", path.display()))?,
        None => Portfolio::taiwan_etf_preset(),
    };
    let strategy = DividendStrategy::resolve(&args.strategy, args.target.as_deref())?;
    let purchase_schedule: PurchaseSchedule = args.purchase_schedule.parse()?;

    Ok(SimulationInput::new(
        loan,
        portfolio,
        SimulationConfig {
            strategy,
            purchase_schedule,
        },
    )?)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let input = build_input(&args)?;
    let result = SimulationEngine::new(input).run();

    write_ledger_file(&args.output, &result)
        .with_context(|| format!("writing {}", args.output.display()))?;
    if let Some(path) = &args.yearly_output {
        write_yearly_file(path, &result).with_context(|| format!("writing {}", path.display()))?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let loan = &result.loan;
    let summary = &result.summary;

    println!("Dividend Mortgage v0.1.0");
    println!("========================\n");
    println!("Loan: {:.0} at {}% over {} months", loan.principal, loan.annual_rate_percent, loan.term_months);
    println!("Strategy: {} (purchases {})", result.strategy, result.purchase_schedule);
    println!("  Fixed monthly payment: {:.2}", summary.original_monthly_payment);
    println!();

    println!("{:>4} {:>16} {:>14} {:>14} {:>14} {:>14} {:>8}",
        "Year", "EndBalance", "Interest", "Principal", "Dividend", "Extra", "Progress");
    println!("{}", "-".repeat(92));
    for year in result.yearly() {
        println!("{:>4} {:>16.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>7.1}%",
            year.year,
            year.ending_balance,
            year.interest,
            year.principal,
            year.dividend,
            year.extra_payment,
            year.progress_percent,
        );
    }

    println!("\nSummary:");
    println!("  Payoff: month {} (year {}), {} years saved", summary.payoff_month, summary.payoff_year, summary.saved_years);
    println!("  Total Interest: {:.0}", summary.total_interest_paid);
    println!("  Total Dividends: {:.0}", summary.total_dividend_received);
    println!("  Total Invested: {:.0}", summary.total_invested);
    println!("  Saved Amount: {:.0}", summary.saved_amount);
    println!("  Final Holdings:");
    for holding in &summary.final_holdings {
        println!("    {:>6}: {:>10} units @ {:>8.2} = {:.0}",
            holding.id, holding.position, holding.price, holding.market_value);
    }
    println!("  Final Market Value: {:.0}", summary.final_market_value);

    println!("\nLedger written to: {}", args.output.display());

    Ok(())
}
