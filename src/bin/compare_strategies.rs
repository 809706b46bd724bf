//! Run one loan and portfolio under every dividend strategy and compare
//!
//! Usage: cargo run --bin compare_strategies -- [request.json] [target]

use anyhow::{Context, Result};
use dividend_mortgage::{
    portfolio::PRESET_GROWTH_TARGET,
    scenario::{ScenarioRunner, StrategyOutcome},
    SimulationRequest,
};
use std::time::Instant;

const DEFAULT_REQUEST: &str = "data/request.json";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let request_path = args.next().unwrap_or_else(|| DEFAULT_REQUEST.to_string());
    let target = args.next().unwrap_or_else(|| PRESET_GROWTH_TARGET.to_string());

    let input = SimulationRequest::from_path(&request_path)
        .with_context(|| format!("reading request {}", request_path))?
        .into_input()
        .context("invalid request")?;

    println!("Comparing strategies for {} (reinvest target {})", request_path, target);
    let start = Instant::now();

    let runner = ScenarioRunner::with_input(input);
    let results = runner.compare_strategies(&target)?;
    println!("Ran {} scenarios in {:?}\n", results.len(), start.elapsed());

    println!("{:<32} {:>7} {:>6} {:>14} {:>14} {:>14} {:>14}",
        "Strategy", "Payoff", "Saved", "Interest", "Dividends", "Invested", "MarketValue");
    println!("{}", "-".repeat(107));

    for result in &results {
        let outcome = StrategyOutcome::from(result);
        println!("{:<32} {:>7} {:>6} {:>14.0} {:>14.0} {:>14.0} {:>14.0}",
            outcome.strategy,
            outcome.payoff_month,
            outcome.saved_years,
            outcome.total_interest_paid,
            outcome.total_dividend_received,
            outcome.total_invested,
            outcome.final_market_value,
        );
    }

    Ok(())
}
