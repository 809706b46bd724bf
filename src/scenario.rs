//! Scenario runner for comparing run configurations
//!
//! Holds one loan and portfolio, then runs it under many configurations.
//! Each run is independent, so batches are spread across threads with rayon.

use rayon::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::loan::LoanTerms;
use crate::portfolio::Portfolio;
use crate::simulation::{
    DividendStrategy, SimulationConfig, SimulationEngine, SimulationInput, SimulationResult,
};

/// Pre-validated scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(loan, portfolio)?;
/// let results = runner.compare_strategies("0050")?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: SimulationInput,
}

/// Headline figures of one strategy run
#[derive(Debug, Clone, Serialize)]
pub struct StrategyOutcome {
    pub strategy: String,
    pub payoff_month: u32,
    pub saved_years: u32,
    pub total_interest_paid: f64,
    pub total_dividend_received: f64,
    pub total_invested: f64,
    pub saved_amount: f64,
    pub final_market_value: f64,
}

impl From<&SimulationResult> for StrategyOutcome {
    fn from(result: &SimulationResult) -> Self {
        let summary = &result.summary;
        Self {
            strategy: result.strategy.to_string(),
            payoff_month: summary.payoff_month,
            saved_years: summary.saved_years,
            total_interest_paid: summary.total_interest_paid,
            total_dividend_received: summary.total_dividend_received,
            total_invested: summary.total_invested,
            saved_amount: summary.saved_amount,
            final_market_value: summary.final_market_value,
        }
    }
}

impl ScenarioRunner {
    /// Create a runner with the default configuration as its base
    pub fn new(loan: LoanTerms, portfolio: Portfolio) -> Result<Self> {
        Ok(Self {
            base: SimulationInput::new(loan, portfolio, SimulationConfig::default())?,
        })
    }

    /// Create a runner from an existing input
    pub fn with_input(input: SimulationInput) -> Self {
        Self { base: input }
    }

    /// Run the base input as configured
    pub fn run_base(&self) -> SimulationResult {
        SimulationEngine::new(self.base.clone()).run()
    }

    /// Run a single configuration against the base loan and portfolio
    pub fn run(&self, config: SimulationConfig) -> Result<SimulationResult> {
        let input = self.base.with_config(config)?;
        Ok(SimulationEngine::new(input).run())
    }

    /// Run several configurations in parallel, results in input order
    pub fn run_scenarios(&self, configs: &[SimulationConfig]) -> Result<Vec<SimulationResult>> {
        let inputs = configs
            .iter()
            .map(|config| self.base.with_config(config.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(inputs
            .into_par_iter()
            .map(|input| SimulationEngine::new(input).run())
            .collect())
    }

    /// Run every dividend strategy, reinvesting into `target`, keeping the
    /// base purchase schedule
    pub fn compare_strategies(&self, target: &str) -> Result<Vec<SimulationResult>> {
        let purchase_schedule = self.base.config().purchase_schedule;
        let configs: Vec<SimulationConfig> = DividendStrategy::all(target)
            .into_iter()
            .map(|strategy| SimulationConfig {
                strategy,
                purchase_schedule,
            })
            .collect();
        self.run_scenarios(&configs)
    }

    pub fn input(&self) -> &SimulationInput {
        &self.base
    }
}
