//! Run configuration and the validated input bundle

use serde::{Deserialize, Serialize};

use super::strategy::{DividendStrategy, PurchaseSchedule};
use crate::error::{Result, SimulationError};
use crate::loan::LoanTerms;
use crate::portfolio::Portfolio;

/// Policies selected once for a whole run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Dividend cash routing
    pub strategy: DividendStrategy,

    /// Timing of scheduled purchases
    pub purchase_schedule: PurchaseSchedule,
}

impl SimulationConfig {
    pub fn with_strategy(strategy: DividendStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }
}

/// Everything one simulation run needs, already validated
///
/// Only obtainable through `new`; the engine relies on it for a valid loan,
/// portfolio and reinvestment target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationInput {
    loan: LoanTerms,
    portfolio: Portfolio,
    config: SimulationConfig,
}

impl SimulationInput {
    pub fn new(loan: LoanTerms, portfolio: Portfolio, config: SimulationConfig) -> Result<Self> {
        // Loan and instrument fields are public, so check them again here
        LoanTerms::new(loan.principal, loan.annual_rate_percent, loan.term_months)?;
        portfolio.validate()?;

        if let Some(target) = config.strategy.target() {
            if portfolio.index_of(target).is_none() {
                return Err(SimulationError::UnknownInstrument(target.to_string()));
            }
        }

        Ok(Self {
            loan,
            portfolio,
            config,
        })
    }

    pub fn loan(&self) -> &LoanTerms {
        &self.loan
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Same loan and portfolio under a different configuration
    pub fn with_config(&self, config: SimulationConfig) -> Result<Self> {
        Self::new(self.loan, self.portfolio.clone(), config)
    }

    /// Index of the reinvestment target in portfolio order
    pub(crate) fn target_index(&self) -> Option<usize> {
        self.config
            .strategy
            .target()
            .and_then(|target| self.portfolio.index_of(target))
    }
}
