//! Validated loan terms

use serde::{Deserialize, Serialize};

use super::amortization::{fixed_payment, monthly_rate};
use crate::error::{require_non_negative, require_positive, Result, SimulationError};

/// Longest accepted loan term (100 years)
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Convert a term in years to months
pub fn months_from_years(years: u32) -> Result<u32> {
    years.checked_mul(12).ok_or_else(|| {
        SimulationError::InvalidInput(format!("term of {} years is out of range", years))
    })
}

/// Immutable loan parameters for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,

    /// Nominal annual rate in percent (2.0 = 2%)
    pub annual_rate_percent: f64,

    /// Original term in months
    pub term_months: u32,
}

impl LoanTerms {
    /// Build loan terms, rejecting non-finite or out-of-range values
    pub fn new(principal: f64, annual_rate_percent: f64, term_months: u32) -> Result<Self> {
        require_positive("principal", principal)?;
        require_non_negative("annual_rate_percent", annual_rate_percent)?;
        if term_months == 0 || term_months > MAX_TERM_MONTHS {
            return Err(SimulationError::InvalidInput(format!(
                "term_months must be between 1 and {}, got {}",
                MAX_TERM_MONTHS, term_months
            )));
        }

        Ok(Self {
            principal,
            annual_rate_percent,
            term_months,
        })
    }

    /// Monthly decimal rate
    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.annual_rate_percent)
    }

    /// Scheduled fixed monthly payment
    pub fn fixed_payment(&self) -> f64 {
        fixed_payment(self.principal, self.annual_rate_percent, self.term_months)
    }

    /// Original term in whole years (truncating a partial final year)
    pub fn term_years(&self) -> u32 {
        self.term_months / 12
    }
}
