//! Dividend Mortgage - mortgage amortization with a parallel dividend ETF strategy
//!
//! This library provides:
//! - Fixed-payment amortization (annuity formula, interest/principal split)
//! - Month-by-month simulation of loan repayment alongside dividend-paying instruments
//! - Dividend cash routing strategies (pay down the loan, reinvest, or both)
//! - Yearly rollups, balance curves and CSV output
//! - Multi-strategy comparison runs

pub mod error;
pub mod loan;
pub mod portfolio;
pub mod report;
pub mod request;
pub mod scenario;
pub mod simulation;

// Re-export commonly used types
pub use error::{Result, SimulationError};
pub use loan::{fixed_payment, LoanTerms};
pub use portfolio::{DividendCalendar, Instrument, Portfolio};
pub use request::SimulationRequest;
pub use scenario::ScenarioRunner;
pub use simulation::{
    simulate, DividendStrategy, LedgerRow, PurchaseSchedule, SimulationConfig, SimulationEngine,
    SimulationInput, SimulationResult, SimulationSummary,
};
