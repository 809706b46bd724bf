//! Month-by-month simulation of the loan alongside the dividend portfolio

mod config;
mod engine;
mod ledger;
mod state;
mod strategy;

pub use config::{SimulationConfig, SimulationInput};
pub use engine::{simulate, SimulationEngine, SETTLEMENT_TOLERANCE};
pub use ledger::{
    BalancePoint, Holding, HoldingSnapshot, LedgerRow, SimulationResult, SimulationSummary,
    YearlySummary,
};
pub use state::SimulationState;
pub use strategy::{DividendRouting, DividendStrategy, PurchaseSchedule};
