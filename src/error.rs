//! Error types for simulation input handling

use thiserror::Error;

/// Errors raised while building or loading a simulation input
///
/// The simulation loop itself never fails; every variant here is produced
/// before the first month is computed.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown dividend strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown purchase schedule: {0}")]
    UnknownPurchaseSchedule(String),

    #[error("Reinvest strategy requires a target instrument")]
    MissingReinvestTarget,

    #[error("Unknown instrument: {0}")]
    UnknownInstrument(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Reject a value that must be finite and strictly positive
pub(crate) fn require_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimulationError::InvalidInput(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Reject a value that must be finite and non-negative
pub(crate) fn require_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimulationError::InvalidInput(format!(
            "{} must be a non-negative finite number, got {}",
            name, value
        )));
    }
    Ok(())
}
