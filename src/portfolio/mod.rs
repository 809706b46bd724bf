//! Instruments held alongside the loan and portfolio loading

mod instrument;
pub mod loader;

pub use instrument::{DividendCalendar, Instrument};
pub use loader::{load_instruments, load_instruments_from_reader};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Result, SimulationError};

/// Conventional reinvestment target in the built-in preset
pub const PRESET_GROWTH_TARGET: &str = "0050";

/// Ordered set of instruments with unique identifiers
///
/// Order is preserved in every ledger row so per-instrument columns line up.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Instrument>", into = "Vec<Instrument>")]
pub struct Portfolio {
    instruments: Vec<Instrument>,
}

impl Portfolio {
    /// Build a portfolio, validating each instrument and rejecting duplicate ids
    pub fn new(instruments: Vec<Instrument>) -> Result<Self> {
        let portfolio = Self { instruments };
        portfolio.validate()?;
        Ok(portfolio)
    }

    /// Re-check every instrument, e.g. after edits through `get_mut`
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            instrument.validate()?;
            if !seen.insert(instrument.id.as_str()) {
                return Err(SimulationError::InvalidInput(format!(
                    "duplicate instrument id: {}",
                    instrument.id
                )));
            }
        }
        Ok(())
    }

    /// Four Taiwan dividend ETFs with their fixed payment calendars
    ///
    /// Prices are indicative; positions, purchases and dividend rates start at zero.
    pub fn taiwan_etf_preset() -> Self {
        let month_set = |months: &[u32]| DividendCalendar::new(months).unwrap_or_default();
        Self {
            instruments: vec![
                Instrument::new("0056", 36.0, month_set(&[1, 4, 7, 10])),
                Instrument::new("00878", 22.0, month_set(&[2, 5, 8, 11])),
                Instrument::new(PRESET_GROWTH_TARGET, 180.0, month_set(&[1, 7])),
                Instrument::new("00919", 23.0, month_set(&[3, 6, 9, 12])),
            ],
        }
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Position of `id` in portfolio order
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.instruments.iter().position(|i| i.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }

    /// Mutable access for adjusting preset parameters before a run
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(|i| i.id.as_str())
    }
}

impl TryFrom<Vec<Instrument>> for Portfolio {
    type Error = SimulationError;

    fn try_from(instruments: Vec<Instrument>) -> Result<Self> {
        Self::new(instruments)
    }
}

impl From<Portfolio> for Vec<Instrument> {
    fn from(portfolio: Portfolio) -> Self {
        portfolio.instruments
    }
}
