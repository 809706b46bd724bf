//! Run-level policies: dividend cash routing and purchase timing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SimulationError};
use crate::portfolio::Instrument;

/// How a month's dividend cash is split between the loan and reinvestment
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DividendStrategy {
    /// All dividend cash goes to extra principal
    #[default]
    Mortgage,
    /// All dividend cash buys whole units of `target`; the remainder pays principal
    FullReinvest { target: String },
    /// Dividend cash first covers the scheduled principal portion, the
    /// surplus buys whole units of `target`, any remainder pays principal
    MortgageThenReinvest { target: String },
}

impl DividendStrategy {
    pub const MORTGAGE: &'static str = "mortgage";
    pub const FULL_REINVEST: &'static str = "full-reinvest";
    pub const MORTGAGE_THEN_REINVEST: &'static str = "mortgage-then-reinvest";

    /// Resolve a strategy from its name and optional reinvestment target
    ///
    /// A target is ignored for `mortgage` and required for both reinvest variants.
    pub fn resolve(name: &str, target: Option<&str>) -> Result<Self> {
        let target = target.map(str::trim).filter(|t| !t.is_empty());
        match name.trim() {
            Self::MORTGAGE => Ok(DividendStrategy::Mortgage),
            Self::FULL_REINVEST => Ok(DividendStrategy::FullReinvest {
                target: target.ok_or(SimulationError::MissingReinvestTarget)?.to_string(),
            }),
            Self::MORTGAGE_THEN_REINVEST => Ok(DividendStrategy::MortgageThenReinvest {
                target: target.ok_or(SimulationError::MissingReinvestTarget)?.to_string(),
            }),
            other => Err(SimulationError::UnknownStrategy(other.to_string())),
        }
    }

    /// Every strategy, with both reinvest variants pointed at `target`
    pub fn all(target: &str) -> Vec<Self> {
        vec![
            DividendStrategy::Mortgage,
            DividendStrategy::FullReinvest { target: target.to_string() },
            DividendStrategy::MortgageThenReinvest { target: target.to_string() },
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            DividendStrategy::Mortgage => Self::MORTGAGE,
            DividendStrategy::FullReinvest { .. } => Self::FULL_REINVEST,
            DividendStrategy::MortgageThenReinvest { .. } => Self::MORTGAGE_THEN_REINVEST,
        }
    }

    /// Reinvestment target, if the strategy reinvests
    pub fn target(&self) -> Option<&str> {
        match self {
            DividendStrategy::Mortgage => None,
            DividendStrategy::FullReinvest { target }
            | DividendStrategy::MortgageThenReinvest { target } => Some(target),
        }
    }

    /// Split `dividend_cash` for one month
    ///
    /// `scheduled_principal` is the (already clamped) principal portion of the
    /// fixed payment. `unit_cost` is the price of one whole unit of the target,
    /// `None` when the strategy has no target.
    pub fn route(
        &self,
        dividend_cash: f64,
        scheduled_principal: f64,
        unit_cost: Option<f64>,
    ) -> DividendRouting {
        match self {
            DividendStrategy::Mortgage => DividendRouting::all_to_mortgage(dividend_cash),
            DividendStrategy::FullReinvest { .. } => {
                let (units, spent) = buy_whole_units(dividend_cash, unit_cost);
                DividendRouting {
                    to_mortgage: (dividend_cash - spent).max(0.0),
                    to_reinvest: spent,
                    units_bought: units,
                }
            }
            DividendStrategy::MortgageThenReinvest { .. } => {
                let covered = dividend_cash.min(scheduled_principal.max(0.0));
                let surplus = dividend_cash - covered;
                let (units, spent) = buy_whole_units(surplus, unit_cost);
                DividendRouting {
                    to_mortgage: covered + (surplus - spent).max(0.0),
                    to_reinvest: spent,
                    units_bought: units,
                }
            }
        }
    }
}

impl fmt::Display for DividendStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{} -> {}", self.name(), target),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Largest whole number of units `budget` can buy, and what they cost
fn buy_whole_units(budget: f64, unit_cost: Option<f64>) -> (u64, f64) {
    match unit_cost {
        Some(cost) if cost > 0.0 && budget > 0.0 => {
            let units = (budget / cost).floor() as u64;
            (units, units as f64 * cost)
        }
        _ => (0, 0.0),
    }
}

/// Outcome of routing one month's dividend cash
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DividendRouting {
    /// Cash applied to the loan on top of the scheduled principal
    pub to_mortgage: f64,
    /// Cash spent on whole units of the target
    pub to_reinvest: f64,
    /// Units of the target bought
    pub units_bought: u64,
}

impl DividendRouting {
    pub fn all_to_mortgage(cash: f64) -> Self {
        Self {
            to_mortgage: cash,
            to_reinvest: 0.0,
            units_bought: 0,
        }
    }
}

/// When scheduled purchases happen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PurchaseSchedule {
    /// Every instrument buys its periodic quantity every month
    #[default]
    EveryMonth,
    /// An instrument only buys in its own dividend months
    DividendMonths,
}

impl PurchaseSchedule {
    pub fn name(&self) -> &'static str {
        match self {
            PurchaseSchedule::EveryMonth => "every-month",
            PurchaseSchedule::DividendMonths => "dividend-months",
        }
    }

    /// Whether `instrument` makes its scheduled purchase in `month_in_year`
    pub fn purchases_in(&self, instrument: &Instrument, month_in_year: u32) -> bool {
        match self {
            PurchaseSchedule::EveryMonth => true,
            PurchaseSchedule::DividendMonths => instrument.dividend_months.contains(month_in_year),
        }
    }
}

impl FromStr for PurchaseSchedule {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "every-month" => Ok(PurchaseSchedule::EveryMonth),
            "dividend-months" => Ok(PurchaseSchedule::DividendMonths),
            other => Err(SimulationError::UnknownPurchaseSchedule(other.to_string())),
        }
    }
}

impl fmt::Display for PurchaseSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::DividendCalendar;
    use approx::assert_relative_eq;

    fn reinvest(target: &str) -> DividendStrategy {
        DividendStrategy::FullReinvest { target: target.to_string() }
    }

    #[test]
    fn test_resolve() {
        assert_eq!(DividendStrategy::resolve("mortgage", None).unwrap(), DividendStrategy::Mortgage);
        assert_eq!(
            DividendStrategy::resolve("mortgage", Some("0050")).unwrap(),
            DividendStrategy::Mortgage
        );
        assert_eq!(DividendStrategy::resolve("full-reinvest", Some("0050")).unwrap(), reinvest("0050"));
        assert!(matches!(
            DividendStrategy::resolve("full-reinvest", None),
            Err(SimulationError::MissingReinvestTarget)
        ));
        assert!(matches!(
            DividendStrategy::resolve("mortgage-then-reinvest", Some("  ")),
            Err(SimulationError::MissingReinvestTarget)
        ));
        assert!(matches!(
            DividendStrategy::resolve("full0050", Some("0050")),
            Err(SimulationError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_mortgage_routes_everything() {
        let routing = DividendStrategy::Mortgage.route(12_345.0, 40_000.0, None);
        assert_eq!(routing, DividendRouting::all_to_mortgage(12_345.0));
    }

    #[test]
    fn test_full_reinvest_conserves_cash() {
        let routing = reinvest("0050").route(1_000.0, 40_000.0, Some(180.0));
        assert_eq!(routing.units_bought, 5);
        assert_relative_eq!(routing.to_reinvest, 900.0);
        assert_relative_eq!(routing.to_mortgage, 100.0);
        assert!(routing.to_mortgage < 180.0);
    }

    #[test]
    fn test_full_reinvest_too_small_goes_to_mortgage() {
        let routing = reinvest("0050").route(150.0, 40_000.0, Some(180.0));
        assert_eq!(routing.units_bought, 0);
        assert_eq!(routing.to_reinvest, 0.0);
        assert_eq!(routing.to_mortgage, 150.0);
    }

    #[test]
    fn test_mortgage_then_reinvest_covers_principal_first() {
        let strategy = DividendStrategy::MortgageThenReinvest { target: "0050".to_string() };

        // Dividend below the principal portion: all to the loan
        let small = strategy.route(30_000.0, 40_000.0, Some(180.0));
        assert_eq!(small.units_bought, 0);
        assert_eq!(small.to_mortgage, 30_000.0);

        // Surplus 1,000 buys 5 units at 180, 100 left over returns to the loan
        let large = strategy.route(41_000.0, 40_000.0, Some(180.0));
        assert_eq!(large.units_bought, 5);
        assert_relative_eq!(large.to_reinvest, 900.0);
        assert_relative_eq!(large.to_mortgage, 40_100.0);
    }

    #[test]
    fn test_mortgage_then_reinvest_with_clamped_principal() {
        let strategy = DividendStrategy::MortgageThenReinvest { target: "t".to_string() };
        let routing = strategy.route(500.0, 0.0, Some(100.0));
        assert_eq!(routing.units_bought, 5);
        assert_eq!(routing.to_mortgage, 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(DividendStrategy::Mortgage.to_string(), "mortgage");
        assert_eq!(reinvest("0050").to_string(), "full-reinvest -> 0050");
    }

    #[test]
    fn test_purchase_schedule() {
        let etf = Instrument::new("00919", 20.0, DividendCalendar::quarterly(3).unwrap());
        assert!(PurchaseSchedule::EveryMonth.purchases_in(&etf, 1));
        assert!(!PurchaseSchedule::DividendMonths.purchases_in(&etf, 1));
        assert!(PurchaseSchedule::DividendMonths.purchases_in(&etf, 3));

        assert_eq!("dividend-months".parse::<PurchaseSchedule>().unwrap(), PurchaseSchedule::DividendMonths);
        assert!("weekly".parse::<PurchaseSchedule>().is_err());
    }
}
