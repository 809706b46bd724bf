//! Dividend-paying instrument definitions

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, Result, SimulationError};

/// Set of calendar months (1-12) in which an instrument pays a dividend
///
/// Stored as a bitmask, bit `m` set for month `m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct DividendCalendar(u16);

impl DividendCalendar {
    /// Build a calendar, rejecting months outside 1..=12
    pub fn new(months: &[u32]) -> Result<Self> {
        let mut mask = 0u16;
        for &m in months {
            if !(1..=12).contains(&m) {
                return Err(SimulationError::InvalidInput(format!(
                    "dividend month {} is outside 1..=12",
                    m
                )));
            }
            mask |= 1 << m;
        }
        Ok(Self(mask))
    }

    /// Calendar with no dividend months
    pub fn none() -> Self {
        Self(0)
    }

    /// Quarterly calendar starting at `first_month` (e.g. 3 -> {3,6,9,12})
    pub fn quarterly(first_month: u32) -> Result<Self> {
        let first = ((first_month + 11) % 12) + 1;
        let months: Vec<u32> = (0..4).map(|q| ((first - 1 + q * 3) % 12) + 1).collect();
        Self::new(&months)
    }

    /// Whether `month_in_year` (1-12) is a payment month
    pub fn contains(&self, month_in_year: u32) -> bool {
        month_in_year <= 12 && self.0 & (1 << month_in_year) != 0
    }

    /// Payment months in ascending order
    pub fn months(&self) -> Vec<u32> {
        (1..=12).filter(|&m| self.contains(m)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Parse a `|`, `;` or space separated month list such as `3|6|9|12`
    pub fn parse(text: &str) -> Result<Self> {
        let mut months = Vec::new();
        for part in text.split(|c: char| c == '|' || c == ';' || c.is_whitespace()) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let month: u32 = part.parse().map_err(|_| {
                SimulationError::InvalidInput(format!("invalid dividend month: {}", part))
            })?;
            months.push(month);
        }
        Self::new(&months)
    }
}

impl TryFrom<Vec<u32>> for DividendCalendar {
    type Error = SimulationError;

    fn try_from(months: Vec<u32>) -> Result<Self> {
        Self::new(&months)
    }
}

impl From<DividendCalendar> for Vec<u32> {
    fn from(calendar: DividendCalendar) -> Self {
        calendar.months()
    }
}

/// A dividend-paying instrument held alongside the loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Stable identifier (ticker)
    pub id: String,

    /// Units held before month 1
    pub initial_position: u64,

    /// Units bought on each purchase month
    pub periodic_purchase_qty: u64,

    /// Starting price per share
    pub price: f64,

    /// Annual price growth as a decimal (0.05 = 5%), may be negative
    pub annual_growth_rate: f64,

    /// Cash paid per share on each dividend month; a held unit of `lot_size`
    /// shares earns `lot_size * dividend_rate`
    pub dividend_rate: f64,

    /// Months in which the dividend is paid
    pub dividend_months: DividendCalendar,

    /// Shares per held unit; purchase cost, dividend cash and reinvestment
    /// unit cost are all scaled by it
    pub lot_size: u32,
}

impl Instrument {
    /// Create an instrument with no position, purchases, growth or dividend
    pub fn new(id: impl Into<String>, price: f64, dividend_months: DividendCalendar) -> Self {
        Self {
            id: id.into(),
            initial_position: 0,
            periodic_purchase_qty: 0,
            price,
            annual_growth_rate: 0.0,
            dividend_rate: 0.0,
            dividend_months,
            lot_size: 1,
        }
    }

    pub fn with_initial_position(mut self, units: u64) -> Self {
        self.initial_position = units;
        self
    }

    pub fn with_periodic_purchase(mut self, units: u64) -> Self {
        self.periodic_purchase_qty = units;
        self
    }

    /// Annual growth given in percent (5.0 = 5%)
    pub fn with_growth_percent(mut self, percent: f64) -> Self {
        self.annual_growth_rate = percent / 100.0;
        self
    }

    pub fn with_dividend_rate(mut self, rate: f64) -> Self {
        self.dividend_rate = rate;
        self
    }

    pub fn with_lot_size(mut self, lot_size: u32) -> Self {
        self.lot_size = lot_size;
        self
    }

    /// Check that the instrument can take part in a simulation
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(SimulationError::InvalidInput(
                "instrument id must not be empty".to_string(),
            ));
        }
        require_positive(&format!("{} price", self.id), self.price)?;
        require_non_negative(&format!("{} dividend_rate", self.id), self.dividend_rate)?;
        if !self.annual_growth_rate.is_finite() || self.annual_growth_rate <= -1.0 {
            return Err(SimulationError::InvalidInput(format!(
                "{} annual growth rate must be finite and above -100%, got {}",
                self.id, self.annual_growth_rate
            )));
        }
        if self.lot_size == 0 {
            return Err(SimulationError::InvalidInput(format!(
                "{} lot size must be at least 1",
                self.id
            )));
        }
        Ok(())
    }

    /// Cost of one held unit at `price`
    pub fn unit_cost(&self, price: f64) -> f64 {
        price * self.lot_size as f64
    }

    /// Dividend cash for `position` units
    pub fn dividend_for(&self, position: u64, month_in_year: u32) -> f64 {
        if self.dividend_months.contains(month_in_year) {
            position as f64 * self.lot_size as f64 * self.dividend_rate
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_membership() {
        let cal = DividendCalendar::new(&[3, 6, 9, 12]).unwrap();
        assert!(cal.contains(3));
        assert!(cal.contains(12));
        assert!(!cal.contains(1));
        assert!(!cal.contains(13));
        assert_eq!(cal.months(), vec![3, 6, 9, 12]);
    }

    #[test]
    fn test_calendar_rejects_bad_month() {
        assert!(DividendCalendar::new(&[0]).is_err());
        assert!(DividendCalendar::new(&[13]).is_err());
    }

    #[test]
    fn test_quarterly() {
        assert_eq!(DividendCalendar::quarterly(1).unwrap().months(), vec![1, 4, 7, 10]);
        assert_eq!(DividendCalendar::quarterly(2).unwrap().months(), vec![2, 5, 8, 11]);
        assert_eq!(DividendCalendar::quarterly(3).unwrap().months(), vec![3, 6, 9, 12]);
    }

    #[test]
    fn test_parse() {
        assert_eq!(DividendCalendar::parse("1|7").unwrap().months(), vec![1, 7]);
        assert_eq!(DividendCalendar::parse("2;5 8 11").unwrap().months(), vec![2, 5, 8, 11]);
        assert!(DividendCalendar::parse("").unwrap().is_empty());
        assert!(DividendCalendar::parse("x").is_err());
    }

    #[test]
    fn test_calendar_json() {
        let cal: DividendCalendar = serde_json::from_str("[12, 3, 6]").unwrap();
        assert_eq!(cal.months(), vec![3, 6, 12]);
        assert_eq!(serde_json::to_string(&cal).unwrap(), "[3,6,12]");
        assert!(serde_json::from_str::<DividendCalendar>("[14]").is_err());
    }

    #[test]
    fn test_dividend_gating() {
        let etf = Instrument::new("00919", 20.0, DividendCalendar::quarterly(3).unwrap())
            .with_dividend_rate(0.6);
        assert_eq!(etf.dividend_for(1000, 3), 600.0);
        assert_eq!(etf.dividend_for(1000, 4), 0.0);
    }

    #[test]
    fn test_lot_size_scaling() {
        let etf = Instrument::new("0056", 35.0, DividendCalendar::quarterly(1).unwrap())
            .with_dividend_rate(1.0)
            .with_lot_size(1000);
        assert_eq!(etf.unit_cost(35.0), 35_000.0);
        assert_eq!(etf.dividend_for(2, 1), 2_000.0);
    }

    #[test]
    fn test_validate() {
        let ok = Instrument::new("0050", 150.0, DividendCalendar::none());
        assert!(ok.validate().is_ok());

        let bad_price = Instrument::new("0050", 0.0, DividendCalendar::none());
        assert!(bad_price.validate().is_err());

        let bad_div = ok.clone().with_dividend_rate(-1.0);
        assert!(bad_div.validate().is_err());

        let bad_lot = ok.clone().with_lot_size(0);
        assert!(bad_lot.validate().is_err());

        let crash = ok.with_growth_percent(-100.0);
        assert!(crash.validate().is_err());
    }
}
