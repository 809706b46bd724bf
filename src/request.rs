//! Caller-facing parameter bundle
//!
//! Mirrors what a form or JSON body supplies: plain values, string strategy
//! names and optional fields with defaults. `into_input` resolves it once into
//! a validated `SimulationInput` before any simulation work begins.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SimulationError};
use crate::loan::{months_from_years, LoanTerms};
use crate::portfolio::{DividendCalendar, Instrument, Portfolio};
use crate::simulation::{DividendStrategy, PurchaseSchedule, SimulationConfig, SimulationInput};

fn default_strategy() -> String {
    DividendStrategy::MORTGAGE.to_string()
}

fn default_purchase_schedule() -> String {
    PurchaseSchedule::EveryMonth.name().to_string()
}

fn default_lot_size() -> u32 {
    1
}

/// Loan section of a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: f64,

    /// Annual rate in percent (2.0 = 2%)
    pub annual_rate_percent: f64,

    /// Term in months; takes precedence over `term_years`
    #[serde(default)]
    pub term_months: Option<u32>,

    #[serde(default)]
    pub term_years: Option<u32>,
}

impl LoanRequest {
    fn to_terms(&self) -> Result<LoanTerms> {
        let term_months = match (self.term_months, self.term_years) {
            (Some(months), _) => months,
            (None, Some(years)) => months_from_years(years)?,
            (None, None) => {
                return Err(SimulationError::InvalidInput(
                    "loan term is required (term_months or term_years)".to_string(),
                ))
            }
        };
        LoanTerms::new(self.principal, self.annual_rate_percent, term_months)
    }
}

/// One instrument as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentRequest {
    pub id: String,

    #[serde(default)]
    pub initial_position: u64,

    #[serde(default)]
    pub periodic_purchase_qty: u64,

    pub price: f64,

    /// Annual price growth in percent (5.0 = 5%)
    #[serde(default)]
    pub annual_growth_percent: f64,

    #[serde(default)]
    pub dividend_rate: f64,

    #[serde(default)]
    pub dividend_months: Vec<u32>,

    #[serde(default = "default_lot_size")]
    pub lot_size: u32,
}

impl InstrumentRequest {
    fn to_instrument(&self) -> Result<Instrument> {
        Ok(Instrument {
            id: self.id.trim().to_string(),
            initial_position: self.initial_position,
            periodic_purchase_qty: self.periodic_purchase_qty,
            price: self.price,
            annual_growth_rate: self.annual_growth_percent / 100.0,
            dividend_rate: self.dividend_rate,
            dividend_months: DividendCalendar::new(&self.dividend_months)?,
            lot_size: self.lot_size,
        })
    }
}

/// Full simulation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub loan: LoanRequest,

    /// Instruments in display order; when empty the built-in preset is used
    #[serde(default)]
    pub instruments: Vec<InstrumentRequest>,

    /// `mortgage`, `full-reinvest` or `mortgage-then-reinvest`
    #[serde(default = "default_strategy")]
    pub strategy: String,

    /// Instrument bought with dividend cash by the reinvest strategies
    #[serde(default)]
    pub reinvest_target: Option<String>,

    /// `every-month` or `dividend-months`
    #[serde(default = "default_purchase_schedule")]
    pub purchase_schedule: String,
}

impl SimulationRequest {
    /// Parse a request from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a request from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Validate every field and resolve strategy names
    pub fn into_input(self) -> Result<SimulationInput> {
        let loan = self.loan.to_terms()?;

        let portfolio = if self.instruments.is_empty() {
            Portfolio::taiwan_etf_preset()
        } else {
            let instruments = self
                .instruments
                .iter()
                .map(InstrumentRequest::to_instrument)
                .collect::<Result<Vec<_>>>()?;
            Portfolio::new(instruments)?
        };

        let strategy = DividendStrategy::resolve(&self.strategy, self.reinvest_target.as_deref())?;
        let purchase_schedule: PurchaseSchedule = self.purchase_schedule.parse()?;

        SimulationInput::new(
            loan,
            portfolio,
            SimulationConfig {
                strategy,
                purchase_schedule,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "loan": { "principal": 10000000, "annual_rate_percent": 2.0, "term_years": 20 },
        "instruments": [
            { "id": "00919", "price": 20, "periodic_purchase_qty": 1000,
              "dividend_rate": 0.6, "dividend_months": [3, 6, 9, 12] }
        ]
    }"#;

    #[test]
    fn test_defaults_applied() {
        let request = SimulationRequest::from_json(MINIMAL).unwrap();
        assert_eq!(request.strategy, "mortgage");
        assert_eq!(request.purchase_schedule, "every-month");
        assert_eq!(request.instruments[0].lot_size, 1);
        assert_eq!(request.instruments[0].initial_position, 0);

        let input = request.into_input().unwrap();
        assert_eq!(input.loan().term_months, 240);
        assert_eq!(input.config().strategy, DividendStrategy::Mortgage);
        assert_eq!(input.portfolio().len(), 1);
    }

    #[test]
    fn test_term_months_precedence() {
        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.loan.term_months = Some(36);
        assert_eq!(request.into_input().unwrap().loan().term_months, 36);
    }

    #[test]
    fn test_missing_term_rejected() {
        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.loan.term_years = None;
        assert!(matches!(request.into_input(), Err(SimulationError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_instruments_use_preset() {
        let json = r#"{ "loan": { "principal": 5000000, "annual_rate_percent": 2.1, "term_years": 30 } }"#;
        let input = SimulationRequest::from_json(json).unwrap().into_input().unwrap();
        assert_eq!(input.portfolio().len(), 4);
    }

    #[test]
    fn test_strategy_errors() {
        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.strategy = "full-reinvest".to_string();
        assert!(matches!(
            request.clone().into_input(),
            Err(SimulationError::MissingReinvestTarget)
        ));

        request.reinvest_target = Some("0050".to_string());
        assert!(matches!(
            request.clone().into_input(),
            Err(SimulationError::UnknownInstrument(_))
        ));

        request.reinvest_target = Some("00919".to_string());
        assert!(request.clone().into_input().is_ok());

        request.strategy = "afterMortgage".to_string();
        assert!(matches!(request.into_input(), Err(SimulationError::UnknownStrategy(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.loan.principal = -1.0;
        assert!(request.into_input().is_err());

        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.instruments[0].dividend_months = vec![0];
        assert!(request.into_input().is_err());

        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.purchase_schedule = "weekly".to_string();
        assert!(matches!(
            request.into_input(),
            Err(SimulationError::UnknownPurchaseSchedule(_))
        ));
    }

    #[test]
    fn test_out_of_range_terms_rejected() {
        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.loan.term_years = Some(400_000_000);
        assert!(matches!(
            request.into_input(),
            Err(SimulationError::InvalidInput(_))
        ));

        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.loan.term_months = Some(3_000_000_000);
        assert!(matches!(
            request.into_input(),
            Err(SimulationError::InvalidInput(_))
        ));

        let mut request = SimulationRequest::from_json(MINIMAL).unwrap();
        request.loan.term_years = Some(100);
        assert_eq!(request.into_input().unwrap().loan().term_months, 1200);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimulationRequest::from_json("{ not json"),
            Err(SimulationError::Json(_))
        ));
    }

    #[test]
    fn test_bundled_request_file() {
        let input = SimulationRequest::from_path("data/request.json")
            .expect("Failed to load request")
            .into_input()
            .unwrap();
        assert_eq!(input.config().strategy.name(), "mortgage-then-reinvest");
    }
}
