//! Load instruments from CSV
//!
//! Expected columns:
//! `id,initial_position,periodic_purchase_qty,price,annual_growth_percent,dividend_rate,dividend_months,lot_size`
//! with dividend months written as `3|6|9|12`. Every column after `price`
//! may be left empty.

use super::{DividendCalendar, Instrument, Portfolio};
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the instrument file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    initial_position: Option<u64>,
    #[serde(default)]
    periodic_purchase_qty: Option<u64>,
    price: f64,
    #[serde(default)]
    annual_growth_percent: Option<f64>,
    #[serde(default)]
    dividend_rate: Option<f64>,
    #[serde(default)]
    dividend_months: Option<String>,
    #[serde(default)]
    lot_size: Option<u32>,
}

impl CsvRow {
    fn into_instrument(self) -> Result<Instrument> {
        let dividend_months = match self.dividend_months.as_deref() {
            Some(text) => DividendCalendar::parse(text)?,
            None => DividendCalendar::none(),
        };

        Ok(Instrument {
            id: self.id.trim().to_string(),
            initial_position: self.initial_position.unwrap_or(0),
            periodic_purchase_qty: self.periodic_purchase_qty.unwrap_or(0),
            price: self.price,
            annual_growth_rate: self.annual_growth_percent.unwrap_or(0.0) / 100.0,
            dividend_rate: self.dividend_rate.unwrap_or(0.0),
            dividend_months,
            lot_size: self.lot_size.unwrap_or(1),
        })
    }
}

/// Load a portfolio from a CSV file
pub fn load_instruments<P: AsRef<Path>>(path: P) -> Result<Portfolio> {
    let mut reader = Reader::from_path(path)?;
    read_rows(&mut reader)
}

/// Load a portfolio from any reader (e.g. string buffer, stdin)
pub fn load_instruments_from_reader<R: std::io::Read>(reader: R) -> Result<Portfolio> {
    let mut csv_reader = Reader::from_reader(reader);
    read_rows(&mut csv_reader)
}

fn read_rows<R: std::io::Read>(reader: &mut Reader<R>) -> Result<Portfolio> {
    let mut instruments = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        instruments.push(row.into_instrument()?);
    }

    log::debug!("Loaded {} instruments", instruments.len());
    Portfolio::new(instruments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;

    const SAMPLE: &str = "\
id,initial_position,periodic_purchase_qty,price,annual_growth_percent,dividend_rate,dividend_months,lot_size
0056,0,1000,36,3,0.7,1|4|7|10,1
00919,2000,,23,,0.6,3|6|9|12,
0050,0,0,180,8,,1|7,1
";

    #[test]
    fn test_load_from_reader() {
        let portfolio = load_instruments_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(portfolio.len(), 3);

        let high_div = portfolio.get("0056").unwrap();
        assert_eq!(high_div.periodic_purchase_qty, 1000);
        assert!((high_div.annual_growth_rate - 0.03).abs() < 1e-12);
        assert_eq!(high_div.dividend_months.months(), vec![1, 4, 7, 10]);

        let quarterly = portfolio.get("00919").unwrap();
        assert_eq!(quarterly.initial_position, 2000);
        assert_eq!(quarterly.periodic_purchase_qty, 0);
        assert_eq!(quarterly.annual_growth_rate, 0.0);
        assert_eq!(quarterly.lot_size, 1);

        let growth = portfolio.get("0050").unwrap();
        assert_eq!(growth.dividend_rate, 0.0);
    }

    #[test]
    fn test_bad_month_rejected() {
        let csv = "id,price,dividend_months\nX,10,0|13\n";
        let result = load_instruments_from_reader(csv.as_bytes());
        assert!(matches!(result, Err(SimulationError::InvalidInput(_))));
    }

    #[test]
    fn test_malformed_number_rejected() {
        let csv = "id,price\nX,abc\n";
        let result = load_instruments_from_reader(csv.as_bytes());
        assert!(matches!(result, Err(SimulationError::Csv(_))));
    }

    #[test]
    fn test_load_bundled_data() {
        let portfolio = load_instruments("data/instruments.csv").expect("Failed to load instruments");
        assert_eq!(portfolio.len(), 4);
        assert!(portfolio.get("0050").is_some());
    }
}
