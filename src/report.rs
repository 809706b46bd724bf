//! CSV output for simulation ledgers

use csv::Writer;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::simulation::{LedgerRow, SimulationResult};

const LEADING_COLUMNS: [&str; 10] = [
    "Month",
    "Year",
    "MonthInYear",
    "OpeningBalance",
    "Interest",
    "Principal",
    "ExtraPayment",
    "ActualPayment",
    "TotalPayment",
    "RemainingBalance",
];

const TRAILING_COLUMNS: [&str; 7] = [
    "TotalDividend",
    "DividendToMortgage",
    "DividendToReinvest",
    "UnitsReinvested",
    "PurchaseCost",
    "TotalInvested",
    "MarketValue",
];

/// Write the monthly ledger, one row per month with per-instrument columns
pub fn write_ledger<W: Write>(writer: W, result: &SimulationResult) -> Result<()> {
    let mut csv = Writer::from_writer(writer);

    let ids: Vec<&str> = result
        .ledger
        .first()
        .map(|row| row.holdings.iter().map(|h| h.id.as_str()).collect())
        .unwrap_or_default();

    let mut header: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
    for id in &ids {
        header.push(format!("{}_Dividend", id));
        header.push(format!("{}_Position", id));
        header.push(format!("{}_Price", id));
    }
    header.extend(TRAILING_COLUMNS.iter().map(|c| c.to_string()));
    csv.write_record(&header)?;

    for row in &result.ledger {
        csv.write_record(ledger_record(row))?;
    }

    csv.flush()?;
    Ok(())
}

fn ledger_record(row: &LedgerRow) -> Vec<String> {
    let mut record = vec![
        row.month.to_string(),
        row.year.to_string(),
        row.month_in_year.to_string(),
        format!("{:.2}", row.opening_balance),
        format!("{:.2}", row.interest),
        format!("{:.2}", row.principal),
        format!("{:.2}", row.extra_payment),
        format!("{:.2}", row.actual_payment),
        format!("{:.2}", row.total_payment),
        format!("{:.2}", row.remaining_balance),
    ];
    for holding in &row.holdings {
        record.push(format!("{:.2}", holding.dividend));
        record.push(holding.position.to_string());
        record.push(format!("{:.4}", holding.price));
    }
    record.extend([
        format!("{:.2}", row.total_dividend),
        format!("{:.2}", row.dividend_to_mortgage),
        format!("{:.2}", row.dividend_to_reinvest),
        row.units_reinvested.to_string(),
        format!("{:.2}", row.purchase_cost),
        format!("{:.2}", row.total_invested),
        format!("{:.2}", row.market_value),
    ]);
    record
}

/// Write the yearly rollup, one serialized `YearlySummary` per line
pub fn write_yearly<W: Write>(writer: W, result: &SimulationResult) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    for year in result.yearly() {
        csv.serialize(year)?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the monthly ledger to a file
pub fn write_ledger_file<P: AsRef<Path>>(path: P, result: &SimulationResult) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_ledger(file, result)
}

/// Write the yearly rollup to a file
pub fn write_yearly_file<P: AsRef<Path>>(path: P, result: &SimulationResult) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_yearly(file, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanTerms;
    use crate::portfolio::{DividendCalendar, Instrument, Portfolio};
    use crate::simulation::{simulate, SimulationConfig, SimulationInput};

    fn result() -> SimulationResult {
        let loan = LoanTerms::new(1_200_000.0, 1.5, 24).unwrap();
        let portfolio = Portfolio::new(vec![
            Instrument::new("00919", 20.0, DividendCalendar::quarterly(3).unwrap())
                .with_periodic_purchase(100)
                .with_dividend_rate(0.6),
            Instrument::new("0050", 180.0, DividendCalendar::new(&[1, 7]).unwrap()),
        ])
        .unwrap();
        simulate(SimulationInput::new(loan, portfolio, SimulationConfig::default()).unwrap())
    }

    #[test]
    fn test_ledger_csv_shape() {
        let result = result();
        let mut buffer = Vec::new();
        write_ledger(&mut buffer, &result).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), result.ledger.len() + 1);

        let header: Vec<&str> = lines[0].split(',').collect();
        assert_eq!(header.len(), 10 + 2 * 3 + 7);
        assert_eq!(header[10], "00919_Dividend");
        assert_eq!(header[13], "0050_Dividend");

        let march: Vec<&str> = lines[3].split(',').collect();
        assert_eq!(march[0], "3");
        assert_eq!(march[10], "180.00");
        assert_eq!(march[11], "300");
    }

    #[test]
    fn test_yearly_csv() {
        let result = result();
        let mut buffer = Vec::new();
        write_yearly(&mut buffer, &result).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("year,interest,principal,dividend"));
        assert!(lines[1].starts_with("1,"));
    }
}
