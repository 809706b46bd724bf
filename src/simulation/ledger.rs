//! Ledger output structures for simulation runs

use serde::{Deserialize, Serialize};

use super::strategy::{DividendStrategy, PurchaseSchedule};
use crate::loan::LoanTerms;

/// Position and price of one instrument after a month's events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: String,
    pub position: u64,
    pub price: f64,
    pub market_value: f64,
}

/// Per-instrument detail recorded in a ledger row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingSnapshot {
    pub id: String,
    /// Dividend cash paid this month (zero outside the instrument's dividend months)
    pub dividend: f64,
    /// Units held after purchases and reinvestment
    pub position: u64,
    pub price: f64,
    /// Units bought by the scheduled purchase this month
    pub units_purchased: u64,
}

/// A single month of simulation output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    // Timing
    pub month: u32,
    pub year: u32,
    pub month_in_year: u32,

    // Loan
    pub opening_balance: f64,
    pub interest: f64,
    /// Scheduled principal actually applied
    pub principal: f64,
    /// Principal applied beyond the scheduled portion
    pub extra_payment: f64,
    /// Principal plus extra payment
    pub actual_payment: f64,
    /// Actual payment plus interest
    pub total_payment: f64,
    pub remaining_balance: f64,
    /// Accrued interest exceeded the fixed payment and the principal was floored at zero
    pub principal_clamped: bool,

    // Dividends
    pub holdings: Vec<HoldingSnapshot>,
    pub total_dividend: f64,
    pub dividend_to_mortgage: f64,
    pub dividend_to_reinvest: f64,
    pub units_reinvested: u64,

    // Investment
    /// Cost of this month's scheduled purchases
    pub purchase_cost: f64,
    /// Cumulative cash put into instruments through this month
    pub total_invested: f64,
    /// Value of all holdings at this month's prices
    pub market_value: f64,
}

impl LedgerRow {
    /// Dividend paid by `id` this month
    pub fn dividend_of(&self, id: &str) -> Option<f64> {
        self.holdings.iter().find(|h| h.id == id).map(|h| h.dividend)
    }

    /// Whether any instrument paid a dividend this month
    pub fn has_dividend(&self) -> bool {
        self.total_dividend > 0.0
    }
}

/// Read-only aggregate over a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub original_monthly_payment: f64,
    pub payoff_month: u32,
    /// Loan year containing the payoff month
    pub payoff_year: u32,
    pub saved_months: u32,
    pub saved_years: u32,

    pub total_interest_paid: f64,
    pub total_principal_paid: f64,
    pub total_extra_payment: f64,
    pub total_dividend_received: f64,
    pub total_dividend_reinvested: f64,
    pub total_invested: f64,

    /// Fixed payment times the original term
    pub original_total_payment: f64,
    /// Principal plus interest paid, less the extra payments
    pub actual_total_payment: f64,
    pub saved_amount: f64,

    pub final_holdings: Vec<Holding>,
    pub final_market_value: f64,
}

/// One year of the ledger rolled up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: u32,
    pub interest: f64,
    pub principal: f64,
    pub dividend: f64,
    /// Months of the year in which any dividend was paid
    pub dividend_months: u32,
    /// Annual dividend spread over twelve months
    pub average_monthly_dividend: f64,
    pub extra_payment: f64,
    /// Sum of total payments (principal, extra and interest)
    pub total_payment: f64,
    /// Balance after the year's last simulated month
    pub ending_balance: f64,
    /// Share of the original principal repaid, in percent
    pub progress_percent: f64,
}

/// A point on the year-by-year balance curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub year: u32,
    pub balance: f64,
    pub principal_repaid: f64,
}

/// Complete simulation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub loan: LoanTerms,
    pub strategy: DividendStrategy,
    pub purchase_schedule: PurchaseSchedule,

    /// Monthly ledger rows, ascending by month
    pub ledger: Vec<LedgerRow>,

    pub summary: SimulationSummary,
}

impl SimulationResult {
    /// Roll the monthly ledger up by loan year
    pub fn yearly(&self) -> Vec<YearlySummary> {
        let mut years: Vec<YearlySummary> = Vec::new();

        for row in &self.ledger {
            if years.last().map(|y| y.year) != Some(row.year) {
                years.push(YearlySummary {
                    year: row.year,
                    interest: 0.0,
                    principal: 0.0,
                    dividend: 0.0,
                    dividend_months: 0,
                    average_monthly_dividend: 0.0,
                    extra_payment: 0.0,
                    total_payment: 0.0,
                    ending_balance: row.opening_balance,
                    progress_percent: 0.0,
                });
            }

            if let Some(year) = years.last_mut() {
                year.interest += row.interest;
                year.principal += row.principal;
                year.dividend += row.total_dividend;
                if row.has_dividend() {
                    year.dividend_months += 1;
                }
                year.extra_payment += row.extra_payment;
                year.total_payment += row.total_payment;
                year.ending_balance = row.remaining_balance;
            }
        }

        let principal = self.loan.principal;
        for year in &mut years {
            year.average_monthly_dividend = year.dividend / 12.0;
            year.progress_percent = (principal - year.ending_balance) / principal * 100.0;
        }

        years
    }

    /// Balance at the start, at each completed year, and at payoff
    pub fn balance_curve(&self) -> Vec<BalancePoint> {
        let principal = self.loan.principal;
        let mut points = vec![BalancePoint {
            year: 0,
            balance: principal,
            principal_repaid: 0.0,
        }];

        for row in &self.ledger {
            let year_end = row.month_in_year == 12;
            let paid_off_mid_year = row.remaining_balance <= 0.0 && !year_end;
            if year_end || paid_off_mid_year {
                points.push(BalancePoint {
                    year: row.year,
                    balance: row.remaining_balance,
                    principal_repaid: principal - row.remaining_balance,
                });
            }
        }

        points
    }

    /// Final ledger row, if any month was simulated
    pub fn last_row(&self) -> Option<&LedgerRow> {
        self.ledger.last()
    }

    /// Ledger rows in which a dividend was paid
    pub fn dividend_rows(&self) -> impl Iterator<Item = &LedgerRow> {
        self.ledger.iter().filter(|r| r.has_dividend())
    }
}
