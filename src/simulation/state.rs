//! Mutable state carried from one simulated month to the next

use super::ledger::Holding;
use crate::portfolio::Portfolio;

/// State of the loan and holdings at a point in the simulation
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current month (1-indexed, 0 before the first advance)
    pub month: u32,

    /// Loan year (1-indexed)
    pub year: u32,

    /// Calendar month within the year (1-12)
    pub month_in_year: u32,

    /// Outstanding loan balance
    pub balance: f64,

    /// Units held, in portfolio order
    pub positions: Vec<u64>,

    /// Current price per share, in portfolio order
    pub prices: Vec<f64>,

    /// Cumulative interest accrued
    pub total_interest: f64,

    /// Cumulative scheduled principal repaid
    pub total_principal: f64,

    /// Cumulative extra principal repaid
    pub total_extra_payment: f64,

    /// Cumulative dividend cash received
    pub total_dividend: f64,

    /// Cumulative dividend cash spent on reinvestment
    pub total_reinvested: f64,

    /// Cumulative cash put into instruments (scheduled purchases and reinvestment)
    pub total_invested: f64,

    /// First month in which the balance reached zero
    pub payoff_month: Option<u32>,
}

impl SimulationState {
    /// Initialize state before month 1
    pub fn new(principal: f64, portfolio: &Portfolio) -> Self {
        let instruments = portfolio.instruments();
        Self {
            month: 0,
            year: 1,
            month_in_year: 0,
            balance: principal,
            positions: instruments.iter().map(|i| i.initial_position).collect(),
            prices: instruments.iter().map(|i| i.price).collect(),
            total_interest: 0.0,
            total_principal: 0.0,
            total_extra_payment: 0.0,
            total_dividend: 0.0,
            total_reinvested: 0.0,
            total_invested: 0.0,
            payoff_month: None,
        }
    }

    /// Advance to the next month, compounding prices at the start of each year after the first
    pub fn advance_month(&mut self, portfolio: &Portfolio) {
        self.month += 1;
        self.year = (self.month - 1) / 12 + 1;
        self.month_in_year = (self.month - 1) % 12 + 1;

        if self.month_in_year == 1 && self.month > 1 {
            for (price, instrument) in self.prices.iter_mut().zip(portfolio.instruments()) {
                *price *= 1.0 + instrument.annual_growth_rate;
            }
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= 0.0
    }

    /// Market value of all holdings at current prices
    pub fn market_value(&self, portfolio: &Portfolio) -> f64 {
        portfolio
            .instruments()
            .iter()
            .enumerate()
            .map(|(i, instrument)| self.positions[i] as f64 * instrument.unit_cost(self.prices[i]))
            .sum()
    }

    /// Current positions and prices, in portfolio order
    pub fn holdings(&self, portfolio: &Portfolio) -> Vec<Holding> {
        portfolio
            .instruments()
            .iter()
            .enumerate()
            .map(|(i, instrument)| Holding {
                id: instrument.id.clone(),
                position: self.positions[i],
                price: self.prices[i],
                market_value: self.positions[i] as f64 * instrument.unit_cost(self.prices[i]),
            })
            .collect()
    }
}
