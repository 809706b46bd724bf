//! Core month-by-month simulation of the loan and the dividend portfolio

use super::config::SimulationInput;
use super::ledger::{HoldingSnapshot, LedgerRow, SimulationResult, SimulationSummary};
use super::state::SimulationState;
use crate::loan::split_period;

/// Balances below `principal * SETTLEMENT_TOLERANCE` after a payment are
/// treated as fully repaid
pub const SETTLEMENT_TOLERANCE: f64 = 1e-9;

/// Main simulation engine
pub struct SimulationEngine {
    input: SimulationInput,
    monthly_rate: f64,
    fixed_payment: f64,
    target_index: Option<usize>,
}

impl SimulationEngine {
    /// Create a new engine for a validated input
    pub fn new(input: SimulationInput) -> Self {
        let monthly_rate = input.loan().monthly_rate();
        let fixed_payment = input.loan().fixed_payment();
        let target_index = input.target_index();
        Self {
            input,
            monthly_rate,
            fixed_payment,
            target_index,
        }
    }

    /// Override the scheduled payment, e.g. a negotiated lower installment
    ///
    /// A payment below the first month's interest is allowed; the principal
    /// portion is then floored at zero and only dividend cash reduces the balance.
    pub fn with_payment(mut self, payment: f64) -> Self {
        self.fixed_payment = payment;
        self
    }

    pub fn input(&self) -> &SimulationInput {
        &self.input
    }

    /// Scheduled fixed monthly payment
    pub fn fixed_payment(&self) -> f64 {
        self.fixed_payment
    }

    /// Run the full simulation
    ///
    /// Stops after the month in which the balance reaches zero, or after the
    /// original term.
    pub fn run(&self) -> SimulationResult {
        let loan = self.input.loan();
        let portfolio = self.input.portfolio();
        let config = self.input.config();

        log::info!(
            "Simulating {:.2} at {}% over {} months, strategy {}, purchases {}",
            loan.principal,
            loan.annual_rate_percent,
            loan.term_months,
            config.strategy,
            config.purchase_schedule
        );

        let mut state = SimulationState::new(loan.principal, portfolio);
        let mut ledger = Vec::with_capacity(loan.term_months as usize);

        for _month in 1..=loan.term_months {
            // Advance timing and apply annual price growth
            state.advance_month(portfolio);

            let row = self.simulate_month(&mut state);
            ledger.push(row);

            if state.is_paid_off() {
                state.payoff_month = Some(state.month);
                log::debug!("Loan paid off in month {}", state.month);
                break;
            }
        }

        let summary = self.summarize(&state);
        log::info!(
            "Payoff month {} of {}, total interest {:.2}, total dividends {:.2}",
            summary.payoff_month,
            loan.term_months,
            summary.total_interest_paid,
            summary.total_dividend_received
        );

        SimulationResult {
            loan: *loan,
            strategy: config.strategy.clone(),
            purchase_schedule: config.purchase_schedule,
            ledger,
            summary,
        }
    }

    /// Apply one month's events to `state` and record them
    fn simulate_month(&self, state: &mut SimulationState) -> LedgerRow {
        let loan = self.input.loan();
        let portfolio = self.input.portfolio();
        let config = self.input.config();
        let month_in_year = state.month_in_year;
        let opening_balance = state.balance;

        // Scheduled purchases at this month's prices
        let mut purchase_cost = 0.0;
        let mut units_purchased = vec![0u64; portfolio.len()];
        for (i, instrument) in portfolio.instruments().iter().enumerate() {
            let qty = instrument.periodic_purchase_qty;
            if qty > 0 && config.purchase_schedule.purchases_in(instrument, month_in_year) {
                let cost = qty as f64 * instrument.unit_cost(state.prices[i]);
                purchase_cost += cost;
                state.positions[i] = state.positions[i].saturating_add(qty);
                units_purchased[i] = qty;
            }
        }
        state.total_invested += purchase_cost;

        // Interest/principal split of the fixed payment
        let split = split_period(opening_balance, self.monthly_rate, self.fixed_payment);
        if split.clamped {
            log::warn!(
                "Month {}: interest {:.2} exceeds payment {:.2}, principal floored at zero",
                state.month,
                split.interest,
                self.fixed_payment
            );
        }

        // Dividends on positions after purchases
        let dividends: Vec<f64> = portfolio
            .instruments()
            .iter()
            .enumerate()
            .map(|(i, instrument)| instrument.dividend_for(state.positions[i], month_in_year))
            .collect();
        let total_dividend: f64 = dividends.iter().sum();

        // Route dividend cash per strategy
        let unit_cost = self.target_index.map(|t| {
            portfolio.instruments()[t].unit_cost(state.prices[t])
        });
        let routing = config.strategy.route(total_dividend, split.principal, unit_cost);
        if let (Some(t), true) = (self.target_index, routing.units_bought > 0) {
            state.positions[t] = state.positions[t].saturating_add(routing.units_bought);
            state.total_invested += routing.to_reinvest;
            state.total_reinvested += routing.to_reinvest;
            log::debug!(
                "Month {}: reinvested {:.2} into {} units of {}",
                state.month,
                routing.to_reinvest,
                routing.units_bought,
                portfolio.instruments()[t].id
            );
        }

        // Apply payment, capped at the outstanding balance
        let mut applied = (split.principal + routing.to_mortgage).min(opening_balance);
        if opening_balance - applied < loan.principal * SETTLEMENT_TOLERANCE {
            applied = opening_balance;
        }
        // Dividend-funded cash counts as extra; a settlement residue counts as principal
        let extra_payment = (applied - split.principal).max(0.0).min(routing.to_mortgage);
        let principal = applied - extra_payment;
        state.balance = opening_balance - applied;

        state.total_interest += split.interest;
        state.total_principal += principal;
        state.total_extra_payment += extra_payment;
        state.total_dividend += total_dividend;

        let holdings = portfolio
            .instruments()
            .iter()
            .enumerate()
            .map(|(i, instrument)| HoldingSnapshot {
                id: instrument.id.clone(),
                dividend: dividends[i],
                position: state.positions[i],
                price: state.prices[i],
                units_purchased: units_purchased[i],
            })
            .collect();

        LedgerRow {
            month: state.month,
            year: state.year,
            month_in_year,
            opening_balance,
            interest: split.interest,
            principal,
            extra_payment,
            actual_payment: applied,
            total_payment: applied + split.interest,
            remaining_balance: state.balance,
            principal_clamped: split.clamped,
            holdings,
            total_dividend,
            dividend_to_mortgage: routing.to_mortgage,
            dividend_to_reinvest: routing.to_reinvest,
            units_reinvested: routing.units_bought,
            purchase_cost,
            total_invested: state.total_invested,
            market_value: state.market_value(portfolio),
        }
    }

    /// Aggregate the final state into a summary
    fn summarize(&self, state: &SimulationState) -> SimulationSummary {
        let loan = self.input.loan();
        let portfolio = self.input.portfolio();

        let payoff_month = state.payoff_month.unwrap_or(loan.term_months);
        let payoff_year = payoff_month.div_ceil(12);

        let original_total_payment = self.fixed_payment * loan.term_months as f64;
        let actual_total_payment =
            loan.principal + state.total_interest - state.total_extra_payment;

        SimulationSummary {
            original_monthly_payment: self.fixed_payment,
            payoff_month,
            payoff_year,
            saved_months: loan.term_months - payoff_month,
            saved_years: loan.term_years().saturating_sub(payoff_year),
            total_interest_paid: state.total_interest,
            total_principal_paid: state.total_principal,
            total_extra_payment: state.total_extra_payment,
            total_dividend_received: state.total_dividend,
            total_dividend_reinvested: state.total_reinvested,
            total_invested: state.total_invested,
            original_total_payment,
            actual_total_payment,
            saved_amount: (original_total_payment - actual_total_payment).max(0.0),
            final_holdings: state.holdings(portfolio),
            final_market_value: state.market_value(portfolio),
        }
    }
}

/// Run a simulation for a validated input
pub fn simulate(input: SimulationInput) -> SimulationResult {
    SimulationEngine::new(input).run()
}
