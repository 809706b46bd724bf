//! Loan terms and the fixed-payment amortization engine

mod amortization;
mod terms;

pub use amortization::{fixed_payment, monthly_rate, split_period, PeriodSplit};
pub use terms::{months_from_years, LoanTerms, MAX_TERM_MONTHS};
