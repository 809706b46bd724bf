//! Fixed-payment annuity math
//!
//! Pure functions only: no validation happens here, callers are expected to
//! pass a positive term and finite inputs (see `LoanTerms::new`).

/// Convert an annual percentage rate (e.g. 2.0 for 2%) to a monthly decimal rate
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 12.0 / 100.0
}

/// Fixed monthly payment that fully amortizes `principal` over `term_months`
///
/// Zero-rate loans are repaid straight-line. Otherwise the standard annuity
/// formula `P * r * (1+r)^n / ((1+r)^n - 1)` is used.
pub fn fixed_payment(principal: f64, annual_rate_percent: f64, term_months: u32) -> f64 {
    let r = monthly_rate(annual_rate_percent);
    let n = term_months as f64;

    if r == 0.0 {
        return principal / n;
    }

    let growth = match i32::try_from(term_months) {
        Ok(n) => (1.0 + r).powi(n),
        Err(_) => (1.0 + r).powf(n),
    };
    if !growth.is_finite() {
        // Interest-only limit of the annuity
        return principal * r;
    }
    principal * r * growth / (growth - 1.0)
}

/// Interest/principal decomposition of one scheduled payment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodSplit {
    /// Interest accrued on the opening balance
    pub interest: f64,
    /// Scheduled principal portion, floored at zero
    pub principal: f64,
    /// True when accrued interest exceeded the payment and the principal was clamped
    pub clamped: bool,
}

/// Split a fixed payment into interest and principal for one month
///
/// If the interest on `balance` exceeds `payment`, the principal portion is
/// clamped to zero so the balance can never grow from a scheduled payment.
pub fn split_period(balance: f64, monthly_rate: f64, payment: f64) -> PeriodSplit {
    let interest = balance * monthly_rate;
    let raw_principal = payment - interest;

    PeriodSplit {
        interest,
        principal: raw_principal.max(0.0),
        clamped: raw_principal < 0.0,
    }
}
