use crate::error::Error;
use shared::types::{BASIS_POINTS, MAX_INTEREST_RATE, MIN_INTEREST_RATE};
use shared::{LoanParams, LoanStatus};

/// Check the numeric loan parameters.
///
/// The principal token is checked separately since it needs a live call.
pub fn validate_params(params: &LoanParams) -> Result<(), Error> {
    if params.principal_requested <= 0 {
        return Err(Error::InvalidPrincipalAmount);
    }
    if params.loan_period == 0 {
        return Err(Error::InvalidLoanPeriod);
    }
    if params.interest_rate < MIN_INTEREST_RATE || params.interest_rate >= MAX_INTEREST_RATE {
        return Err(Error::InvalidInterestRate);
    }
    if params.term_payment < 0 {
        return Err(Error::InvalidTermPayment);
    }
    if params.grace_period_payment < 0 {
        return Err(Error::InvalidGracePeriodPayment);
    }
    Ok(())
}

/// Forward edges of the loan state machine.
pub fn is_allowed_transition(from: LoanStatus, to: LoanStatus) -> bool {
    matches!(
        (from, to),
        (LoanStatus::NotStarted, LoanStatus::FundingStarted)
            | (LoanStatus::FundingStarted, LoanStatus::FundingFailed)
            | (LoanStatus::FundingStarted, LoanStatus::FundingComplete)
            | (LoanStatus::FundingComplete, LoanStatus::RepaymentCycle)
            | (LoanStatus::RepaymentCycle, LoanStatus::RepaymentComplete)
    )
}

/// Calculate principal plus simple interest
///
/// Formula: repayment = principal × (1 + rate)
///
/// Example:
/// - principal: 10,000
/// - rate: 5% (500 basis points)
/// - repayment: 10,000 × 105% = 10,500
pub fn calculate_expected_repayment(principal: i128, interest_rate: u32) -> Option<i128> {
    let multiplier = BASIS_POINTS.checked_add(interest_rate as i128)?;

    principal.checked_mul(multiplier)?.checked_div(BASIS_POINTS)
}
