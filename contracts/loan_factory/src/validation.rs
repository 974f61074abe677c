use crate::error::Error;
use shared::types::{MAX_INTEREST_RATE, MIN_INTEREST_RATE};
use shared::LoanParams;

/// Reject requests the terms contract would refuse, before anything is deployed.
pub fn validate_request(params: &LoanParams, crowdfund_length: u64) -> Result<(), Error> {
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
    if crowdfund_length == 0 {
        return Err(Error::InvalidCrowdfundLength);
    }
    Ok(())
}

/// Component tags folded into deployment salts
pub const TAG_TERMS: u8 = 1;
pub const TAG_CROWDLOAN: u8 = 2;
pub const TAG_REPAYMENT: u8 = 3;
pub const TAG_ROUTER: u8 = 4;

/// 32-byte salt: big-endian loan id followed by the component tag.
pub fn salt_bytes(id: u32, tag: u8) -> [u8; 32] {
    let mut salt = [0u8; 32];
    salt[..4].copy_from_slice(&id.to_be_bytes());
    salt[4] = tag;
    salt
}
