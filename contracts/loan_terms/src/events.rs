use shared::LoanStatus;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct TermsInitializedEvent {
    pub borrower: Address,
    pub principal_token: Address,
    pub principal_requested: i128,
    pub interest_rate: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct LoanStatusChangedEvent {
    pub from: LoanStatus,
    pub to: LoanStatus,
    pub timestamp: u64,
}
