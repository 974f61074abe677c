use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct CrowdfundStartedEvent {
    pub start: u64,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct FundedEvent {
    pub contributor: Address,
    pub amount: i128,
    pub total_contributed: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RefundedEvent {
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawnEvent {
    pub borrower: Address,
    pub amount: i128,
    pub remaining: i128,
}
