use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanCreatedEvent {
    pub id: u32,
    pub borrower: Address,
    pub terms: Address,
    pub crowdloan: Address,
    pub debt_token: u32,
    pub repayment_manager: Address,
    pub router: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentsUpdatedEvent {
    pub version: u32,
}
