use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenCreatedEvent {
    pub owner: Address,
    pub token: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtIssuedEvent {
    pub token: u32,
    pub index: u32,
    pub holder: Address,
    pub amount: i128,
}
