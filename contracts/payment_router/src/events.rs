use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentReceivedEvent {
    pub from: Address,
    pub amount: i128,
    pub total_repaid: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaymentReleasedEvent {
    pub index: u32,
    pub to: Address,
    pub amount: i128,
}
