use soroban_sdk::{contracttype, Address};

/// Aggregate share-ledger totals
///
/// Invariants:
/// - total_shares == Σ shares
/// - total_released == Σ released
/// - total_released <= total_received
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Totals {
    pub total_shares: i128,
    pub total_released: i128,
    pub total_received: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Terms,
    Token,
    Controllers,
    Totals,
    Payees,            // Vec<Address> in first-seen order
    Shares(Address),   // holder → share balance
    Released(Address), // holder → cumulative amount released
}
