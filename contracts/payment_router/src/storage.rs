use soroban_sdk::{contracttype, Address};

/// Routing configuration, fixed at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouterConfig {
    pub token: Address,
    pub debt_registry: Address,
    /// Debt token handle inside the registry
    pub debt_token: u32,
}

/// Debt entry as returned by the registry's `get_entry`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtEntry {
    pub holder: Address,
    pub amount: i128,
}

/// Repayments received while the registry's debt stood at one level
///
/// Only entries with index below `entry_count` share in `repaid`, weighted
/// against `total_debt`. A new epoch opens whenever the debt changes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Epoch {
    pub entry_count: u32,
    pub total_debt: i128,
    pub repaid: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Config,
    TotalRepaid,
    TotalWithdrawn,
    Epochs,         // Vec<Epoch>, oldest first
    Withdrawn(u32), // entry index → cumulative amount paid out
}
