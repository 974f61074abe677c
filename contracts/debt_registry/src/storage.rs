use soroban_sdk::{contracttype, Address, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtToken {
    pub owner: Address,
    pub name: String,
    pub symbol: String,
    /// Number of debt entries issued under this token
    pub entry_count: u32,
    /// Sum of all entry amounts
    pub total_debt: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtEntry {
    pub holder: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    TokenCounter,
    Token(u32),
    Entry(u32, u32), // (token, index)
}
