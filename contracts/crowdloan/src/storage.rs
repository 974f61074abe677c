use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Crowdfund {
    /// Terms contract holding the loan status
    pub terms: Address,
    /// Distribution ledger credited with lender shares
    pub repayment_manager: Address,
    pub borrower: Address,
    /// Settlement token
    pub token: Address,
    /// Funding goal
    pub principal_requested: i128,
    /// Window opens at `start` (0 until the crowdfund is started, if unset)
    pub start: u64,
    /// Window length in seconds; closes at `start + length`
    pub length: u64,
    /// Sum of all contributions accepted
    pub total_contributed: i128,
    /// Principal the borrower has taken out of escrow
    pub total_withdrawn: i128,
    /// Contributions returned after a failed crowdfund
    pub total_refunded: i128,
}

impl Crowdfund {
    pub fn deadline(&self) -> u64 {
        self.start.saturating_add(self.length)
    }

    pub fn remaining_escrow(&self) -> i128 {
        self.total_contributed - self.total_withdrawn - self.total_refunded
    }
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Crowdfund,
    Contribution(Address), // contributor → cumulative amount
}
