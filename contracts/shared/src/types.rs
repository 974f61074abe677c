use soroban_sdk::{contracttype, Address};

// Constants
pub const BASIS_POINTS: i128 = 10_000; // 100% = 10,000 basis points
pub const MIN_INTEREST_RATE: u32 = 10; // 0.1%
pub const MAX_INTEREST_RATE: u32 = 10_000; // exclusive
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Loan lifecycle. Discriminant order is the order the gates compare against.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum LoanStatus {
    /// Terms written, crowdfund not opened yet
    NotStarted = 0,
    /// Crowdfund window is open
    FundingStarted = 1,
    /// Deadline passed below goal (terminal)
    FundingFailed = 2,
    /// Goal reached, principal escrowed for the borrower
    FundingComplete = 3,
    /// Principal withdrawn, repayments flowing
    RepaymentCycle = 4,
    /// Loan closed (terminal)
    RepaymentComplete = 5,
}

impl LoanStatus {
    /// Statuses in which repayments are accepted and released.
    pub fn is_active(&self) -> bool {
        matches!(self, LoanStatus::FundingComplete | LoanStatus::RepaymentCycle)
    }

    /// Funding succeeded at some point: active or fully repaid.
    pub fn is_funded(&self) -> bool {
        self.is_active() || *self == LoanStatus::RepaymentComplete
    }
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeUnit {
    Days = 0,
    Months = 1,
    Years = 2,
}

impl TimeUnit {
    /// Length of one unit in seconds (30-day months, 365-day years).
    pub fn seconds(&self) -> u64 {
        match self {
            TimeUnit::Days => SECONDS_PER_DAY,
            TimeUnit::Months => 30 * SECONDS_PER_DAY,
            TimeUnit::Years => 365 * SECONDS_PER_DAY,
        }
    }
}

/// Immutable loan parameters, validated by the terms contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanParams {
    /// Party requesting the loan
    pub borrower: Address,
    /// Settlement token
    pub principal_token: Address,
    /// Requested principal in the token's smallest unit
    pub principal_requested: i128,
    pub time_unit: TimeUnit,
    /// Number of `time_unit`s the loan runs for
    pub loan_period: u32,
    /// Per-term repayment amount
    pub term_payment: i128,
    /// Grace period, in `time_unit`s
    pub grace_period_length: u32,
    /// Payment due during the grace period
    pub grace_period_payment: i128,
    /// Basis points, in [10, 10000)
    pub interest_rate: u32,
}

/// Terms snapshot: parameters plus the mutable lifecycle fields.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanTerms {
    pub params: LoanParams,
    pub loan_status: LoanStatus,
    /// 0 until the repayment cycle begins
    pub loan_start: u64,
    /// 0 until the repayment cycle begins
    pub loan_end: u64,
}
