use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // VALIDATION ERRORS (10-19)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 10,
    /// Crowdfund length must be positive
    InvalidCrowdfundLength = 11,

    // ============================================
    // PERMISSION ERRORS (20-29)
    // ============================================
    /// Caller is not the borrower
    Unauthorized = 20,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Crowdfund already started
    AlreadyStarted = 30,
    /// Loan is not in FundingStarted
    FundingNotOpen = 31,
    /// Crowdfund window has not opened yet
    CrowdfundNotStarted = 32,
    /// Crowdfund deadline has not passed
    DeadlineNotPassed = 33,
    /// Loan is not in FundingFailed
    FundingNotFailed = 34,
    /// Loan is not in FundingComplete
    FundingNotComplete = 35,

    // ============================================
    // BALANCE / TRANSFER ERRORS (40-49)
    // ============================================
    /// Withdrawal exceeds the remaining escrow
    InsufficientEscrow = 40,
    /// Settlement token transfer failed
    TransferFailed = 41,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Nested call while an operation is in flight
    Reentrant = 50,
    /// Arithmetic overflow
    Overflow = 51,
}
