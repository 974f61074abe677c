use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // ============================================
    // VALIDATION ERRORS (10-19)
    // ============================================
    /// Repayment amount must be positive
    InvalidAmount = 10,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Debt token has no entries to route to
    NoDebt = 30,

    // ============================================
    // BALANCE / TRANSFER ERRORS (40-49)
    // ============================================
    TransferFailed = 41,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    Reentrant = 50,
    Overflow = 51,
}
