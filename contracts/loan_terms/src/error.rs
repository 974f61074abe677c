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
    /// Principal token does not answer the token interface
    InvalidPrincipalToken = 10,
    /// Principal requested must be positive
    InvalidPrincipalAmount = 11,
    /// Loan period must be positive
    InvalidLoanPeriod = 12,
    /// Interest rate must be in [10, 10000) basis points
    InvalidInterestRate = 13,
    /// Term payment must not be negative
    InvalidTermPayment = 14,
    /// Grace period payment must not be negative
    InvalidGracePeriodPayment = 15,

    // ============================================
    // PERMISSION ERRORS (20-29)
    // ============================================
    /// Caller is not in the controller set
    Unauthorized = 20,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Requested status is not a forward edge from the current one
    InvalidStatusTransition = 30,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Arithmetic overflow
    Overflow = 51,
}
