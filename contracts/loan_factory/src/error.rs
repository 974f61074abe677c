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
    /// No component set has been configured
    ComponentsNotSet = 3,

    // ============================================
    // VALIDATION ERRORS (10-19)
    // ============================================
    InvalidPrincipalAmount = 11,
    InvalidLoanPeriod = 12,
    InvalidInterestRate = 13,
    InvalidTermPayment = 14,
    InvalidGracePeriodPayment = 15,
    InvalidCrowdfundLength = 16,
    /// Component version must increase
    InvalidVersion = 17,

    // ============================================
    // PERMISSION ERRORS (20-29)
    // ============================================
    /// Caller is not the factory admin
    Unauthorized = 20,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// No loan recorded under this id
    LoanNotFound = 30,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    Overflow = 51,
}
