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
    /// Share amount must be positive
    InvalidAmount = 10,
    /// No amount set to pay
    NoAmountToPay = 11,

    // ============================================
    // PERMISSION ERRORS (20-29)
    // ============================================
    /// Caller is not in the controller set
    Unauthorized = 20,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Action only allowed before loan funding failed
    NotBeforeFundingFailed = 30,
    /// Action only allowed before loan funding is completed
    NotBeforeFundingCompleted = 31,
    /// Action only allowed while loan is Active
    LoanNotActive = 32,
    /// Account has zero shares
    ZeroShares = 33,

    // ============================================
    // BALANCE / TRANSFER ERRORS (40-49)
    // ============================================
    /// Decrease exceeds the holder's shares
    InsufficientShares = 40,
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
