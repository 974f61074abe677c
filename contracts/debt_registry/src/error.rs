use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // VALIDATION ERRORS (10-19)
    // ============================================
    /// Debt amount must be positive
    InvalidAmount = 10,

    // ============================================
    // PERMISSION ERRORS (20-29)
    // ============================================
    /// Caller does not own the debt token
    NotOwner = 20,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// No debt token under this handle
    TokenNotFound = 30,
    /// No entry at this index
    EntryNotFound = 31,

    // ============================================
    // OPERATIONAL ERRORS (50-59)
    // ============================================
    /// Arithmetic overflow
    Overflow = 51,
}
