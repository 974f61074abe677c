use soroban_sdk::{contracttype, Address, BytesN};

/// Wasm hashes of one implementation generation
///
/// Every loan is deployed from the set current at `deploy` time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComponentSet {
    pub version: u32,
    pub terms_wasm: BytesN<32>,
    pub crowdloan_wasm: BytesN<32>,
    pub repayment_wasm: BytesN<32>,
    /// Routers are only deployed when a hash is configured
    pub router_wasm: Option<BytesN<32>>,
}

/// Addresses of one deployed loan
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanContracts {
    pub id: u32,
    pub version: u32,
    pub borrower: Address,
    pub terms: Address,
    pub crowdloan: Address,
    pub repayment_manager: Address,
    /// Handle inside the debt registry
    pub debt_token: u32,
    pub router: Option<Address>,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Admin,
    DebtRegistry,
    Components,
    LoanCounter,
    Loan(u32), // id → LoanContracts
}
