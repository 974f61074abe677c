use soroban_sdk::contracttype;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Controllers, // Vec<Address>, fixed at initialize
    Params,
    Status,
    LoanStart,
    LoanEnd,
}
