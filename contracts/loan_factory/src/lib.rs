#![no_std]

mod error;
mod events;
mod storage;
mod validation;

#[cfg(test)]
mod test;

pub use error::Error;
pub use events::{ComponentsUpdatedEvent, LoanCreatedEvent};
pub use storage::{ComponentSet, LoanContracts};

use shared::LoanParams;
use storage::DataKey;
use validation::{salt_bytes, validate_request, TAG_CROWDLOAN, TAG_REPAYMENT, TAG_ROUTER, TAG_TERMS};

use soroban_sdk::{
    contract, contractimpl, log, vec, Address, BytesN, Env, IntoVal, String, Symbol, Vec,
};

const DEBT_TOKEN_NAME: &str = "Crowdloan Debt";
const DEBT_TOKEN_SYMBOL: &str = "CLD";

#[contract]
pub struct LoanFactory;

#[contractimpl]
impl LoanFactory {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address, debt_registry: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::DebtRegistry, &debt_registry);
        env.storage().instance().set(&DataKey::LoanCounter, &0u32);

        Ok(())
    }

    // ============================================
    // ADMIN FUNCTIONS
    // ============================================

    /// Replace the component set used by future deployments (admin only)
    ///
    /// Loans already deployed keep the code they were created with.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not the admin
    /// - `InvalidVersion`: Version does not increase
    pub fn set_components(env: Env, admin: Address, components: ComponentSet) -> Result<(), Error> {
        Self::require_admin(&env, &admin)?;

        if let Some(current) = Self::components(&env) {
            if components.version <= current.version {
                return Err(Error::InvalidVersion);
            }
        }

        env.storage()
            .instance()
            .set(&DataKey::Components, &components);

        env.events().publish(
            (Symbol::new(&env, "components_updated"),),
            ComponentsUpdatedEvent {
                version: components.version,
            },
        );

        Ok(())
    }

    // ============================================
    // DEPLOYMENT
    // ============================================

    /// Deploy and wire a full loan set for `params.borrower`
    ///
    /// Deploys terms, crowdloan and repayment manager (plus a payment
    /// router when configured), registers the loan's debt token with the
    /// borrower as owner, and initializes every component with the
    /// others' addresses. The crowdloan drives funding status and shares;
    /// the repayment manager closes the loan once it is repaid.
    ///
    /// # Errors
    /// - `NotInitialized`: Factory not initialized
    /// - `Invalid*`: Bad loan parameter or crowdfund length
    /// - `ComponentsNotSet`: No component set configured
    pub fn deploy(
        env: Env,
        params: LoanParams,
        crowdfund_start: u64,
        crowdfund_length: u64,
    ) -> Result<LoanContracts, Error> {
        let debt_registry = Self::get_debt_registry(env.clone())?;

        params.borrower.require_auth();

        validate_request(&params, crowdfund_length)?;
        let components = Self::components(&env).ok_or(Error::ComponentsNotSet)?;

        let id = Self::loan_count(env.clone())
            .checked_add(1)
            .ok_or(Error::Overflow)?;

        let terms = Self::deploy_component(&env, id, TAG_TERMS, &components.terms_wasm);
        let crowdloan = Self::deploy_component(&env, id, TAG_CROWDLOAN, &components.crowdloan_wasm);
        let repayment_manager =
            Self::deploy_component(&env, id, TAG_REPAYMENT, &components.repayment_wasm);
        let router = components
            .router_wasm
            .as_ref()
            .map(|hash| Self::deploy_component(&env, id, TAG_ROUTER, hash));

        let debt_token: u32 = env.invoke_contract(
            &debt_registry,
            &Symbol::new(&env, "create_debt_token"),
            vec![
                &env,
                params.borrower.to_val(),
                String::from_str(&env, DEBT_TOKEN_NAME).into_val(&env),
                String::from_str(&env, DEBT_TOKEN_SYMBOL).into_val(&env),
            ],
        );

        let factory = env.current_contract_address();
        let terms_controllers: Vec<Address> =
            vec![&env, crowdloan.clone(), repayment_manager.clone()];
        let share_controllers: Vec<Address> = vec![&env, crowdloan.clone()];

        // Terms first: the crowdloan reads them during its own initialize
        env.invoke_contract::<()>(
            &terms,
            &Symbol::new(&env, "initialize"),
            vec![
                &env,
                factory.to_val(),
                terms_controllers.into_val(&env),
                params.clone().into_val(&env),
            ],
        );
        env.invoke_contract::<()>(
            &repayment_manager,
            &Symbol::new(&env, "initialize"),
            vec![
                &env,
                factory.to_val(),
                terms.to_val(),
                params.principal_token.to_val(),
                share_controllers.into_val(&env),
            ],
        );
        env.invoke_contract::<()>(
            &crowdloan,
            &Symbol::new(&env, "initialize"),
            vec![
                &env,
                factory.to_val(),
                terms.to_val(),
                repayment_manager.to_val(),
                crowdfund_start.into_val(&env),
                crowdfund_length.into_val(&env),
            ],
        );
        if let Some(router) = &router {
            env.invoke_contract::<()>(
                router,
                &Symbol::new(&env, "initialize"),
                vec![
                    &env,
                    factory.to_val(),
                    params.principal_token.to_val(),
                    debt_registry.to_val(),
                    debt_token.into_val(&env),
                ],
            );
        }

        let loan = LoanContracts {
            id,
            version: components.version,
            borrower: params.borrower.clone(),
            terms,
            crowdloan,
            repayment_manager,
            debt_token,
            router,
        };

        env.storage().persistent().set(&DataKey::Loan(id), &loan);
        env.storage().instance().set(&DataKey::LoanCounter, &id);

        log!(&env, "loan deployed", id, components.version);

        env.events().publish(
            (Symbol::new(&env, "loan_created"), params.borrower),
            LoanCreatedEvent {
                id,
                borrower: loan.borrower.clone(),
                terms: loan.terms.clone(),
                crowdloan: loan.crowdloan.clone(),
                debt_token: loan.debt_token,
                repayment_manager: loan.repayment_manager.clone(),
                router: loan.router.clone(),
            },
        );

        Ok(loan)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_loan(env: Env, id: u32) -> Result<LoanContracts, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Loan(id))
            .ok_or(Error::LoanNotFound)
    }

    pub fn loan_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::LoanCounter)
            .unwrap_or(0)
    }

    pub fn get_components(env: Env) -> Result<ComponentSet, Error> {
        Self::components(&env).ok_or(Error::ComponentsNotSet)
    }

    pub fn get_debt_registry(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::DebtRegistry)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_admin(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_admin(env: &Env, caller: &Address) -> Result<(), Error> {
        let admin = Self::get_admin(env.clone())?;
        caller.require_auth();
        if *caller != admin {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn components(env: &Env) -> Option<ComponentSet> {
        env.storage().instance().get(&DataKey::Components)
    }

    fn deploy_component(env: &Env, id: u32, tag: u8, wasm_hash: &BytesN<32>) -> Address {
        let salt = BytesN::from_array(env, &salt_bytes(id, tag));
        env.deployer()
            .with_current_contract(salt)
            .deploy_v2(wasm_hash.clone(), ())
    }
}
