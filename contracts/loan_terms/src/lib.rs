#![no_std]

mod error;
mod events;
mod storage;
mod validation;


pub use error::Error;

use events::*;
use shared::{LoanParams, LoanStatus, LoanTerms};
use storage::DataKey;
use validation::{calculate_expected_repayment, is_allowed_transition, validate_params};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol, Vec};

#[contract]
pub struct LoanTermsContract;

#[contractimpl]
impl LoanTermsContract {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Store the loan parameters and the controller set
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidPrincipalToken`: Token does not answer `balance`
    /// - `InvalidPrincipalAmount` / `InvalidLoanPeriod` / `InvalidInterestRate`
    ///   / `InvalidTermPayment` / `InvalidGracePeriodPayment`: Bad parameter
    pub fn initialize(
        env: Env,
        deployer: Address,
        controllers: Vec<Address>,
        params: LoanParams,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        deployer.require_auth();

        validate_params(&params)?;

        let token_client = token::Client::new(&env, &params.principal_token);
        if !matches!(
            token_client.try_balance(&env.current_contract_address()),
            Ok(Ok(_))
        ) {
            return Err(Error::InvalidPrincipalToken);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Controllers, &controllers);
        env.storage().instance().set(&DataKey::Params, &params);
        env.storage()
            .instance()
            .set(&DataKey::Status, &LoanStatus::NotStarted);
        env.storage().instance().set(&DataKey::LoanStart, &0u64);
        env.storage().instance().set(&DataKey::LoanEnd, &0u64);

        env.events().publish(
            (Symbol::new(&env, "terms_initialized"), params.borrower.clone()),
            TermsInitializedEvent {
                borrower: params.borrower,
                principal_token: params.principal_token,
                principal_requested: params.principal_requested,
                interest_rate: params.interest_rate,
            },
        );

        Ok(())
    }

    // ============================================
    // STATE MACHINE
    // ============================================

    /// Advance the loan status along one forward edge
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Unauthorized`: Caller is not a controller
    /// - `InvalidStatusTransition`: Edge not allowed from the current status
    pub fn set_loan_status(env: Env, caller: Address, status: LoanStatus) -> Result<(), Error> {
        caller.require_auth();

        if !Self::is_controller(env.clone(), caller) {
            return Err(Error::Unauthorized);
        }

        let current = Self::get_loan_status(env.clone())?;
        if !is_allowed_transition(current, status) {
            return Err(Error::InvalidStatusTransition);
        }

        let now = env.ledger().timestamp();

        // Repayment clock starts when the principal leaves escrow
        if status == LoanStatus::RepaymentCycle {
            let params = Self::params(&env)?;
            let length = (params.loan_period as u64)
                .checked_mul(params.time_unit.seconds())
                .ok_or(Error::Overflow)?;
            let end = now.checked_add(length).ok_or(Error::Overflow)?;

            env.storage().instance().set(&DataKey::LoanStart, &now);
            env.storage().instance().set(&DataKey::LoanEnd, &end);
        }

        env.storage().instance().set(&DataKey::Status, &status);

        log!(&env, "loan status changed", current, status);

        env.events().publish(
            (Symbol::new(&env, "loan_status_changed"),),
            LoanStatusChangedEvent {
                from: current,
                to: status,
                timestamp: now,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Get the full terms snapshot
    pub fn get_loan_params(env: Env) -> Result<LoanTerms, Error> {
        Ok(LoanTerms {
            params: Self::params(&env)?,
            loan_status: Self::get_loan_status(env.clone())?,
            loan_start: env
                .storage()
                .instance()
                .get(&DataKey::LoanStart)
                .unwrap_or(0),
            loan_end: env
                .storage()
                .instance()
                .get(&DataKey::LoanEnd)
                .unwrap_or(0),
        })
    }

    /// Get the current loan status
    pub fn get_loan_status(env: Env) -> Result<LoanStatus, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Status)
            .ok_or(Error::NotInitialized)
    }

    /// Principal plus interest owed over the loan
    pub fn expected_repayment(env: Env) -> Result<i128, Error> {
        let params = Self::params(&env)?;
        calculate_expected_repayment(params.principal_requested, params.interest_rate)
            .ok_or(Error::Overflow)
    }

    pub fn get_controllers(env: Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::Controllers)
            .unwrap_or(Vec::new(&env))
    }

    pub fn is_controller(env: Env, address: Address) -> bool {
        Self::get_controllers(env).contains(&address)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn params(env: &Env) -> Result<LoanParams, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Params)
            .ok_or(Error::NotInitialized)
    }
}
