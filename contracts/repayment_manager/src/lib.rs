#![no_std]

mod error;
mod events;
mod storage;


pub use error::Error;
pub use storage::Totals;

use events::*;
use shared::{guard, math, LoanStatus};
use storage::DataKey;

use soroban_sdk::{
    contract, contractimpl, log, token, vec, Address, Env, IntoVal, Symbol, Vec,
};

#[contract]
pub struct RepaymentManager;

#[contractimpl]
impl RepaymentManager {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Wire the ledger to its terms contract and settlement token
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        deployer: Address,
        terms: Address,
        token: Address,
        controllers: Vec<Address>,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        deployer.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Terms, &terms);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage()
            .instance()
            .set(&DataKey::Controllers, &controllers);
        env.storage()
            .instance()
            .set(&DataKey::Totals, &Totals::default());

        Ok(())
    }

    // ============================================
    // SHARE MANAGEMENT (FUNDING PHASE)
    // ============================================

    /// Credit `amount` shares to `holder`
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not a controller
    /// - `NotBeforeFundingFailed`: Loan funding already resolved
    /// - `InvalidAmount`: Amount <= 0
    pub fn increase_shares(
        env: Env,
        caller: Address,
        holder: Address,
        amount: i128,
    ) -> Result<(), Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            caller.require_auth();
            Self::require_controller(&env, &caller)?;

            if Self::loan_status(&env)? >= LoanStatus::FundingFailed {
                return Err(Error::NotBeforeFundingFailed);
            }

            if amount <= 0 {
                return Err(Error::InvalidAmount);
            }

            let current = Self::shares(env.clone(), holder.clone());
            let mut totals = Self::totals(&env)?;

            totals.total_shares = totals
                .total_shares
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            let updated = current.checked_add(amount).ok_or(Error::Overflow)?;

            env.storage()
                .persistent()
                .set(&DataKey::Shares(holder.clone()), &updated);
            env.storage().instance().set(&DataKey::Totals, &totals);

            if current == 0 {
                Self::add_payee(&env, &holder);
            }

            env.events().publish(
                (Symbol::new(&env, "share_increased"), holder.clone()),
                ShareIncreasedEvent {
                    account: holder,
                    shares_added: amount,
                },
            );

            Ok(())
        })
    }

    /// Remove `amount` shares from `holder`
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not a controller
    /// - `ZeroShares`: Holder has no shares
    /// - `NotBeforeFundingCompleted`: Loan funding already completed
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientShares`: Amount exceeds the holder's shares
    pub fn decrease_shares(
        env: Env,
        caller: Address,
        holder: Address,
        amount: i128,
    ) -> Result<(), Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            caller.require_auth();
            Self::require_controller(&env, &caller)?;

            let current = Self::shares(env.clone(), holder.clone());
            if current == 0 {
                return Err(Error::ZeroShares);
            }

            if Self::loan_status(&env)? >= LoanStatus::FundingComplete {
                return Err(Error::NotBeforeFundingCompleted);
            }

            if amount <= 0 {
                return Err(Error::InvalidAmount);
            }
            if amount > current {
                return Err(Error::InsufficientShares);
            }

            let mut totals = Self::totals(&env)?;
            totals.total_shares = totals
                .total_shares
                .checked_sub(amount)
                .ok_or(Error::Overflow)?;

            // Holder stays known with a zero balance
            env.storage()
                .persistent()
                .set(&DataKey::Shares(holder.clone()), &(current - amount));
            env.storage().instance().set(&DataKey::Totals, &totals);

            env.events().publish(
                (Symbol::new(&env, "share_decreased"), holder.clone()),
                ShareDecreasedEvent {
                    account: holder,
                    shares_removed: amount,
                },
            );

            Ok(())
        })
    }

    // ============================================
    // REPAYMENT PHASE
    // ============================================

    /// Accept a repayment of `amount` from `payer`
    ///
    /// The payer must have approved this contract for `amount`. Once the
    /// loan is in its repayment cycle and the total received covers the
    /// terms' expected repayment, the loan is marked complete.
    ///
    /// # Errors
    /// - `NoAmountToPay`: Amount <= 0
    /// - `LoanNotActive`: Loan not in FundingComplete or RepaymentCycle
    /// - `TransferFailed`: Balance or allowance too low
    pub fn pay(env: Env, payer: Address, amount: i128) -> Result<(), Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            if amount <= 0 {
                return Err(Error::NoAmountToPay);
            }

            let status = Self::loan_status(&env)?;
            if !status.is_active() {
                return Err(Error::LoanNotActive);
            }

            payer.require_auth();

            let mut totals = Self::totals(&env)?;
            totals.total_received = totals
                .total_received
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            env.storage().instance().set(&DataKey::Totals, &totals);

            if status == LoanStatus::RepaymentCycle
                && totals.total_received >= Self::expected_repayment(&env)?
            {
                log!(&env, "loan repaid", totals.total_received);
                Self::set_loan_status(&env, LoanStatus::RepaymentComplete)?;
            }

            let token_client = token::Client::new(&env, &Self::token(&env)?);
            let contract = env.current_contract_address();
            if !matches!(
                token_client.try_transfer_from(&contract, &payer, &contract, &amount),
                Ok(Ok(()))
            ) {
                return Err(Error::TransferFailed);
            }

            log!(&env, "payment received", amount, totals.total_received);

            env.events().publish(
                (Symbol::new(&env, "payment_received"), payer.clone()),
                PaymentReceivedEvent {
                    from: payer,
                    amount,
                },
            );

            Ok(())
        })
    }

    /// Pay `holder` everything owed to date. Anyone may call this.
    ///
    /// Stays open after the loan is repaid so holders can collect the
    /// final payments. Returns the amount transferred; 0 when nothing is owed.
    ///
    /// # Errors
    /// - `LoanNotActive`: Loan never reached FundingComplete
    /// - `ZeroShares`: Holder has no shares
    /// - `TransferFailed`: Escrow transfer failed
    pub fn release(env: Env, holder: Address) -> Result<i128, Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            if !Self::loan_status(&env)?.is_funded() {
                return Err(Error::LoanNotActive);
            }

            let payment = Self::release_allowance(env.clone(), holder.clone())?;
            if payment == 0 {
                return Ok(0);
            }

            let released = Self::released(env.clone(), holder.clone())
                .checked_add(payment)
                .ok_or(Error::Overflow)?;
            let mut totals = Self::totals(&env)?;
            totals.total_released = totals
                .total_released
                .checked_add(payment)
                .ok_or(Error::Overflow)?;

            env.storage()
                .persistent()
                .set(&DataKey::Released(holder.clone()), &released);
            env.storage().instance().set(&DataKey::Totals, &totals);

            let token_client = token::Client::new(&env, &Self::token(&env)?);
            if !matches!(
                token_client.try_transfer(&env.current_contract_address(), &holder, &payment),
                Ok(Ok(()))
            ) {
                return Err(Error::TransferFailed);
            }

            log!(&env, "payment released", holder, payment);

            env.events().publish(
                (Symbol::new(&env, "payment_released"), holder.clone()),
                PaymentReleasedEvent {
                    to: holder,
                    amount: payment,
                },
            );

            Ok(payment)
        })
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Amount `holder` could release right now
    ///
    /// # Errors
    /// - `ZeroShares`: Holder has no shares
    pub fn release_allowance(env: Env, holder: Address) -> Result<i128, Error> {
        let shares = Self::shares(env.clone(), holder.clone());
        if shares == 0 {
            return Err(Error::ZeroShares);
        }

        let totals = Self::totals(&env)?;
        math::pending(
            totals.total_received,
            shares,
            totals.total_shares,
            Self::released(env, holder),
        )
        .ok_or(Error::Overflow)
    }

    pub fn shares(env: Env, holder: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Shares(holder))
            .unwrap_or(0)
    }

    pub fn released(env: Env, holder: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Released(holder))
            .unwrap_or(0)
    }

    pub fn get_totals(env: Env) -> Result<Totals, Error> {
        Self::totals(&env)
    }

    pub fn total_shares(env: Env) -> Result<i128, Error> {
        Ok(Self::totals(&env)?.total_shares)
    }

    pub fn total_released(env: Env) -> Result<i128, Error> {
        Ok(Self::totals(&env)?.total_released)
    }

    pub fn total_received(env: Env) -> Result<i128, Error> {
        Ok(Self::totals(&env)?.total_received)
    }

    /// Every holder ever credited, in first-seen order
    pub fn payees(env: Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Payees)
            .unwrap_or(Vec::new(&env))
    }

    pub fn is_controller(env: Env, address: Address) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, Vec<Address>>(&DataKey::Controllers)
            .map(|controllers| controllers.contains(&address))
            .unwrap_or(false)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn require_controller(env: &Env, caller: &Address) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }
        if !Self::is_controller(env.clone(), caller.clone()) {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    fn loan_status(env: &Env) -> Result<LoanStatus, Error> {
        Ok(env.invoke_contract(
            &Self::terms(env)?,
            &Symbol::new(env, "get_loan_status"),
            vec![env],
        ))
    }

    fn expected_repayment(env: &Env) -> Result<i128, Error> {
        Ok(env.invoke_contract(
            &Self::terms(env)?,
            &Symbol::new(env, "expected_repayment"),
            vec![env],
        ))
    }

    fn set_loan_status(env: &Env, status: LoanStatus) -> Result<(), Error> {
        env.invoke_contract::<()>(
            &Self::terms(env)?,
            &Symbol::new(env, "set_loan_status"),
            vec![
                env,
                env.current_contract_address().to_val(),
                status.into_val(env),
            ],
        );
        Ok(())
    }

    fn terms(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Terms)
            .ok_or(Error::NotInitialized)
    }

    fn token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    fn totals(env: &Env) -> Result<Totals, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Totals)
            .ok_or(Error::NotInitialized)
    }

    /// Record `holder` the first time it is credited.
    fn add_payee(env: &Env, holder: &Address) {
        let mut payees = Self::payees(env.clone());
        if payees.contains(holder) {
            return;
        }

        payees.push_back(holder.clone());
        env.storage().persistent().set(&DataKey::Payees, &payees);

        env.events().publish(
            (Symbol::new(env, "payee_added"), holder.clone()),
            PayeeAddedEvent {
                account: holder.clone(),
            },
        );
    }
}
