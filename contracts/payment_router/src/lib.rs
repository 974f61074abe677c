#![no_std]

mod error;
mod events;
mod storage;


pub use error::Error;
pub use storage::{DebtEntry, Epoch, RouterConfig};

use events::*;
use shared::{guard, math};
use storage::DataKey;

use soroban_sdk::{
    contract, contractimpl, log, token, vec, Address, Env, IntoVal, Symbol, TryFromVal, Val, Vec,
};

/// Routes repayments to debt-entry holders in proportion to their debt
///
/// Weights come from one debt token in the debt registry. Each repayment
/// is shared only by the entries that existed when it arrived, so debt
/// issued later never claims funds already paid out. There is no
/// loan-status gate.
#[contract]
pub struct PaymentRouter;

#[contractimpl]
impl PaymentRouter {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        deployer: Address,
        token: Address,
        debt_registry: Address,
        debt_token: u32,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        deployer.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(
            &DataKey::Config,
            &RouterConfig {
                token,
                debt_registry,
                debt_token,
            },
        );
        env.storage().instance().set(&DataKey::TotalRepaid, &0i128);
        env.storage().instance().set(&DataKey::TotalWithdrawn, &0i128);

        Ok(())
    }

    // ============================================
    // REPAY / WITHDRAW
    // ============================================

    /// Pull `amount` from `payer` into the router
    ///
    /// The repayment is credited to the entries issued so far.
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount <= 0
    /// - `NoDebt`: No debt entries to route to
    /// - `TransferFailed`: Balance or allowance too low
    pub fn repay(env: Env, payer: Address, amount: i128) -> Result<(), Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            if amount <= 0 {
                return Err(Error::InvalidAmount);
            }

            let config = Self::get_config(env.clone())?;
            payer.require_auth();

            let total_debt: i128 = Self::query(&env, &config, "total_debt");
            if total_debt <= 0 {
                return Err(Error::NoDebt);
            }
            let entry_count: u32 = Self::query(&env, &config, "entry_count");

            let mut epochs = Self::epochs(env.clone());
            let current = epochs
                .last()
                .filter(|epoch| epoch.entry_count == entry_count);
            match current {
                Some(mut epoch) => {
                    epoch.repaid = epoch.repaid.checked_add(amount).ok_or(Error::Overflow)?;
                    epochs.set(epochs.len() - 1, epoch);
                }
                None => epochs.push_back(Epoch {
                    entry_count,
                    total_debt,
                    repaid: amount,
                }),
            }

            let total_repaid = Self::total_repaid(env.clone())
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            env.storage().persistent().set(&DataKey::Epochs, &epochs);
            env.storage()
                .instance()
                .set(&DataKey::TotalRepaid, &total_repaid);

            let token_client = token::Client::new(&env, &config.token);
            let contract = env.current_contract_address();
            if !matches!(
                token_client.try_transfer_from(&contract, &payer, &contract, &amount),
                Ok(Ok(()))
            ) {
                return Err(Error::TransferFailed);
            }

            log!(&env, "repayment routed", amount, total_repaid);

            env.events().publish(
                (Symbol::new(&env, "payment_received"), payer.clone()),
                PaymentReceivedEvent {
                    from: payer,
                    amount,
                    total_repaid,
                },
            );

            Ok(())
        })
    }

    /// Pay the holder of debt entry `index` its share of repayments so far
    ///
    /// Anyone may trigger this; funds always go to the entry's holder.
    /// Returns the amount transferred, 0 when nothing is owed.
    ///
    /// # Errors
    /// - `TransferFailed`: Router balance too low
    pub fn withdraw(env: Env, index: u32) -> Result<i128, Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            let config = Self::get_config(env.clone())?;
            let entry = Self::entry(&env, &config, index);
            let payment = Self::entitlement(&env, &entry, index)?;
            if payment == 0 {
                return Ok(0);
            }

            let withdrawn = Self::withdrawn(env.clone(), index)
                .checked_add(payment)
                .ok_or(Error::Overflow)?;
            let total_withdrawn = Self::total_withdrawn(env.clone())
                .checked_add(payment)
                .ok_or(Error::Overflow)?;

            env.storage()
                .persistent()
                .set(&DataKey::Withdrawn(index), &withdrawn);
            env.storage()
                .instance()
                .set(&DataKey::TotalWithdrawn, &total_withdrawn);

            let token_client = token::Client::new(&env, &config.token);
            if !matches!(
                token_client.try_transfer(&env.current_contract_address(), &entry.holder, &payment),
                Ok(Ok(()))
            ) {
                return Err(Error::TransferFailed);
            }

            env.events().publish(
                (Symbol::new(&env, "payment_released"), index),
                PaymentReleasedEvent {
                    index,
                    to: entry.holder,
                    amount: payment,
                },
            );

            Ok(payment)
        })
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_config(env: Env) -> Result<RouterConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    pub fn total_repaid(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalRepaid)
            .unwrap_or(0)
    }

    pub fn total_withdrawn(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalWithdrawn)
            .unwrap_or(0)
    }

    pub fn withdrawn(env: Env, index: u32) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Withdrawn(index))
            .unwrap_or(0)
    }

    /// Amount entry `index` could withdraw right now
    pub fn withdrawable(env: Env, index: u32) -> Result<i128, Error> {
        let config = Self::get_config(env.clone())?;
        let entry = Self::entry(&env, &config, index);
        Self::entitlement(&env, &entry, index)
    }

    /// Repayment epochs, oldest first
    pub fn epochs(env: Env) -> Vec<Epoch> {
        env.storage()
            .persistent()
            .get(&DataKey::Epochs)
            .unwrap_or(Vec::new(&env))
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn entry(env: &Env, config: &RouterConfig, index: u32) -> DebtEntry {
        env.invoke_contract(
            &config.debt_registry,
            &Symbol::new(env, "get_entry"),
            vec![env, config.debt_token.into_val(env), index.into_val(env)],
        )
    }

    fn query<T>(env: &Env, config: &RouterConfig, func: &str) -> T
    where
        T: TryFromVal<Env, Val>,
    {
        env.invoke_contract(
            &config.debt_registry,
            &Symbol::new(env, func),
            vec![env, config.debt_token.into_val(env)],
        )
    }

    /// Entry's share of every epoch it took part in, less what it already took.
    fn entitlement(env: &Env, entry: &DebtEntry, index: u32) -> Result<i128, Error> {
        let mut earned = 0i128;
        for epoch in Self::epochs(env.clone()).iter() {
            if index >= epoch.entry_count {
                continue;
            }
            let slice = math::pro_rata(epoch.repaid, entry.amount, epoch.total_debt)
                .ok_or(Error::Overflow)?;
            earned = earned.checked_add(slice).ok_or(Error::Overflow)?;
        }

        Ok((earned - Self::withdrawn(env.clone(), index)).max(0))
    }
}
