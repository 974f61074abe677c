#![no_std]

mod error;
mod events;
mod storage;


pub use error::Error;
pub use storage::{DebtEntry, DebtToken};

use events::{DebtIssuedEvent, TokenCreatedEvent};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Symbol};

#[contract]
pub struct DebtRegistry;

#[contractimpl]
impl DebtRegistry {
    /// Register a new debt token owned by `creator`
    ///
    /// Returns the token handle. Handles start at 1.
    pub fn create_debt_token(
        env: Env,
        creator: Address,
        name: String,
        symbol: String,
    ) -> Result<u32, Error> {
        creator.require_auth();

        let counter: u32 = env
            .storage()
            .instance()
            .get(&DataKey::TokenCounter)
            .unwrap_or(0);
        let handle = counter.checked_add(1).ok_or(Error::Overflow)?;

        let token = DebtToken {
            owner: creator.clone(),
            name,
            symbol,
            entry_count: 0,
            total_debt: 0,
        };

        env.storage()
            .persistent()
            .set(&DataKey::Token(handle), &token);
        env.storage()
            .instance()
            .set(&DataKey::TokenCounter, &handle);

        env.events().publish(
            (Symbol::new(&env, "token_created"), creator.clone()),
            TokenCreatedEvent {
                owner: creator,
                token: handle,
            },
        );

        Ok(handle)
    }

    /// Record a debt of `amount` owed to `holder` (owner only)
    ///
    /// Returns the entry index. Indexes start at 0.
    ///
    /// # Errors
    /// - `TokenNotFound`: Unknown handle
    /// - `NotOwner`: Caller does not own the token
    /// - `InvalidAmount`: Amount <= 0
    pub fn issue(
        env: Env,
        token: u32,
        caller: Address,
        holder: Address,
        amount: i128,
    ) -> Result<u32, Error> {
        caller.require_auth();

        let mut debt_token = Self::at(env.clone(), token)?;
        if debt_token.owner != caller {
            return Err(Error::NotOwner);
        }

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let index = debt_token.entry_count;
        debt_token.entry_count = index.checked_add(1).ok_or(Error::Overflow)?;
        debt_token.total_debt = debt_token
            .total_debt
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        env.storage().persistent().set(
            &DataKey::Entry(token, index),
            &DebtEntry {
                holder: holder.clone(),
                amount,
            },
        );
        env.storage()
            .persistent()
            .set(&DataKey::Token(token), &debt_token);

        log!(&env, "debt issued", token, index, amount);

        env.events().publish(
            (Symbol::new(&env, "debt_issued"), token),
            DebtIssuedEvent {
                token,
                index,
                holder,
                amount,
            },
        );

        Ok(index)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn at(env: Env, token: u32) -> Result<DebtToken, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Token(token))
            .ok_or(Error::TokenNotFound)
    }

    pub fn name(env: Env, token: u32) -> Result<String, Error> {
        Ok(Self::at(env, token)?.name)
    }

    pub fn symbol(env: Env, token: u32) -> Result<String, Error> {
        Ok(Self::at(env, token)?.symbol)
    }

    pub fn owner(env: Env, token: u32) -> Result<Address, Error> {
        Ok(Self::at(env, token)?.owner)
    }

    pub fn get_entry(env: Env, token: u32, index: u32) -> Result<DebtEntry, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Entry(token, index))
            .ok_or(Error::EntryNotFound)
    }

    pub fn entry_count(env: Env, token: u32) -> Result<u32, Error> {
        Ok(Self::at(env, token)?.entry_count)
    }

    pub fn total_debt(env: Env, token: u32) -> Result<i128, Error> {
        Ok(Self::at(env, token)?.total_debt)
    }

    pub fn token_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::TokenCounter)
            .unwrap_or(0)
    }
}
