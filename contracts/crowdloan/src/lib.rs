#![no_std]

mod error;
mod events;
mod storage;

#[cfg(test)]
mod test;

pub use error::Error;
pub use storage::Crowdfund;

use events::*;
use shared::{guard, LoanStatus, LoanTerms};
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, log, token, vec, Address, Env, IntoVal, Symbol};

#[contract]
pub struct Crowdloan;

#[contractimpl]
impl Crowdloan {
    // ============================================
    // INITIALIZATION
    // ============================================

    /// Wire the crowdfund to its terms and distribution ledger
    ///
    /// Borrower, token and goal are read once from the terms contract.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidCrowdfundLength`: Length must be positive
    pub fn initialize(
        env: Env,
        deployer: Address,
        terms: Address,
        repayment_manager: Address,
        crowdfund_start: u64,
        crowdfund_length: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        deployer.require_auth();

        if crowdfund_length == 0 {
            return Err(Error::InvalidCrowdfundLength);
        }

        let loan_terms: LoanTerms = env.invoke_contract(
            &terms,
            &Symbol::new(&env, "get_loan_params"),
            vec![&env],
        );

        let crowdfund = Crowdfund {
            terms,
            repayment_manager,
            borrower: loan_terms.params.borrower,
            token: loan_terms.params.principal_token,
            principal_requested: loan_terms.params.principal_requested,
            start: crowdfund_start,
            length: crowdfund_length,
            total_contributed: 0,
            total_withdrawn: 0,
            total_refunded: 0,
        };

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Crowdfund, &crowdfund);

        Ok(())
    }

    // ============================================
    // FUNDING WINDOW
    // ============================================

    /// Open the crowdfund (borrower only)
    ///
    /// A zero configured start means the window opens now.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not the borrower
    /// - `AlreadyStarted`: Loan already left NotStarted
    pub fn start_crowdfund(env: Env, borrower: Address) -> Result<(), Error> {
        let mut crowdfund = Self::get_crowdfund(env.clone())?;

        borrower.require_auth();
        if borrower != crowdfund.borrower {
            return Err(Error::Unauthorized);
        }

        if Self::loan_status(&env, &crowdfund) != LoanStatus::NotStarted {
            return Err(Error::AlreadyStarted);
        }

        if crowdfund.start == 0 {
            crowdfund.start = env.ledger().timestamp();
            env.storage().instance().set(&DataKey::Crowdfund, &crowdfund);
        }

        Self::set_loan_status(&env, &crowdfund, LoanStatus::FundingStarted);

        env.events().publish(
            (Symbol::new(&env, "crowdfund_started"),),
            CrowdfundStartedEvent {
                start: crowdfund.start,
                deadline: crowdfund.deadline(),
            },
        );

        Ok(())
    }

    /// Contribute `amount` toward the funding goal
    ///
    /// The contributor must have approved this contract for `amount`.
    /// Reaching the goal completes funding in the same call. Once the
    /// deadline has passed the call records the failure, accepts nothing
    /// and returns `FundingFailed`.
    ///
    /// Returns the loan status after the call.
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount <= 0
    /// - `FundingNotOpen`: Loan not in FundingStarted
    /// - `CrowdfundNotStarted`: Window not open yet
    /// - `TransferFailed`: Balance or allowance too low
    pub fn fund(env: Env, contributor: Address, amount: i128) -> Result<LoanStatus, Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            if amount <= 0 {
                return Err(Error::InvalidAmount);
            }

            let mut crowdfund = Self::get_crowdfund(env.clone())?;
            if Self::loan_status(&env, &crowdfund) != LoanStatus::FundingStarted {
                return Err(Error::FundingNotOpen);
            }

            let now = env.ledger().timestamp();
            if now < crowdfund.start {
                return Err(Error::CrowdfundNotStarted);
            }
            if now >= crowdfund.deadline() {
                log!(&env, "crowdfund deadline passed", crowdfund.total_contributed);
                Self::set_loan_status(&env, &crowdfund, LoanStatus::FundingFailed);
                return Ok(LoanStatus::FundingFailed);
            }

            contributor.require_auth();

            let contribution = Self::get_contribution(env.clone(), contributor.clone())
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            crowdfund.total_contributed = crowdfund
                .total_contributed
                .checked_add(amount)
                .ok_or(Error::Overflow)?;

            env.storage()
                .persistent()
                .set(&DataKey::Contribution(contributor.clone()), &contribution);
            env.storage().instance().set(&DataKey::Crowdfund, &crowdfund);

            // Shares must be credited before the status freezes them
            let contract = env.current_contract_address();
            env.invoke_contract::<()>(
                &crowdfund.repayment_manager,
                &Symbol::new(&env, "increase_shares"),
                vec![
                    &env,
                    contract.to_val(),
                    contributor.to_val(),
                    amount.into_val(&env),
                ],
            );

            let mut status = LoanStatus::FundingStarted;
            if crowdfund.total_contributed >= crowdfund.principal_requested {
                log!(&env, "funding goal reached", crowdfund.total_contributed);
                Self::set_loan_status(&env, &crowdfund, LoanStatus::FundingComplete);
                status = LoanStatus::FundingComplete;
            }

            let token_client = token::Client::new(&env, &crowdfund.token);
            if !matches!(
                token_client.try_transfer_from(&contract, &contributor, &contract, &amount),
                Ok(Ok(()))
            ) {
                return Err(Error::TransferFailed);
            }

            env.events().publish(
                (Symbol::new(&env, "funded"), contributor.clone()),
                FundedEvent {
                    contributor,
                    amount,
                    total_contributed: crowdfund.total_contributed,
                },
            );

            Ok(status)
        })
    }

    /// Mark the crowdfund failed once its deadline has passed below goal
    ///
    /// Anyone may call this.
    ///
    /// # Errors
    /// - `FundingNotOpen`: Loan not in FundingStarted
    /// - `DeadlineNotPassed`: Window still open
    pub fn close_funding(env: Env) -> Result<LoanStatus, Error> {
        let crowdfund = Self::get_crowdfund(env.clone())?;
        if Self::loan_status(&env, &crowdfund) != LoanStatus::FundingStarted {
            return Err(Error::FundingNotOpen);
        }
        if env.ledger().timestamp() < crowdfund.deadline() {
            return Err(Error::DeadlineNotPassed);
        }

        Self::set_loan_status(&env, &crowdfund, LoanStatus::FundingFailed);
        Ok(LoanStatus::FundingFailed)
    }

    /// Return a contributor's full contribution after a failed crowdfund
    ///
    /// Pays out once; later calls return 0. Anyone may call this on the
    /// contributor's behalf.
    ///
    /// # Errors
    /// - `FundingNotFailed`: Loan not in FundingFailed
    /// - `TransferFailed`: Escrow transfer failed
    pub fn refund(env: Env, contributor: Address) -> Result<i128, Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            let mut crowdfund = Self::get_crowdfund(env.clone())?;

            let mut status = Self::loan_status(&env, &crowdfund);
            if status == LoanStatus::FundingStarted
                && env.ledger().timestamp() >= crowdfund.deadline()
            {
                Self::set_loan_status(&env, &crowdfund, LoanStatus::FundingFailed);
                status = LoanStatus::FundingFailed;
            }
            if status != LoanStatus::FundingFailed {
                return Err(Error::FundingNotFailed);
            }

            let amount = Self::get_contribution(env.clone(), contributor.clone());
            if amount == 0 {
                return Ok(0);
            }

            crowdfund.total_refunded = crowdfund
                .total_refunded
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            env.storage()
                .persistent()
                .set(&DataKey::Contribution(contributor.clone()), &0i128);
            env.storage().instance().set(&DataKey::Crowdfund, &crowdfund);

            let contract = env.current_contract_address();
            env.invoke_contract::<()>(
                &crowdfund.repayment_manager,
                &Symbol::new(&env, "decrease_shares"),
                vec![
                    &env,
                    contract.to_val(),
                    contributor.to_val(),
                    amount.into_val(&env),
                ],
            );

            let token_client = token::Client::new(&env, &crowdfund.token);
            if !matches!(
                token_client.try_transfer(&contract, &contributor, &amount),
                Ok(Ok(()))
            ) {
                return Err(Error::TransferFailed);
            }

            env.events().publish(
                (Symbol::new(&env, "refunded"), contributor.clone()),
                RefundedEvent {
                    contributor,
                    amount,
                },
            );

            Ok(amount)
        })
    }

    /// Move escrowed principal to the borrower
    ///
    /// `None` withdraws everything left. Emptying the escrow starts the
    /// repayment cycle.
    ///
    /// Returns the amount withdrawn.
    ///
    /// # Errors
    /// - `Unauthorized`: Caller is not the borrower
    /// - `FundingNotComplete`: Loan not in FundingComplete
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientEscrow`: Amount exceeds the remaining escrow
    pub fn withdraw(env: Env, borrower: Address, amount: Option<i128>) -> Result<i128, Error> {
        guard::non_reentrant(&env, Error::Reentrant, || {
            let mut crowdfund = Self::get_crowdfund(env.clone())?;

            if Self::loan_status(&env, &crowdfund) != LoanStatus::FundingComplete {
                return Err(Error::FundingNotComplete);
            }

            borrower.require_auth();
            if borrower != crowdfund.borrower {
                return Err(Error::Unauthorized);
            }

            let remaining = crowdfund.remaining_escrow();
            let amount = amount.unwrap_or(remaining);
            if amount <= 0 {
                return Err(Error::InvalidAmount);
            }
            if amount > remaining {
                return Err(Error::InsufficientEscrow);
            }

            crowdfund.total_withdrawn = crowdfund
                .total_withdrawn
                .checked_add(amount)
                .ok_or(Error::Overflow)?;
            env.storage().instance().set(&DataKey::Crowdfund, &crowdfund);

            let remaining = crowdfund.remaining_escrow();
            if remaining == 0 {
                Self::set_loan_status(&env, &crowdfund, LoanStatus::RepaymentCycle);
            }

            let token_client = token::Client::new(&env, &crowdfund.token);
            if !matches!(
                token_client.try_transfer(&env.current_contract_address(), &borrower, &amount),
                Ok(Ok(()))
            ) {
                return Err(Error::TransferFailed);
            }

            log!(&env, "principal withdrawn", amount, remaining);

            env.events().publish(
                (Symbol::new(&env, "withdrawn"), borrower.clone()),
                WithdrawnEvent {
                    borrower,
                    amount,
                    remaining,
                },
            );

            Ok(amount)
        })
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_crowdfund(env: Env) -> Result<Crowdfund, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Crowdfund)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_contribution(env: Env, contributor: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Contribution(contributor))
            .unwrap_or(0)
    }

    pub fn total_contributed(env: Env) -> Result<i128, Error> {
        Ok(Self::get_crowdfund(env)?.total_contributed)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn loan_status(env: &Env, crowdfund: &Crowdfund) -> LoanStatus {
        env.invoke_contract(
            &crowdfund.terms,
            &Symbol::new(env, "get_loan_status"),
            vec![env],
        )
    }

    fn set_loan_status(env: &Env, crowdfund: &Crowdfund, status: LoanStatus) {
        env.invoke_contract::<()>(
            &crowdfund.terms,
            &Symbol::new(env, "set_loan_status"),
            vec![
                env,
                env.current_contract_address().to_val(),
                status.into_val(env),
            ],
        );
    }
}
