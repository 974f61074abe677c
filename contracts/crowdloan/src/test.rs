#![cfg(test)]

use super::*;
use loan_terms::{LoanTermsContract, LoanTermsContractClient};
use repayment_manager::{RepaymentManager, RepaymentManagerClient};
use shared::{LoanParams, TimeUnit};
use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, Env,
};

const PRINCIPAL: i128 = 350;
const START: u64 = 1_000;
const LENGTH: u64 = 1_000;

struct TestContext {
    env: Env,
    crowdloan: CrowdloanClient<'static>,
    terms: LoanTermsContractClient<'static>,
    manager: RepaymentManagerClient<'static>,
    token: TokenClient<'static>,
    token_admin: StellarAssetClient<'static>,
    borrower: Address,
}

fn setup_with_start(crowdfund_start: u64) -> TestContext {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(START);

    let deployer = Address::generate(&env);
    let borrower = Address::generate(&env);

    let token_contract = env.register_stellar_asset_contract_v2(Address::generate(&env));
    let token = TokenClient::new(&env, &token_contract.address());
    let token_admin = StellarAssetClient::new(&env, &token_contract.address());

    let terms_id = env.register(LoanTermsContract, ());
    let manager_id = env.register(RepaymentManager, ());
    let crowdloan_id = env.register(Crowdloan, ());

    let terms = LoanTermsContractClient::new(&env, &terms_id);
    terms.initialize(
        &deployer,
        &vec![&env, crowdloan_id.clone(), manager_id.clone()],
        &LoanParams {
            borrower: borrower.clone(),
            principal_token: token.address.clone(),
            principal_requested: PRINCIPAL,
            time_unit: TimeUnit::Months,
            loan_period: 12,
            term_payment: 35,
            grace_period_length: 0,
            grace_period_payment: 0,
            interest_rate: 1_000,
        },
    );

    let manager = RepaymentManagerClient::new(&env, &manager_id);
    manager.initialize(
        &deployer,
        &terms_id,
        &token.address,
        &vec![&env, crowdloan_id.clone()],
    );

    let crowdloan = CrowdloanClient::new(&env, &crowdloan_id);
    crowdloan.initialize(&deployer, &terms_id, &manager_id, &crowdfund_start, &LENGTH);

    TestContext {
        env,
        crowdloan,
        terms,
        manager,
        token,
        token_admin,
        borrower,
    }
}

fn setup() -> TestContext {
    let ctx = setup_with_start(0);
    ctx.crowdloan.start_crowdfund(&ctx.borrower);
    ctx
}

/// Mint and approve `amount` for a fresh or existing lender.
fn prepare(ctx: &TestContext, lender: &Address, amount: i128) {
    ctx.token_admin.mint(lender, &amount);
    ctx.token
        .approve(lender, &ctx.crowdloan.address, &amount, &1_000);
}

fn fund(ctx: &TestContext, lender: &Address, amount: i128) -> LoanStatus {
    prepare(ctx, lender, amount);
    ctx.crowdloan.fund(lender, &amount)
}

// ============================================
// START
// ============================================

#[test]
fn test_start_crowdfund() {
    let ctx = setup_with_start(0);
    let stranger = Address::generate(&ctx.env);

    assert_eq!(
        ctx.crowdloan.try_start_crowdfund(&stranger),
        Err(Ok(Error::Unauthorized))
    );

    ctx.crowdloan.start_crowdfund(&ctx.borrower);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingStarted);

    let crowdfund = ctx.crowdloan.get_crowdfund();
    assert_eq!(crowdfund.start, START);
    assert_eq!(crowdfund.deadline(), START + LENGTH);

    assert_eq!(
        ctx.crowdloan.try_start_crowdfund(&ctx.borrower),
        Err(Ok(Error::AlreadyStarted))
    );
}

#[test]
fn test_fund_before_start() {
    let ctx = setup_with_start(0);
    let lender = Address::generate(&ctx.env);
    prepare(&ctx, &lender, 100);

    assert_eq!(
        ctx.crowdloan.try_fund(&lender, &100),
        Err(Ok(Error::FundingNotOpen))
    );
}

#[test]
fn test_fund_before_window_opens() {
    let ctx = setup_with_start(START + 500);
    ctx.crowdloan.start_crowdfund(&ctx.borrower);
    let lender = Address::generate(&ctx.env);
    prepare(&ctx, &lender, 100);

    assert_eq!(
        ctx.crowdloan.try_fund(&lender, &100),
        Err(Ok(Error::CrowdfundNotStarted))
    );

    ctx.env.ledger().set_timestamp(START + 500);
    assert_eq!(ctx.crowdloan.fund(&lender, &100), LoanStatus::FundingStarted);
}

// ============================================
// FUND
// ============================================

#[test]
fn test_fund_zero() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);

    assert_eq!(
        ctx.crowdloan.try_fund(&lender, &0),
        Err(Ok(Error::InvalidAmount))
    );
}

#[test]
fn test_fund_records_contribution_and_shares() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);

    assert_eq!(fund(&ctx, &lender, 100), LoanStatus::FundingStarted);
    assert_eq!(fund(&ctx, &lender, 20), LoanStatus::FundingStarted);

    assert_eq!(ctx.crowdloan.get_contribution(&lender), 120);
    assert_eq!(ctx.crowdloan.total_contributed(), 120);
    assert_eq!(ctx.manager.shares(&lender), 120);
    assert_eq!(ctx.manager.total_shares(), 120);
    assert_eq!(ctx.token.balance(&ctx.crowdloan.address), 120);
}

#[test]
fn test_one_unit_short_then_exact_goal() {
    let ctx = setup();
    let lender1 = Address::generate(&ctx.env);
    let lender2 = Address::generate(&ctx.env);

    assert_eq!(
        fund(&ctx, &lender1, PRINCIPAL - 1),
        LoanStatus::FundingStarted
    );
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingStarted);

    assert_eq!(fund(&ctx, &lender2, 1), LoanStatus::FundingComplete);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingComplete);

    // Shares are frozen and funding is closed
    let late = Address::generate(&ctx.env);
    prepare(&ctx, &late, 10);
    assert_eq!(
        ctx.crowdloan.try_fund(&late, &10),
        Err(Ok(Error::FundingNotOpen))
    );
}

#[test]
fn test_fund_without_allowance() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    ctx.token_admin.mint(&lender, &100);

    assert_eq!(
        ctx.crowdloan.try_fund(&lender, &100),
        Err(Ok(Error::TransferFailed))
    );
    assert_eq!(ctx.crowdloan.get_contribution(&lender), 0);
    assert_eq!(ctx.manager.total_shares(), 0);
}

#[test]
fn test_failed_pull_at_goal_rolls_back_shares_and_status() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    ctx.token_admin.mint(&lender, &PRINCIPAL);

    assert_eq!(
        ctx.crowdloan.try_fund(&lender, &PRINCIPAL),
        Err(Ok(Error::TransferFailed))
    );
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingStarted);
    assert_eq!(ctx.manager.shares(&lender), 0);
    assert_eq!(ctx.crowdloan.total_contributed(), 0);
}

#[test]
fn test_fund_after_deadline_fails_crowdfund() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    fund(&ctx, &lender, 100);

    ctx.env.ledger().set_timestamp(START + LENGTH);
    let late = Address::generate(&ctx.env);
    prepare(&ctx, &late, 50);

    assert_eq!(ctx.crowdloan.fund(&late, &50), LoanStatus::FundingFailed);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingFailed);
    assert_eq!(ctx.token.balance(&late), 50);
    assert_eq!(ctx.crowdloan.get_contribution(&late), 0);
}

// ============================================
// CLOSE / REFUND
// ============================================

#[test]
fn test_close_funding() {
    let ctx = setup();

    assert_eq!(
        ctx.crowdloan.try_close_funding(),
        Err(Ok(Error::DeadlineNotPassed))
    );

    ctx.env.ledger().set_timestamp(START + LENGTH);
    assert_eq!(ctx.crowdloan.close_funding(), LoanStatus::FundingFailed);

    assert_eq!(
        ctx.crowdloan.try_close_funding(),
        Err(Ok(Error::FundingNotOpen))
    );
}

#[test]
fn test_refund_while_open() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    fund(&ctx, &lender, 100);

    assert_eq!(
        ctx.crowdloan.try_refund(&lender),
        Err(Ok(Error::FundingNotFailed))
    );
}

#[test]
fn test_refund_exactly_once() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    let other = Address::generate(&ctx.env);
    fund(&ctx, &lender, 100);
    fund(&ctx, &other, 30);

    ctx.env.ledger().set_timestamp(START + LENGTH + 1);
    ctx.crowdloan.close_funding();

    assert_eq!(ctx.crowdloan.refund(&lender), 100);
    assert_eq!(ctx.token.balance(&lender), 100);
    assert_eq!(ctx.crowdloan.get_contribution(&lender), 0);
    assert_eq!(ctx.manager.shares(&lender), 0);
    assert_eq!(ctx.manager.total_shares(), 30);

    // Second call is a no-op
    assert_eq!(ctx.crowdloan.refund(&lender), 0);
    assert_eq!(ctx.token.balance(&lender), 100);

    assert_eq!(ctx.crowdloan.refund(&other), 30);
    assert_eq!(ctx.token.balance(&ctx.crowdloan.address), 0);
}

#[test]
fn test_refund_commits_failure_after_deadline() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    fund(&ctx, &lender, 100);

    ctx.env.ledger().set_timestamp(START + LENGTH);
    assert_eq!(ctx.crowdloan.refund(&lender), 100);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingFailed);
}

// ============================================
// WITHDRAW
// ============================================

#[test]
fn test_withdraw_before_complete() {
    let ctx = setup();

    assert_eq!(
        ctx.crowdloan.try_withdraw(&ctx.borrower, &None),
        Err(Ok(Error::FundingNotComplete))
    );
}

#[test]
fn test_withdraw_borrower_only() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    fund(&ctx, &lender, PRINCIPAL);

    assert_eq!(
        ctx.crowdloan.try_withdraw(&lender, &None),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn test_withdraw_partial_then_rest() {
    let ctx = setup();
    let lender = Address::generate(&ctx.env);
    fund(&ctx, &lender, PRINCIPAL);

    assert_eq!(
        ctx.crowdloan.try_withdraw(&ctx.borrower, &Some(PRINCIPAL + 1)),
        Err(Ok(Error::InsufficientEscrow))
    );

    ctx.env.ledger().set_timestamp(START + 10);
    assert_eq!(ctx.crowdloan.withdraw(&ctx.borrower, &Some(150)), 150);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingComplete);

    assert_eq!(ctx.crowdloan.withdraw(&ctx.borrower, &None), 200);
    assert_eq!(ctx.token.balance(&ctx.borrower), PRINCIPAL);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::RepaymentCycle);

    let loan = ctx.terms.get_loan_params();
    assert_eq!(loan.loan_start, START + 10);
    assert_eq!(loan.loan_end, START + 10 + 12 * TimeUnit::Months.seconds());
}

// ============================================
// FULL LIFECYCLE
// ============================================

#[test]
fn test_full_loan_lifecycle() {
    let ctx = setup();
    let lenders = [
        (Address::generate(&ctx.env), 100i128),
        (Address::generate(&ctx.env), 200i128),
        (Address::generate(&ctx.env), 50i128),
    ];

    for (lender, amount) in lenders.iter() {
        fund(&ctx, lender, *amount);
    }
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::FundingComplete);

    ctx.crowdloan.withdraw(&ctx.borrower, &None);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::RepaymentCycle);

    // Borrower repays principal plus 10% interest
    let repayment = ctx.terms.expected_repayment();
    assert_eq!(repayment, 385);
    ctx.token_admin.mint(&ctx.borrower, &(repayment - PRINCIPAL));
    ctx.token
        .approve(&ctx.borrower, &ctx.manager.address, &repayment, &1_000);
    ctx.manager.pay(&ctx.borrower, &repayment);
    assert_eq!(ctx.terms.get_loan_status(), LoanStatus::RepaymentComplete);

    // 385 split 100:200:50 → 110, 220, 55
    assert_eq!(ctx.manager.release(&lenders[0].0), 110);
    assert_eq!(ctx.manager.release(&lenders[1].0), 220);
    assert_eq!(ctx.manager.release(&lenders[2].0), 55);
    assert_eq!(ctx.manager.total_released(), 385);

    for (lender, _) in lenders.iter() {
        assert_eq!(ctx.manager.release(lender), 0);
    }
}
