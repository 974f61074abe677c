#![cfg(test)]

use super::*;
use shared::TimeUnit;
use soroban_sdk::{
    testutils::{Address as _, Events},
    vec, Address, BytesN, Env, IntoVal, Symbol,
};

struct TestContext {
    env: Env,
    factory: LoanFactoryClient<'static>,
    admin: Address,
    registry: Address,
}

fn setup() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let registry = Address::generate(&env);

    let factory_id = env.register(LoanFactory, ());
    let factory = LoanFactoryClient::new(&env, &factory_id);
    factory.initialize(&admin, &registry);

    TestContext {
        env,
        factory,
        admin,
        registry,
    }
}

fn components(env: &Env, version: u32) -> ComponentSet {
    ComponentSet {
        version,
        terms_wasm: BytesN::from_array(env, &[1; 32]),
        crowdloan_wasm: BytesN::from_array(env, &[2; 32]),
        repayment_wasm: BytesN::from_array(env, &[3; 32]),
        router_wasm: None,
    }
}

fn params(env: &Env) -> LoanParams {
    LoanParams {
        borrower: Address::generate(env),
        principal_token: Address::generate(env),
        principal_requested: 1_000,
        time_unit: TimeUnit::Months,
        loan_period: 6,
        term_payment: 175,
        grace_period_length: 1,
        grace_period_payment: 0,
        interest_rate: 500,
    }
}

#[test]
fn test_initialize() {
    let ctx = setup();

    assert_eq!(ctx.factory.get_admin(), ctx.admin);
    assert_eq!(ctx.factory.get_debt_registry(), ctx.registry);
    assert_eq!(ctx.factory.loan_count(), 0);

    assert_eq!(
        ctx.factory.try_initialize(&ctx.admin, &ctx.registry),
        Err(Ok(Error::AlreadyInitialized))
    );
}

#[test]
fn test_set_components() {
    let ctx = setup();

    assert_eq!(
        ctx.factory.try_get_components(),
        Err(Ok(Error::ComponentsNotSet))
    );

    ctx.factory.set_components(&ctx.admin, &components(&ctx.env, 1));
    assert_eq!(
        ctx.env.events().all(),
        vec![
            &ctx.env,
            (
                ctx.factory.address.clone(),
                (Symbol::new(&ctx.env, "components_updated"),).into_val(&ctx.env),
                ComponentsUpdatedEvent { version: 1 }.into_val(&ctx.env),
            ),
        ]
    );
    assert_eq!(ctx.factory.get_components(), components(&ctx.env, 1));

    let mut next = components(&ctx.env, 2);
    next.router_wasm = Some(BytesN::from_array(&ctx.env, &[4; 32]));
    ctx.factory.set_components(&ctx.admin, &next);
    assert_eq!(ctx.factory.get_components().version, 2);
}

#[test]
fn test_set_components_admin_only() {
    let ctx = setup();
    let stranger = Address::generate(&ctx.env);

    assert_eq!(
        ctx.factory
            .try_set_components(&stranger, &components(&ctx.env, 1)),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn test_set_components_version_must_increase() {
    let ctx = setup();
    ctx.factory.set_components(&ctx.admin, &components(&ctx.env, 3));

    assert_eq!(
        ctx.factory
            .try_set_components(&ctx.admin, &components(&ctx.env, 3)),
        Err(Ok(Error::InvalidVersion))
    );
    assert_eq!(
        ctx.factory
            .try_set_components(&ctx.admin, &components(&ctx.env, 2)),
        Err(Ok(Error::InvalidVersion))
    );
}

#[test]
fn test_deploy_rejects_bad_params() {
    let ctx = setup();
    ctx.factory.set_components(&ctx.admin, &components(&ctx.env, 1));

    let mut p = params(&ctx.env);
    p.principal_requested = 0;
    assert_eq!(
        ctx.factory.try_deploy(&p, &0, &86_400),
        Err(Ok(Error::InvalidPrincipalAmount))
    );

    let mut p = params(&ctx.env);
    p.loan_period = 0;
    assert_eq!(
        ctx.factory.try_deploy(&p, &0, &86_400),
        Err(Ok(Error::InvalidLoanPeriod))
    );

    let mut p = params(&ctx.env);
    p.interest_rate = 9;
    assert_eq!(
        ctx.factory.try_deploy(&p, &0, &86_400),
        Err(Ok(Error::InvalidInterestRate))
    );
    p.interest_rate = 10_000;
    assert_eq!(
        ctx.factory.try_deploy(&p, &0, &86_400),
        Err(Ok(Error::InvalidInterestRate))
    );

    let mut p = params(&ctx.env);
    p.term_payment = -1;
    assert_eq!(
        ctx.factory.try_deploy(&p, &0, &86_400),
        Err(Ok(Error::InvalidTermPayment))
    );

    let mut p = params(&ctx.env);
    p.grace_period_payment = -1;
    assert_eq!(
        ctx.factory.try_deploy(&p, &0, &86_400),
        Err(Ok(Error::InvalidGracePeriodPayment))
    );

    assert_eq!(
        ctx.factory.try_deploy(&params(&ctx.env), &0, &0),
        Err(Ok(Error::InvalidCrowdfundLength))
    );
    assert_eq!(ctx.factory.loan_count(), 0);
}

#[test]
fn test_deploy_without_components() {
    let ctx = setup();

    assert_eq!(
        ctx.factory.try_deploy(&params(&ctx.env), &0, &86_400),
        Err(Ok(Error::ComponentsNotSet))
    );
}

#[test]
fn test_deploy_before_initialize() {
    let env = Env::default();
    env.mock_all_auths();
    let factory = LoanFactoryClient::new(&env, &env.register(LoanFactory, ()));

    assert_eq!(
        factory.try_deploy(&params(&env), &0, &86_400),
        Err(Ok(Error::NotInitialized))
    );
}

#[test]
fn test_unknown_loan() {
    let ctx = setup();
    assert_eq!(ctx.factory.try_get_loan(&1), Err(Ok(Error::LoanNotFound)));
}
