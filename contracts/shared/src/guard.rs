//! Per-contract re-entrancy guard.
//!
//! The flag lives in instance storage. A failed call rolls back its writes,
//! so an error path never leaves the guard stuck.

use soroban_sdk::{contracttype, Env};

#[contracttype]
#[derive(Clone)]
enum GuardKey {
    Entered,
}

pub fn is_entered(env: &Env) -> bool {
    env.storage()
        .instance()
        .get::<GuardKey, bool>(&GuardKey::Entered)
        .unwrap_or(false)
}

/// Mark the contract as busy, failing with `busy` if it already is.
pub fn enter<E>(env: &Env, busy: E) -> Result<(), E> {
    if is_entered(env) {
        return Err(busy);
    }
    env.storage().instance().set(&GuardKey::Entered, &true);
    Ok(())
}

pub fn exit(env: &Env) {
    env.storage().instance().remove(&GuardKey::Entered);
}

/// Run `f` with the guard held.
pub fn non_reentrant<T, E>(env: &Env, busy: E, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    enter(env, busy)?;
    let out = f();
    exit(env);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{contract, contractimpl};

    #[contract]
    pub struct Host;

    #[contractimpl]
    impl Host {
        pub fn ping() -> u32 {
            1
        }
    }

    #[test]
    fn test_nested_entry_rejected() {
        let env = Env::default();
        let id = env.register(Host, ());

        env.as_contract(&id, || {
            enter(&env, 7u32).unwrap();
            assert_eq!(enter(&env, 7u32), Err(7));
            exit(&env);
            assert!(!is_entered(&env));
        });
    }

    #[test]
    fn test_non_reentrant_releases_on_return() {
        let env = Env::default();
        let id = env.register(Host, ());

        env.as_contract(&id, || {
            let inner = non_reentrant(&env, 1u32, || {
                assert!(is_entered(&env));
                non_reentrant(&env, 2u32, || Ok::<_, u32>(()))
            });
            assert_eq!(inner, Err(2));
            assert!(!is_entered(&env));
        });
    }
}
