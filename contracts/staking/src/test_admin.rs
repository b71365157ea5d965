extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::{ContractError, StakingContract, StakingContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, StakingContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let asset = env.register_stellar_asset_contract_v2(Address::generate(&env));

    let contract_id = env.register(StakingContract, ());
    let client = StakingContractClient::new(&env, &contract_id);

    let admin = Address::generate(&env);
    client.initialize(&admin, &asset.address(), &10, &86_400);

    (env, client, admin)
}

/// Asserts that a `try_` call failed with the given contract error.
macro_rules! assert_contract_err {
    ($result:expr, $err:expr) => {
        match $result {
            Err(Ok(e)) => assert_eq!(e, $err),
            _ => unreachable!("Expected {:?} error", $err),
        }
    };
}

// ── Admin-gated operations reject non-admins ─────────────────────────────────

#[test]
fn test_set_reward_rate_by_non_admin_fails() {
    let (env, client, _admin) = setup();

    let intruder = Address::generate(&env);
    assert_contract_err!(
        client.try_set_reward_rate(&intruder, &999),
        ContractError::Unauthorized
    );
}

#[test]
fn test_set_lock_period_by_non_admin_fails() {
    let (env, client, _admin) = setup();

    let intruder = Address::generate(&env);
    assert_contract_err!(
        client.try_set_lock_period(&intruder, &0),
        ContractError::Unauthorized
    );
}

#[test]
fn test_fund_rewards_by_non_admin_fails() {
    let (env, client, _admin) = setup();

    let intruder = Address::generate(&env);
    assert_contract_err!(
        client.try_fund_rewards(&intruder, &1_000),
        ContractError::Unauthorized
    );
}

#[test]
fn test_pause_by_non_admin_fails() {
    let (env, client, _admin) = setup();

    let intruder = Address::generate(&env);
    assert_contract_err!(client.try_pause(&intruder), ContractError::Unauthorized);
    assert_contract_err!(client.try_unpause(&intruder), ContractError::Unauthorized);
}

#[test]
fn test_emergency_withdraw_by_non_admin_fails() {
    let (env, client, _admin) = setup();

    let intruder = Address::generate(&env);
    assert_contract_err!(
        client.try_emergency_withdraw(&intruder),
        ContractError::Unauthorized
    );
}

// ── Two-step admin transfer ──────────────────────────────────────────────────

#[test]
fn test_propose_admin_records_pending() {
    let (env, client, admin) = setup();

    let successor = Address::generate(&env);
    client.propose_admin(&admin, &successor);

    assert_eq!(client.get_pending_admin(), Some(successor));
    // The handover is not complete until accepted.
    assert_eq!(client.get_admin(), admin);
}

#[test]
fn test_propose_admin_by_non_admin_fails() {
    let (env, client, _admin) = setup();

    let intruder = Address::generate(&env);
    assert_contract_err!(
        client.try_propose_admin(&intruder, &intruder),
        ContractError::Unauthorized
    );
}

#[test]
fn test_accept_admin_completes_transfer() {
    let (env, client, admin) = setup();

    let successor = Address::generate(&env);
    client.propose_admin(&admin, &successor);
    client.accept_admin(&successor);

    assert_eq!(client.get_admin(), successor);
    assert_eq!(client.get_pending_admin(), None);

    // The old admin has lost its privileges; the new one has them.
    assert_contract_err!(
        client.try_set_reward_rate(&admin, &5),
        ContractError::Unauthorized
    );
    client.set_reward_rate(&successor, &5);
    assert_eq!(client.get_reward_rate(), 5);
}

#[test]
fn test_accept_admin_by_wrong_address_fails() {
    let (env, client, admin) = setup();

    let successor = Address::generate(&env);
    let intruder = Address::generate(&env);
    client.propose_admin(&admin, &successor);

    assert_contract_err!(client.try_accept_admin(&intruder), ContractError::Unauthorized);
}

#[test]
fn test_accept_admin_without_pending_fails() {
    let (env, client, _admin) = setup();

    let hopeful = Address::generate(&env);
    assert_contract_err!(
        client.try_accept_admin(&hopeful),
        ContractError::NoPendingAdmin
    );
}

#[test]
fn test_cancel_admin_transfer() {
    let (env, client, admin) = setup();

    let successor = Address::generate(&env);
    client.propose_admin(&admin, &successor);
    client.cancel_admin_transfer(&admin);

    assert_eq!(client.get_pending_admin(), None);

    // A cancelled proposal can no longer be accepted.
    assert_contract_err!(
        client.try_accept_admin(&successor),
        ContractError::NoPendingAdmin
    );
}

#[test]
fn test_cancel_without_pending_fails() {
    let (_env, client, admin) = setup();

    assert_contract_err!(
        client.try_cancel_admin_transfer(&admin),
        ContractError::NoPendingAdmin
    );
}
