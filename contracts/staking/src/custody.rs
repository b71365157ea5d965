//! Custody boundary.
//!
//! The only module that moves the pool asset. Everything else manipulates
//! accounting state; balances are inferred from what crossed this boundary.
//! A rejected transfer surfaces as `TransferFailed`, and returning that error
//! aborts the whole invocation, so no accounting change committed earlier in
//! the same call can outlive a failed transfer.

use soroban_sdk::{token, Address, Env};

use crate::ContractError;

/// Pull `amount` of the pool asset from `from` into contract custody.
pub fn pull(
    env: &Env,
    asset: &Address,
    from: &Address,
    amount: i128,
) -> Result<(), ContractError> {
    let client = token::Client::new(env, asset);
    match client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Push `amount` of the pool asset from custody out to `to`.
pub fn push(env: &Env, asset: &Address, to: &Address, amount: i128) -> Result<(), ContractError> {
    let client = token::Client::new(env, asset);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(ContractError::TransferFailed),
    }
}

/// Current custodial balance of the pool asset.
pub fn balance(env: &Env, asset: &Address) -> i128 {
    token::Client::new(env, asset).balance(&env.current_contract_address())
}
