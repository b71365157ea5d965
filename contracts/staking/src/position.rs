//! Per-participant position ledger.
//!
//! A [`Position`] holds everything the engine tracks for one staker. Absence
//! and the all-zero record are equivalent: positions come into existence on
//! first stake and are never explicitly destroyed.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const POSITION: Symbol = symbol_short!("POS");

/// One participant's staking position.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    /// Amount of the pool asset currently staked.
    pub balance: i128,
    /// Time of the most recent stake call. Restaking resets the lock clock.
    pub stake_timestamp: u64,
    /// Global accumulator value this position was last synchronized against.
    pub reward_per_token_paid: i128,
    /// Credited, unclaimed reward units. Zeroed only by a successful claim.
    pub rewards_owed: i128,
}

/// Load a position, defaulting to the zero record for unknown addresses.
pub fn get_position(env: &Env, staker: &Address) -> Position {
    env.storage()
        .persistent()
        .get(&(POSITION, staker.clone()))
        .unwrap_or(Position {
            balance: 0,
            stake_timestamp: 0,
            reward_per_token_paid: 0,
            rewards_owed: 0,
        })
}

pub fn save_position(env: &Env, staker: &Address, position: &Position) {
    env.storage()
        .persistent()
        .set(&(POSITION, staker.clone()), position);
}
