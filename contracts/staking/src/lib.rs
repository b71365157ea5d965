#![no_std]

pub mod custody;
pub mod events;
pub mod position;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env, Symbol};

use position::Position;

// ── Storage key constants ────────────────────────────────────────────────────

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");
const INITIALIZED: Symbol = symbol_short!("INIT");
const POOL_ASSET: Symbol = symbol_short!("ASSET");
const REWARD_RATE: Symbol = symbol_short!("RWD_RATE");
const TOTAL_STAKED: Symbol = symbol_short!("TOT_STK");
const REWARD_PER_TOKEN: Symbol = symbol_short!("RPT");
const LAST_UPDATE: Symbol = symbol_short!("LAST_UPD");
const LOCK_PERIOD: Symbol = symbol_short!("LOCK_PER");
const PAUSED: Symbol = symbol_short!("PAUSED");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    StillLocked = 6,
    Paused = 7,
    TransferFailed = 8,
    NoPendingAdmin = 9,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Snapshot of a participant's position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug)]
pub struct StakerInfo {
    pub staked: i128,
    pub pending_rewards: i128,
    pub stake_timestamp: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingContract;

#[contractimpl]
impl StakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `asset`       – SAC address of the pool asset. The same custody
    ///   backs both staked principal and reward payouts.
    /// * `reward_rate` – reward units emitted **per second** across all
    ///   stakers.
    /// * `lock_period` – seconds a stake must remain before ordinary
    ///   withdrawal.
    pub fn initialize(
        env: Env,
        admin: Address,
        asset: Address,
        reward_rate: i128,
        lock_period: u64,
    ) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if reward_rate < 0 {
            return Err(ContractError::InvalidAmount);
        }

        let now = env.ledger().timestamp();

        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&POOL_ASSET, &asset);
        env.storage().instance().set(&REWARD_RATE, &reward_rate);
        env.storage().instance().set(&LAST_UPDATE, &now);
        env.storage().instance().set(&LOCK_PERIOD, &lock_period);
        // TOTAL_STAKED, REWARD_PER_TOKEN, and PAUSED start at their zero
        // values; unwrap_or defaults handle absent keys.

        events::publish_initialized(&env, admin, asset, reward_rate, lock_period);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` of the pool asset.
    ///
    /// The global accumulator is flushed first so the staker does not
    /// retroactively earn on the newly deposited tokens. Restaking resets
    /// the lock clock for the whole position.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if Self::read_paused(&env) {
            return Err(ContractError::Paused);
        }
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        // 1. Flush the global accumulator, then snapshot this position.
        let mut position = Self::update_reward(&env, &staker);

        // 2. Commit the accounting changes.
        position.balance = position.balance.saturating_add(amount);
        position.stake_timestamp = env.ledger().timestamp();
        position::save_position(&env, &staker, &position);

        let new_total = Self::read_total_staked(&env).saturating_add(amount);
        env.storage().instance().set(&TOTAL_STAKED, &new_total);

        // 3. Pull tokens last; an Err return rolls back everything above.
        let asset = Self::read_asset(&env)?;
        custody::pull(&env, &asset, &staker, amount)?;

        events::publish_staked(&env, staker, amount, new_total);

        Ok(())
    }

    // ── Withdrawal ──────────────────────────────────────────────────────────

    /// Return `amount` of staked principal to the caller.
    ///
    /// Outside of pause the position must be past its lock window. While
    /// paused the lock check is skipped entirely: pause is an escape hatch
    /// for participants, not a freeze. Accrued-but-unclaimed rewards survive
    /// any withdrawal.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        // 1. Flush rewards before reducing stake.
        let mut position = Self::update_reward(&env, &staker);

        if position.balance < amount {
            return Err(ContractError::InsufficientBalance);
        }

        if !Self::read_paused(&env) {
            let lock_period: u64 = env.storage().instance().get(&LOCK_PERIOD).unwrap_or(0);
            let unlock_at = position.stake_timestamp.saturating_add(lock_period);
            if env.ledger().timestamp() < unlock_at {
                return Err(ContractError::StillLocked);
            }
        }

        // 2. Commit the accounting changes.
        position.balance = position.balance.saturating_sub(amount);
        position::save_position(&env, &staker, &position);

        let new_total = Self::read_total_staked(&env).saturating_sub(amount);
        env.storage().instance().set(&TOTAL_STAKED, &new_total);

        // 3. Push tokens last.
        let asset = Self::read_asset(&env)?;
        custody::push(&env, &asset, &staker, amount)?;

        events::publish_withdrawn(&env, staker, amount, new_total);

        Ok(())
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out all credited rewards for `staker`.
    ///
    /// A zero-owed claim is a successful no-op. Payouts draw from the same
    /// custody as staked principal; an underfunded pool surfaces here as
    /// `TransferFailed`, with the owed amount left intact by the rollback.
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();

        // 1. Sync the accumulator and this position.
        let mut position = Self::update_reward(&env, &staker);

        let owed = position.rewards_owed;
        if owed <= 0 {
            // Nothing to claim — return without reverting.
            return Ok(0);
        }

        // 2. Zero the credit, then transfer.
        position.rewards_owed = 0;
        position::save_position(&env, &staker, &position);

        let asset = Self::read_asset(&env)?;
        custody::push(&env, &asset, &staker, owed)?;

        events::publish_reward_paid(&env, staker, owed);

        Ok(owed)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Current staked balance of `staker`.
    pub fn get_staked(env: Env, staker: Address) -> i128 {
        position::get_position(&env, &staker).balance
    }

    /// Real-time pending rewards for `staker` without mutating state.
    pub fn get_pending_rewards(env: Env, staker: Address) -> i128 {
        let current_rpt = Self::projected_reward_per_token(&env);
        let position = position::get_position(&env, &staker);
        rewards::earned(
            position.balance,
            current_rpt,
            position.reward_per_token_paid,
            position.rewards_owed,
        )
    }

    /// Combined position snapshot for `staker`.
    pub fn get_staker_info(env: Env, staker: Address) -> StakerInfo {
        let current_rpt = Self::projected_reward_per_token(&env);
        let position = position::get_position(&env, &staker);

        StakerInfo {
            staked: position.balance,
            pending_rewards: rewards::earned(
                position.balance,
                current_rpt,
                position.reward_per_token_paid,
                position.rewards_owed,
            ),
            stake_timestamp: position.stake_timestamp,
        }
    }

    /// Current global reward rate (units per second).
    pub fn get_reward_rate(env: Env) -> i128 {
        env.storage().instance().get(&REWARD_RATE).unwrap_or(0)
    }

    /// Sum of all currently staked tokens.
    pub fn get_total_staked(env: Env) -> i128 {
        Self::read_total_staked(&env)
    }

    /// Configured withdrawal lock period in seconds.
    pub fn get_lock_period(env: Env) -> u64 {
        env.storage().instance().get(&LOCK_PERIOD).unwrap_or(0)
    }

    pub fn is_paused(env: Env) -> bool {
        Self::read_paused(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Update the reward emission rate.
    ///
    /// The accumulator is flushed at the old rate *before* the change, so no
    /// already-elapsed interval is ever re-priced.
    pub fn set_reward_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidAmount);
        }

        // Flush at the old rate before switching.
        Self::advance_accumulator(&env);

        env.storage().instance().set(&REWARD_RATE, &new_rate);

        events::publish_reward_rate_set(&env, new_rate);

        Ok(())
    }

    /// Update the withdrawal lock period.
    ///
    /// Lock checks read the live parameter at withdrawal time, so this needs
    /// no accumulator interaction.
    pub fn set_lock_period(env: Env, caller: Address, new_period: u64) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        env.storage().instance().set(&LOCK_PERIOD, &new_period);

        events::publish_lock_period_set(&env, new_period);

        Ok(())
    }

    /// Pull `amount` of the pool asset into custody for reward payouts.
    ///
    /// Touches no accounting state. There is no separate reward-pool balance:
    /// claims draw from total custody, so underfunding only shows up as a
    /// failed transfer at claim time.
    pub fn fund_rewards(env: Env, caller: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let asset = Self::read_asset(&env)?;
        custody::pull(&env, &asset, &caller, amount)?;

        events::publish_rewards_funded(&env, caller, amount);

        Ok(())
    }

    /// Halt new stakes and lift lock enforcement on withdrawals.
    ///
    /// Reward accrual and claims stay fully live while paused.
    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        env.storage().instance().set(&PAUSED, &true);

        events::publish_paused(&env, caller);

        Ok(())
    }

    /// Resume normal operation.
    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        env.storage().instance().set(&PAUSED, &false);

        events::publish_unpaused(&env, caller);

        Ok(())
    }

    /// Sweep the entire custodial balance to the admin.
    ///
    /// Bypasses all per-participant accounting. Reserved for catastrophic
    /// recovery; the pool is not expected to be usable afterwards.
    pub fn emergency_withdraw(env: Env, caller: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        let asset = Self::read_asset(&env)?;
        let amount = custody::balance(&env, &asset);
        if amount > 0 {
            custody::push(&env, &asset, &caller, amount)?;
        }

        events::publish_emergency_withdraw(&env, caller, amount);

        Ok(amount)
    }

    // ── Admin transfer (two-step) ──────────────────────────────────────────

    /// Propose a new admin address. Only the current admin can call this.
    /// The new admin must call `accept_admin` to complete the transfer.
    pub fn propose_admin(
        env: Env,
        current_admin: Address,
        new_admin: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        env.storage().instance().set(&PENDING_ADMIN, &new_admin);

        events::publish_admin_transfer_proposed(&env, current_admin, new_admin);

        Ok(())
    }

    /// Accept the pending admin transfer. Only the proposed new admin can
    /// complete the handover.
    pub fn accept_admin(env: Env, new_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_admin.require_auth();

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::NoPendingAdmin)?;

        if new_admin != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;

        env.storage().instance().set(&ADMIN, &new_admin);
        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_accepted(&env, old_admin, new_admin);

        Ok(())
    }

    /// Cancel a pending admin transfer. Only the current admin can call this.
    pub fn cancel_admin_transfer(env: Env, current_admin: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_admin.require_auth();
        Self::require_admin(&env, &current_admin)?;

        let pending: Address = env
            .storage()
            .instance()
            .get(&PENDING_ADMIN)
            .ok_or(ContractError::NoPendingAdmin)?;

        env.storage().instance().remove(&PENDING_ADMIN);

        events::publish_admin_transfer_cancelled(&env, current_admin, pending);

        Ok(())
    }

    /// The pending admin address, if a transfer is in flight.
    pub fn get_pending_admin(env: Env) -> Option<Address> {
        env.storage().instance().get(&PENDING_ADMIN)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Guard: revert if `caller` is not the stored admin.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(ContractError::NotInitialized)?;
        if *caller != admin {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    fn read_paused(env: &Env) -> bool {
        env.storage().instance().get(&PAUSED).unwrap_or(false)
    }

    fn read_total_staked(env: &Env) -> i128 {
        env.storage().instance().get(&TOTAL_STAKED).unwrap_or(0)
    }

    fn read_asset(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&POOL_ASSET)
            .ok_or(ContractError::NotInitialized)
    }

    /// What the accumulator would read at the current timestamp, without
    /// persisting anything. Shared by the read-only views.
    fn projected_reward_per_token(env: &Env) -> i128 {
        let total_staked = Self::read_total_staked(env);
        let reward_rate: i128 = env.storage().instance().get(&REWARD_RATE).unwrap_or(0);
        let stored_rpt: i128 = env.storage().instance().get(&REWARD_PER_TOKEN).unwrap_or(0);
        let last_update: u64 = env.storage().instance().get(&LAST_UPDATE).unwrap_or(0);

        let elapsed = env.ledger().timestamp().saturating_sub(last_update);
        rewards::reward_per_token(stored_rpt, reward_rate, elapsed, total_staked)
    }

    /// Advance the global accumulator to "now" and persist it.
    ///
    /// Must run, and its result must be stored, before the same operation
    /// mutates `TOTAL_STAKED`, otherwise the elapsed interval would be priced
    /// with the post-mutation supply.
    fn advance_accumulator(env: &Env) -> i128 {
        let new_rpt = Self::projected_reward_per_token(env);

        env.storage().instance().set(&REWARD_PER_TOKEN, &new_rpt);
        env.storage()
            .instance()
            .set(&LAST_UPDATE, &env.ledger().timestamp());

        new_rpt
    }

    /// Full synchronization preamble for one participant.
    ///
    /// 1. Advance the global accumulator.
    /// 2. Credit the position with everything accrued since its snapshot.
    /// 3. Persist the refreshed snapshot and return it for further mutation.
    fn update_reward(env: &Env, staker: &Address) -> Position {
        let current_rpt = Self::advance_accumulator(env);

        let mut position = position::get_position(env, staker);
        position.rewards_owed = rewards::earned(
            position.balance,
            current_rpt,
            position.reward_per_token_paid,
            position.rewards_owed,
        );
        position.reward_per_token_paid = current_rpt;
        position::save_position(env, staker, &position);

        position
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
