/// Fixed-point scaling factor.
///
/// Reward-per-token values are multiplied by this constant before storage so
/// that sub-unit amounts survive integer division. 10^18 gives 18 decimal
/// places of precision; with i128 storage that still leaves ~20 decimal
/// digits of headroom for the scaled accumulator.
pub const SCALE: i128 = 1_000_000_000_000_000_000;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Recompute the global `reward_per_token` accumulator.
///
/// This is the O(1) accumulation step:
///
/// ```text
/// Δrpt = reward_rate × elapsed_seconds × SCALE / total_staked
/// new_rpt = stored_rpt + Δrpt
/// ```
///
/// When `total_staked` is zero `stored` is returned unchanged: with no shares
/// outstanding there is nobody to distribute to, and the interval is never
/// distributed retroactively. This also rules out division by zero.
///
/// # Arguments
/// * `stored`       – current accumulator value (scaled by SCALE)
/// * `reward_rate`  – reward units emitted per second across *all* stakers
/// * `elapsed`      – seconds since the last update
/// * `total_staked` – sum of all active stakes
#[allow(clippy::arithmetic_side_effects)]
pub fn reward_per_token(
    stored: i128,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> i128 {
    if total_staked <= 0 {
        return stored;
    }

    // elapsed is u64; the cast to i128 is lossless.
    let delta = reward_rate
        .saturating_mul(elapsed as i128)
        .saturating_mul(SCALE)
        / total_staked;

    stored.saturating_add(delta)
}

/// Total rewards owed to a single position.
///
/// ```text
/// earned = balance × (current_rpt − rpt_paid) / SCALE + owed
/// ```
///
/// `current_rpt − rpt_paid` isolates the accumulation since the position's
/// last synchronization, so previously credited rewards are never counted
/// twice.
///
/// # Arguments
/// * `balance`     – the position's staked balance
/// * `current_rpt` – latest global accumulator value
/// * `rpt_paid`    – accumulator snapshot from the last synchronization
/// * `owed`        – already-credited rewards not yet claimed
#[allow(clippy::arithmetic_side_effects)]
pub fn earned(balance: i128, current_rpt: i128, rpt_paid: i128, owed: i128) -> i128 {
    let new_rewards = balance.saturating_mul(current_rpt.saturating_sub(rpt_paid)) / SCALE;

    owed.saturating_add(new_rewards)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests with no Soroban environment dependency.

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    #[test]
    fn rpt_unchanged_when_no_stakers() {
        let rpt = reward_per_token(500, 100, 60, 0);
        assert_eq!(rpt, 500, "accumulator must not move while the pool is empty");
    }

    #[test]
    fn rpt_accumulates_correctly() {
        // reward_rate=10 units/s, elapsed=100s, total_staked=1_000 units
        // Δrpt = 10 × 100 × SCALE / 1_000 = SCALE
        let rpt = reward_per_token(0, 10, 100, 1_000);
        assert_eq!(rpt, SCALE);
    }

    #[test]
    fn rpt_is_monotonic_for_nonnegative_rates() {
        let mut rpt = 0i128;
        for (rate, elapsed, total) in [(10, 50, 1_000), (0, 500, 1_000), (7, 1, 3), (1, 0, 9)] {
            let next = reward_per_token(rpt, rate, elapsed, total);
            assert!(next >= rpt);
            rpt = next;
        }
    }

    #[test]
    fn earned_zero_when_no_new_accumulation() {
        // Snapshot equals the current accumulator: only prior credit remains.
        let e = earned(500, 100, 100, 50);
        assert_eq!(e, 50);
    }

    #[test]
    fn earned_proportional_to_balance() {
        // Accumulator moved by exactly SCALE since the last snapshot.
        // balance=1_000 → new rewards = 1_000 × SCALE / SCALE = 1_000
        let e = earned(1_000, SCALE, 0, 0);
        assert_eq!(e, 1_000);
    }

    #[test]
    fn earned_high_rate_exact_values() {
        // rate=10^15 units/s, 1_000 units staked, 100 s elapsed:
        // Δrpt = 100 × 10^15 × SCALE / 1_000 = 10^32
        // earned = 1_000 × 10^32 / SCALE = 10^17
        let rate: i128 = 1_000_000_000_000_000;
        let rpt = reward_per_token(0, rate, 100, 1_000);
        assert_eq!(rpt, 100_000_000_000_000_000_000_000_000_000_000);
        assert_eq!(earned(1_000, rpt, 0, 0), 100_000_000_000_000_000);
    }

    #[test]
    fn earned_does_not_overflow_large_amounts() {
        // saturating_mul clamps at i128::MAX instead of wrapping, so the
        // result stays positive and the call cannot panic.
        let large_balance: i128 = 1_000_000_000_000_000; // 10^15
        let rpt_delta = SCALE.saturating_mul(1_000);
        let e = earned(large_balance, rpt_delta, 0, 0);
        assert!(e > 0);
        assert_eq!(e, large_balance.saturating_mul(1_000));
    }
}
