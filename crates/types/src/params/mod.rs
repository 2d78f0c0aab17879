// Path: crates/types/src/params/mod.rs
//! Parameter structures carrying the normative protocol constants.
//!
//! Hosts deserialize these from their own configuration layer and hand
//! them to the subsystems at construction. The `Default` impls are the
//! normative values; changing them forks verdict semantics, so any
//! deviation must be coordinated across every conforming implementation.

use serde::{Deserialize, Serialize};

/// One XRP in drops.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Parameters of the deterministic verification engine.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerificationParams {
    /// Maximum deflate-compressed payload length that still passes.
    pub max_complexity: u64,
    /// Raw AST size above which cycle detection reports a cycle rather
    /// than running unbounded.
    pub cycle_budget_bytes: usize,
}

impl Default for VerificationParams {
    fn default() -> Self {
        Self {
            max_complexity: 10_000,
            cycle_budget_bytes: 64 * 1024,
        }
    }
}

/// Parameters of the commit–reveal consensus protocol.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConsensusParams {
    /// Width of the commit window, in ledger intervals; the reveal window
    /// is the same width again.
    pub oracle_window: u64,
    /// The size of the active oracle set quorum is computed against.
    pub active_set_size: u32,
    /// Quorum fraction numerator.
    pub quorum_numerator: u32,
    /// Quorum fraction denominator.
    pub quorum_denominator: u32,
}

impl ConsensusParams {
    /// `ceil(active_set_size * quorum_fraction)`.
    pub fn quorum_required(&self) -> u32 {
        let n = self.active_set_size as u64 * self.quorum_numerator as u64;
        let d = self.quorum_denominator as u64;
        n.div_ceil(d) as u32
    }
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            oracle_window: 1_000,
            active_set_size: 101,
            quorum_numerator: 2,
            quorum_denominator: 3,
        }
    }
}

/// Parameters of the staking and slashing ledger.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StakingParams {
    /// Minimum operator bond, in drops.
    pub oracle_bond_drops: u128,
    /// Epoch length, in ledger intervals.
    pub epoch_ledgers: u64,
    /// Epoch length in wall-clock milliseconds, the unbonding period.
    pub epoch_duration_ms: u64,
    /// Non-reveal slash rate, basis points of the current bond.
    pub slash_non_reveal_bps: u32,
    /// Inactivity slash rate, basis points of the current bond.
    pub slash_inactivity_bps: u32,
    /// Missed reveals within an epoch that trigger the inactivity slash.
    pub inactivity_threshold: u64,
    /// Cumulative-slash fraction of the original bond that forces
    /// ejection, basis points.
    pub auto_eject_bps: u32,
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            oracle_bond_drops: 100_000_000_000, // 100k XRP
            epoch_ledgers: 201_600,
            // 201_600 intervals at ~3.5s per validated ledger.
            epoch_duration_ms: 201_600 * 3_500,
            slash_non_reveal_bps: 1_500,
            slash_inactivity_bps: 500,
            inactivity_threshold: 3,
            auto_eject_bps: 5_000,
        }
    }
}

/// Parameters of the decidability router's friction formulas.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoutingParams {
    /// Base participation quorum before multipliers.
    pub base_quorum: f64,
    /// Base timelock before multipliers, in seconds.
    pub base_timelock_s: u64,
}

impl Default for RoutingParams {
    fn default() -> Self {
        Self {
            base_quorum: 0.10,
            base_timelock_s: 86_400,
        }
    }
}

/// Parameters of jury selection and deliberation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JuryParams {
    /// Panel size.
    pub size: usize,
    /// Deliberation window, in seconds.
    pub voting_period_s: u64,
    /// Supermajority fraction numerator.
    pub supermajority_numerator: u32,
    /// Supermajority fraction denominator.
    pub supermajority_denominator: u32,
    /// Eligibility window: accounts must have been active within this many
    /// milliseconds.
    pub eligibility_window_ms: u64,
}

impl Default for JuryParams {
    fn default() -> Self {
        Self {
            size: 21,
            voting_period_s: 72 * 3_600,
            supermajority_numerator: 2,
            supermajority_denominator: 3,
            eligibility_window_ms: 90 * 24 * 3_600 * 1_000,
        }
    }
}
