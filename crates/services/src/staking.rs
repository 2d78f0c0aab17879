// Path: crates/services/src/staking.rs

//! The staking and slashing ledger.
//!
//! All monetary values are unsigned 128-bit drops. Every mutation goes
//! through the transactional methods here, uses checked arithmetic, and
//! appends a fact to the slash history; the conservation audit can replay
//! the whole ledger at any time:
//! `deposits == current bonds + released + forfeited-to-treasury`.
//! Channel-B disagreement is never slashable.

use crate::registry::OracleRegistry;
use accord_types::app::{Address, OperatorStatus, ProposalId, SlashEvent, SlashType};
use accord_types::error::StakingError;
use accord_types::params::StakingParams;
use std::collections::BTreeMap;

/// The append-only slash and reward ledger.
#[derive(Debug)]
pub struct SlashingLedger {
    params: StakingParams,
    events: Vec<SlashEvent>,
    next_event_id: u64,
    total_deposited: u128,
    total_released: u128,
    total_forfeited: u128,
    pending_rewards: BTreeMap<Address, u128>,
    total_rewards_accrued: u128,
    total_rewards_claimed: u128,
    /// Inactivity slashes fire at most once per epoch per operator.
    last_inactivity_epoch: BTreeMap<Address, u64>,
}

impl SlashingLedger {
    /// Creates an empty ledger.
    pub fn new(params: StakingParams) -> Self {
        Self {
            params,
            events: Vec::new(),
            next_event_id: 0,
            total_deposited: 0,
            total_released: 0,
            total_forfeited: 0,
            pending_rewards: BTreeMap::new(),
            total_rewards_accrued: 0,
            total_rewards_claimed: 0,
            last_inactivity_epoch: BTreeMap::new(),
        }
    }

    /// Records a bond deposit at registration.
    pub fn record_deposit(&mut self, amount: u128) -> Result<(), StakingError> {
        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or_else(|| StakingError::Overflow("deposit total".to_string()))?;
        Ok(())
    }

    /// Records the bond released by a completed unbond.
    pub fn record_release(&mut self, amount: u128) -> Result<(), StakingError> {
        self.total_released = self
            .total_released
            .checked_add(amount)
            .ok_or_else(|| StakingError::Overflow("release total".to_string()))?;
        Ok(())
    }

    /// Slashes an oracle for a missed reveal: a fixed fraction of the
    /// current bond, once per missed reveal per proposal.
    pub fn slash_non_reveal(
        &mut self,
        registry: &mut OracleRegistry,
        address: &Address,
        proposal_id: ProposalId,
        now_ms: u64,
    ) -> Result<SlashEvent, StakingError> {
        let bond = self.current_bond(registry, address)?;
        let amount = rate(bond, self.params.slash_non_reveal_bps)?;
        self.apply(registry, address, SlashType::NonReveal, amount, Some(proposal_id), now_ms)
    }

    /// Slashes an oracle for sustained inactivity once its missed reveals
    /// this epoch reach the threshold. At most one inactivity slash per
    /// operator per epoch; returns `None` when the cooldown or threshold
    /// leaves nothing to do.
    pub fn maybe_slash_inactivity(
        &mut self,
        registry: &mut OracleRegistry,
        address: &Address,
        now_ms: u64,
    ) -> Result<Option<SlashEvent>, StakingError> {
        let epoch = registry.epoch().number;
        let missed = registry
            .operator(address)
            .ok_or_else(|| StakingError::UnknownOperator(address.clone()))?
            .metrics
            .missed_reveals;
        if missed < self.params.inactivity_threshold {
            return Ok(None);
        }
        if self.last_inactivity_epoch.get(address) == Some(&epoch) {
            return Ok(None);
        }

        let bond = self.current_bond(registry, address)?;
        let amount = rate(bond, self.params.slash_inactivity_bps)?;
        let event = self.apply(registry, address, SlashType::Inactivity, amount, None, now_ms)?;
        self.last_inactivity_epoch.insert(address.clone(), epoch);
        Ok(Some(event))
    }

    /// Slashes the full bond for proven fraud and ejects the operator
    /// permanently.
    pub fn slash_fraud(
        &mut self,
        registry: &mut OracleRegistry,
        address: &Address,
        proposal_id: ProposalId,
        now_ms: u64,
    ) -> Result<SlashEvent, StakingError> {
        let bond = self.current_bond(registry, address)?;
        let event = self.apply(registry, address, SlashType::Fraud, bond, Some(proposal_id), now_ms)?;
        self.eject_to_treasury(registry, address)?;
        Ok(event)
    }

    /// Distributes an epoch's reward pool across the active set,
    /// stake-weighted and scaled by each operator's performance
    /// multiplier. Call before `start_new_epoch` resets the per-epoch
    /// counters. Rewards accrue as pending; claiming is explicit.
    pub fn distribute_epoch_rewards(
        &mut self,
        registry: &OracleRegistry,
        pool_drops: u128,
        proposals_in_epoch: u64,
    ) -> Result<Vec<(Address, u128)>, StakingError> {
        let active: Vec<_> = registry
            .operators()
            .filter(|op| op.status == OperatorStatus::Active)
            .collect();
        let total_bond: u128 = active.iter().map(|op| op.bond_drops).sum();
        if total_bond == 0 {
            return Ok(Vec::new());
        }

        let mut payouts = Vec::with_capacity(active.len());
        for op in active {
            let base = op
                .bond_drops
                .checked_mul(pool_drops)
                .ok_or_else(|| StakingError::Overflow("reward base".to_string()))?
                / total_bond;
            let centi = performance_multiplier_centi(
                op.metrics.successful_reveals,
                op.metrics.missed_reveals,
                op.metrics.fraud_proofs,
                proposals_in_epoch,
            ) as u128;
            let reward = base
                .checked_mul(centi)
                .ok_or_else(|| StakingError::Overflow("reward scaling".to_string()))?
                / 100;

            let pending = self.pending_rewards.entry(op.address.clone()).or_insert(0);
            *pending = pending
                .checked_add(reward)
                .ok_or_else(|| StakingError::Overflow("pending rewards".to_string()))?;
            self.total_rewards_accrued = self
                .total_rewards_accrued
                .checked_add(reward)
                .ok_or_else(|| StakingError::Overflow("accrued rewards".to_string()))?;
            payouts.push((op.address.clone(), reward));
        }
        log::info!(
            "distributed {} drops of rewards across {} oracles",
            pool_drops,
            payouts.len()
        );
        Ok(payouts)
    }

    /// Claims an operator's pending rewards, zeroing the balance.
    pub fn claim_rewards(&mut self, address: &Address) -> Result<u128, StakingError> {
        let pending = self.pending_rewards.get_mut(address);
        match pending {
            Some(amount) if *amount > 0 => {
                let claimed = *amount;
                *amount = 0;
                self.total_rewards_claimed = self
                    .total_rewards_claimed
                    .checked_add(claimed)
                    .ok_or_else(|| StakingError::Overflow("claimed rewards".to_string()))?;
                Ok(claimed)
            }
            _ => Err(StakingError::NothingToClaim(address.clone())),
        }
    }

    /// Pending rewards for an operator.
    pub fn pending_rewards(&self, address: &Address) -> u128 {
        self.pending_rewards.get(address).copied().unwrap_or(0)
    }

    /// The full append-only slash history.
    pub fn events(&self) -> &[SlashEvent] {
        &self.events
    }

    /// Audits bond conservation across the whole system:
    /// `deposits == current bonds + released + forfeited`.
    pub fn audit_conservation(&self, registry: &OracleRegistry) -> Result<(), StakingError> {
        let current: u128 = registry.operators().map(|op| op.bond_drops).sum();
        let accounted = current
            .checked_add(self.total_released)
            .and_then(|v| v.checked_add(self.total_forfeited))
            .ok_or_else(|| StakingError::Overflow("conservation sum".to_string()))?;
        if accounted != self.total_deposited {
            return Err(StakingError::ConservationViolation {
                deposited: self.total_deposited,
                accounted,
            });
        }
        Ok(())
    }

    fn current_bond(
        &self,
        registry: &OracleRegistry,
        address: &Address,
    ) -> Result<u128, StakingError> {
        registry
            .operator(address)
            .map(|op| op.bond_drops)
            .ok_or_else(|| StakingError::UnknownOperator(address.clone()))
    }

    /// Applies one slash: append the fact, debit the bond, move the drops
    /// to the treasury total, and auto-eject past the cumulative limit.
    fn apply(
        &mut self,
        registry: &mut OracleRegistry,
        address: &Address,
        slash_type: SlashType,
        amount: u128,
        proposal_id: Option<ProposalId>,
        now_ms: u64,
    ) -> Result<SlashEvent, StakingError> {
        registry
            .debit_bond(address, amount)
            .map_err(|_| StakingError::UnknownOperator(address.clone()))?;
        self.total_forfeited = self
            .total_forfeited
            .checked_add(amount)
            .ok_or_else(|| StakingError::Overflow("treasury total".to_string()))?;

        let event = SlashEvent {
            id: self.next_event_id,
            oracle: address.clone(),
            slash_type,
            amount_drops: amount,
            proposal_id,
            timestamp: now_ms,
            executed: true,
        };
        self.next_event_id += 1;
        self.events.push(event.clone());
        tracing::warn!(
            oracle = %address,
            kind = ?slash_type,
            amount,
            "slash executed"
        );

        // Past half the original bond in cumulative slashes, the operator
        // is ejected automatically.
        if let Some(op) = registry.operator(address) {
            if op.status != OperatorStatus::Ejected {
                let limit = rate(op.original_bond_drops, self.params.auto_eject_bps)?;
                if op.slashed_drops > limit {
                    log::warn!("oracle {} crossed the cumulative slash limit", address);
                    self.eject_to_treasury(registry, address)?;
                }
            }
        }

        Ok(event)
    }

    fn eject_to_treasury(
        &mut self,
        registry: &mut OracleRegistry,
        address: &Address,
    ) -> Result<(), StakingError> {
        let forfeited = registry
            .eject(address)
            .map_err(|_| StakingError::UnknownOperator(address.clone()))?;
        self.total_forfeited = self
            .total_forfeited
            .checked_add(forfeited)
            .ok_or_else(|| StakingError::Overflow("treasury total".to_string()))?;
        Ok(())
    }
}

/// Multiplies `amount` by a basis-point rate with checked arithmetic.
fn rate(amount: u128, bps: u32) -> Result<u128, StakingError> {
    amount
        .checked_mul(bps as u128)
        .map(|v| v / 10_000)
        .ok_or_else(|| StakingError::Overflow("rate".to_string()))
}

/// The epoch performance multiplier, in hundredths, clamped to
/// `[0.50, 1.50]`.
///
/// Participation below half floors the multiplier; above it the
/// multiplier scales linearly to 1.5, loses 0.05 per missed reveal, and
/// gains a 0.1 bonus for spotless (`fraud = 0`, `p >= 0.95`) epochs. An
/// epoch with no proposals is neutral.
fn performance_multiplier_centi(
    successful_reveals: u64,
    missed_reveals: u64,
    fraud_proofs: u64,
    proposals_in_epoch: u64,
) -> u32 {
    if proposals_in_epoch == 0 {
        return 100;
    }
    let p = successful_reveals as f64 / proposals_in_epoch as f64;
    let mut m = if p < 0.5 {
        0.5
    } else {
        0.5 + (p - 0.5) / 0.5 - 0.05 * missed_reveals as f64
    };
    if fraud_proofs == 0 && p >= 0.95 {
        m += 0.1;
    }
    m = m.clamp(0.5, 1.5);
    (m * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use accord_types::params::StakingParams;

    const BOND: u128 = 100_000_000_000;

    fn setup(n: usize) -> (OracleRegistry, SlashingLedger) {
        let mut registry = OracleRegistry::new(StakingParams::default(), 101);
        let mut ledger = SlashingLedger::new(StakingParams::default());
        for i in 0..n {
            let addr = Address::new(format!("r{}", i));
            registry.register(addr, BOND, i as u64, i as u64).unwrap();
            ledger.record_deposit(BOND).unwrap();
        }
        registry.start_new_epoch(1_000);
        (registry, ledger)
    }

    #[test]
    fn non_reveal_slashes_fifteen_percent() {
        let (mut registry, mut ledger) = setup(1);
        let addr = Address::new("r0");
        let event = ledger
            .slash_non_reveal(&mut registry, &addr, ProposalId([1; 32]), 5_000)
            .unwrap();
        assert_eq!(event.slash_type, SlashType::NonReveal);
        assert_eq!(event.amount_drops, BOND * 15 / 100);
        assert!(event.executed);
        assert_eq!(
            registry.operator(&addr).unwrap().bond_drops,
            BOND - BOND * 15 / 100
        );
        ledger.audit_conservation(&registry).unwrap();
    }

    #[test]
    fn inactivity_needs_threshold_and_fires_once_per_epoch() {
        let (mut registry, mut ledger) = setup(1);
        let addr = Address::new("r0");

        assert!(ledger
            .maybe_slash_inactivity(&mut registry, &addr, 5_000)
            .unwrap()
            .is_none());

        for _ in 0..3 {
            registry.record_participation(&addr, false).unwrap();
        }
        let first = ledger
            .maybe_slash_inactivity(&mut registry, &addr, 6_000)
            .unwrap();
        assert!(first.is_some());
        assert_eq!(first.unwrap().amount_drops, BOND * 5 / 100);

        // Cooldown: a second trigger in the same epoch does nothing.
        assert!(ledger
            .maybe_slash_inactivity(&mut registry, &addr, 7_000)
            .unwrap()
            .is_none());

        // Next epoch resets both the counter and the cooldown.
        registry.start_new_epoch(300_000);
        assert!(ledger
            .maybe_slash_inactivity(&mut registry, &addr, 8_000)
            .unwrap()
            .is_none());
        ledger.audit_conservation(&registry).unwrap();
    }

    #[test]
    fn fraud_slashes_everything_and_ejects() {
        let (mut registry, mut ledger) = setup(1);
        let addr = Address::new("r0");
        let event = ledger
            .slash_fraud(&mut registry, &addr, ProposalId([2; 32]), 5_000)
            .unwrap();
        assert_eq!(event.amount_drops, BOND);
        let op = registry.operator(&addr).unwrap();
        assert_eq!(op.status, OperatorStatus::Ejected);
        assert_eq!(op.bond_drops, 0);
        ledger.audit_conservation(&registry).unwrap();
    }

    #[test]
    fn repeated_slashes_auto_eject_past_half_bond() {
        let (mut registry, mut ledger) = setup(1);
        let addr = Address::new("r0");
        // 15% of the running bond each time; cumulative crosses 50% of the
        // original bond on the fifth slash.
        for i in 0..5u8 {
            let _ = ledger
                .slash_non_reveal(&mut registry, &addr, ProposalId([i; 32]), 5_000)
                .unwrap();
        }
        let op = registry.operator(&addr).unwrap();
        assert_eq!(op.status, OperatorStatus::Ejected);
        assert_eq!(op.bond_drops, 0);
        ledger.audit_conservation(&registry).unwrap();
    }

    #[test]
    fn slash_history_is_append_only_and_numbered() {
        let (mut registry, mut ledger) = setup(2);
        ledger
            .slash_non_reveal(&mut registry, &Address::new("r0"), ProposalId([1; 32]), 1)
            .unwrap();
        ledger
            .slash_non_reveal(&mut registry, &Address::new("r1"), ProposalId([1; 32]), 2)
            .unwrap();
        let ids: Vec<u64> = ledger.events().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert!(ledger.events().iter().all(|e| e.executed));
    }

    #[test]
    fn rewards_scale_with_stake_and_performance() {
        let mut registry = OracleRegistry::new(StakingParams::default(), 101);
        let mut ledger = SlashingLedger::new(StakingParams::default());
        registry.register(Address::new("rGood"), BOND * 3, 1, 0).unwrap();
        registry.register(Address::new("rPoor"), BOND, 2, 1).unwrap();
        ledger.record_deposit(BOND * 3).unwrap();
        ledger.record_deposit(BOND).unwrap();
        registry.start_new_epoch(1_000);

        // 10 proposals: rGood reveals all, rPoor reveals 2 and misses 8.
        for _ in 0..10 {
            registry.record_participation(&Address::new("rGood"), true).unwrap();
        }
        for i in 0..10 {
            registry
                .record_participation(&Address::new("rPoor"), i < 2)
                .unwrap();
        }

        let pool = 1_000_000u128;
        let payouts = ledger
            .distribute_epoch_rewards(&registry, pool, 10)
            .unwrap();
        let good = payouts.iter().find(|(a, _)| a == &Address::new("rGood")).unwrap().1;
        let poor = payouts.iter().find(|(a, _)| a == &Address::new("rPoor")).unwrap().1;

        // rGood: base 750_000, multiplier 1.5 + 0.1 bonus clamped to 1.5.
        assert_eq!(good, 750_000 * 150 / 100);
        // rPoor: base 250_000, multiplier floored at 0.5.
        assert_eq!(poor, 250_000 * 50 / 100);

        assert_eq!(ledger.pending_rewards(&Address::new("rGood")), good);
        assert_eq!(ledger.claim_rewards(&Address::new("rGood")).unwrap(), good);
        assert_eq!(ledger.pending_rewards(&Address::new("rGood")), 0);
        assert!(matches!(
            ledger.claim_rewards(&Address::new("rGood")),
            Err(StakingError::NothingToClaim(_))
        ));
    }

    #[test]
    fn multiplier_piecewise_shape() {
        // p < 0.5 floors at 0.50.
        assert_eq!(performance_multiplier_centi(4, 6, 0, 10), 50);
        // p = 0.7, no misses: 0.5 + 0.4 = 0.90.
        assert_eq!(performance_multiplier_centi(7, 0, 0, 10), 90);
        // p = 0.8 with 2 misses: 0.5 + 0.6 - 0.10 = 1.00.
        assert_eq!(performance_multiplier_centi(8, 2, 0, 10), 100);
        // Spotless epoch: 0.5 + 1.0 + 0.1 clamps to 1.50.
        assert_eq!(performance_multiplier_centi(10, 0, 0, 10), 150);
        // Fraud cancels the bonus.
        assert_eq!(performance_multiplier_centi(10, 0, 1, 10), 150);
        assert_eq!(performance_multiplier_centi(19, 1, 1, 20), 135);
        // No proposals: neutral.
        assert_eq!(performance_multiplier_centi(0, 0, 0, 0), 100);
    }

    #[test]
    fn unbond_release_keeps_conservation() {
        let (mut registry, mut ledger) = setup(1);
        let addr = Address::new("r0");
        registry.initiate_unbond(&addr, 10_000).unwrap();
        let record = registry
            .complete_unbond(&addr, 10_000 + StakingParams::default().epoch_duration_ms)
            .unwrap();
        ledger.record_release(record.bond_drops).unwrap();
        ledger.audit_conservation(&registry).unwrap();
    }
}
