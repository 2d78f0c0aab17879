// Path: crates/services/src/registry.rs

//! The oracle registry: operator records, active-set selection, and epoch
//! rotation.
//!
//! The registry exclusively owns `OracleOperator` records. The slashing
//! ledger is the only other writer, and it mutates bonds through the
//! transactional methods here; the `status` field is the single source of
//! truth the two components coordinate on.

use accord_types::app::{
    Address, Epoch, OperatorMetrics, OperatorStatus, OracleOperator,
};
use accord_types::error::RegistryError;
use accord_types::params::StakingParams;
use std::collections::BTreeMap;

/// The registry of bonded oracle operators.
#[derive(Debug)]
pub struct OracleRegistry {
    params: StakingParams,
    active_set_size: usize,
    operators: BTreeMap<Address, OracleOperator>,
    epoch: Epoch,
}

impl OracleRegistry {
    /// Creates an empty registry at epoch zero.
    pub fn new(params: StakingParams, active_set_size: usize) -> Self {
        let epoch = Epoch {
            number: 0,
            start_ledger: 0,
            end_ledger: params.epoch_ledgers.saturating_sub(1),
            active_set: Vec::new(),
        };
        Self {
            params,
            active_set_size,
            operators: BTreeMap::new(),
            epoch,
        }
    }

    /// Registers a new operator with its bond and the substrate escrow
    /// sequence locking it. Ejected addresses can never come back.
    pub fn register(
        &mut self,
        address: Address,
        bond_drops: u128,
        escrow_seq: u64,
        now_ms: u64,
    ) -> Result<(), RegistryError> {
        if bond_drops < self.params.oracle_bond_drops {
            return Err(RegistryError::BondBelowMinimum {
                got: bond_drops,
                required: self.params.oracle_bond_drops,
            });
        }
        if let Some(existing) = self.operators.get(&address) {
            if existing.status == OperatorStatus::Ejected {
                return Err(RegistryError::AddressEjected(address));
            }
            return Err(RegistryError::AlreadyRegistered(address));
        }

        log::info!("registered oracle {} with {} drops", address, bond_drops);
        self.operators.insert(
            address.clone(),
            OracleOperator {
                address,
                bond_drops,
                original_bond_drops: bond_drops,
                slashed_drops: 0,
                escrow_seq,
                status: OperatorStatus::Candidate,
                metrics: OperatorMetrics::default(),
                registered_at: now_ms,
                unbonding_at: None,
            },
        );
        Ok(())
    }

    /// Begins an operator's exit: status moves to `Unbonding` and the
    /// operator leaves the active set immediately.
    pub fn initiate_unbond(&mut self, address: &Address, now_ms: u64) -> Result<(), RegistryError> {
        let op = self
            .operators
            .get_mut(address)
            .ok_or_else(|| RegistryError::UnknownOperator(address.clone()))?;
        match op.status {
            OperatorStatus::Candidate | OperatorStatus::Active => {}
            other => {
                return Err(RegistryError::InvalidStatus {
                    address: address.clone(),
                    status: format!("{:?}", other),
                    expected: "Candidate or Active".to_string(),
                })
            }
        }
        op.status = OperatorStatus::Unbonding;
        op.unbonding_at = Some(now_ms);
        self.epoch.active_set.retain(|a| a != address);
        Ok(())
    }

    /// Completes an exit once a full epoch has elapsed, removing the
    /// record. Returns it so the caller can release the escrow and settle
    /// the ledger accounting.
    pub fn complete_unbond(
        &mut self,
        address: &Address,
        now_ms: u64,
    ) -> Result<OracleOperator, RegistryError> {
        let op = self
            .operators
            .get(address)
            .ok_or_else(|| RegistryError::UnknownOperator(address.clone()))?;
        if op.status != OperatorStatus::Unbonding {
            return Err(RegistryError::NotUnbonding(address.clone()));
        }
        let since = op.unbonding_at.unwrap_or(now_ms);
        let elapsed = now_ms.saturating_sub(since);
        if elapsed < self.params.epoch_duration_ms {
            return Err(RegistryError::UnbondingPeriodActive {
                remaining_ms: self.params.epoch_duration_ms - elapsed,
            });
        }
        // The map was checked above; remove cannot miss.
        self.operators
            .remove(address)
            .ok_or_else(|| RegistryError::UnknownOperator(address.clone()))
    }

    /// Records a round participation: committed, and either revealed or
    /// missed.
    pub fn record_participation(
        &mut self,
        address: &Address,
        revealed: bool,
    ) -> Result<(), RegistryError> {
        let epoch_number = self.epoch.number;
        let op = self
            .operators
            .get_mut(address)
            .ok_or_else(|| RegistryError::UnknownOperator(address.clone()))?;
        op.metrics.total_participations += 1;
        if revealed {
            op.metrics.successful_reveals += 1;
        } else {
            op.metrics.missed_reveals += 1;
            op.metrics.lifetime_missed_reveals += 1;
        }
        op.metrics.last_active_epoch = epoch_number;
        Ok(())
    }

    /// Records a proven fraud event against the operator's metrics.
    pub fn record_fraud(&mut self, address: &Address) -> Result<(), RegistryError> {
        let op = self
            .operators
            .get_mut(address)
            .ok_or_else(|| RegistryError::UnknownOperator(address.clone()))?;
        op.metrics.fraud_proofs += 1;
        Ok(())
    }

    /// Permanently ejects an operator: the bond zeroes and the address is
    /// dead forever. Returns the forfeited drops for treasury accounting.
    pub fn eject(&mut self, address: &Address) -> Result<u128, RegistryError> {
        let op = self
            .operators
            .get_mut(address)
            .ok_or_else(|| RegistryError::UnknownOperator(address.clone()))?;
        let forfeited = op.bond_drops;
        op.bond_drops = 0;
        op.status = OperatorStatus::Ejected;
        op.unbonding_at = None;
        self.epoch.active_set.retain(|a| a != address);
        log::warn!("ejected oracle {}, forfeiting {} drops", address, forfeited);
        Ok(forfeited)
    }

    /// Debits `amount` drops from an operator's bond, accumulating the
    /// slashed total. Only the slashing ledger calls this.
    pub fn debit_bond(&mut self, address: &Address, amount: u128) -> Result<u128, RegistryError> {
        let op = self
            .operators
            .get_mut(address)
            .ok_or_else(|| RegistryError::UnknownOperator(address.clone()))?;
        op.bond_drops = op.bond_drops.saturating_sub(amount);
        op.slashed_drops = op.slashed_drops.saturating_add(amount);
        Ok(op.bond_drops)
    }

    /// Rotates the epoch: operators in `{Candidate, Active}` are ranked by
    /// bond descending (ties by registration time ascending), the first
    /// `active_set_size` become the active set, and per-epoch metrics
    /// reset. Unbonding and ejected operators are excluded.
    pub fn start_new_epoch(&mut self, start_ledger: u64) -> Epoch {
        let mut ranked: Vec<(&Address, u128, u64)> = self
            .operators
            .values()
            .filter(|op| {
                matches!(op.status, OperatorStatus::Candidate | OperatorStatus::Active)
            })
            .map(|op| (&op.address, op.bond_drops, op.registered_at))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let selected: Vec<Address> = ranked
            .into_iter()
            .take(self.active_set_size)
            .map(|(addr, _, _)| addr.clone())
            .collect();

        for op in self.operators.values_mut() {
            match op.status {
                OperatorStatus::Candidate | OperatorStatus::Active => {
                    op.status = if selected.contains(&op.address) {
                        OperatorStatus::Active
                    } else {
                        OperatorStatus::Candidate
                    };
                    // Participation counters are per-epoch.
                    op.metrics.successful_reveals = 0;
                    op.metrics.missed_reveals = 0;
                }
                _ => {}
            }
        }

        self.epoch = Epoch {
            number: self.epoch.number + 1,
            start_ledger,
            end_ledger: start_ledger
                .saturating_add(self.params.epoch_ledgers)
                .saturating_sub(1),
            active_set: selected,
        };
        log::info!(
            "epoch {} started with {} active oracles",
            self.epoch.number,
            self.epoch.active_set.len()
        );
        self.epoch.clone()
    }

    /// The current epoch.
    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    /// Read access to one operator.
    pub fn operator(&self, address: &Address) -> Option<&OracleOperator> {
        self.operators.get(address)
    }

    /// Iterates all operator records.
    pub fn operators(&self) -> impl Iterator<Item = &OracleOperator> {
        self.operators.values()
    }

    /// Whether the address is in the current active set.
    pub fn is_active(&self, address: &Address) -> bool {
        self.epoch.active_set.iter().any(|a| a == address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOND: u128 = 100_000_000_000;

    fn registry(active: usize) -> OracleRegistry {
        OracleRegistry::new(StakingParams::default(), active)
    }

    #[test]
    fn register_enforces_minimum_bond() {
        let mut reg = registry(101);
        let err = reg.register(Address::new("rA"), BOND - 1, 1, 0);
        assert!(matches!(err, Err(RegistryError::BondBelowMinimum { .. })));
        reg.register(Address::new("rA"), BOND, 1, 0).unwrap();
        assert!(matches!(
            reg.register(Address::new("rA"), BOND, 2, 1),
            Err(RegistryError::AlreadyRegistered(_))
        ));
    }

    #[test]
    fn active_set_ranks_by_bond_then_age() {
        let mut reg = registry(2);
        reg.register(Address::new("rSmall"), BOND, 1, 10).unwrap();
        reg.register(Address::new("rBig"), BOND * 3, 2, 20).unwrap();
        reg.register(Address::new("rOldTie"), BOND, 3, 5).unwrap();
        let epoch = reg.start_new_epoch(1000);
        // rBig first; tie between rSmall and rOldTie goes to the earlier
        // registration.
        assert_eq!(
            epoch.active_set,
            vec![Address::new("rBig"), Address::new("rOldTie")]
        );
        assert_eq!(
            reg.operator(&Address::new("rSmall")).unwrap().status,
            OperatorStatus::Candidate
        );
        assert!(reg.is_active(&Address::new("rBig")));
    }

    #[test]
    fn active_set_never_exceeds_bound() {
        let mut reg = registry(101);
        for i in 0..150 {
            reg.register(Address::new(format!("r{}", i)), BOND + i as u128, i, i as u64)
                .unwrap();
        }
        let epoch = reg.start_new_epoch(1000);
        assert_eq!(epoch.active_set.len(), 101);
    }

    #[test]
    fn unbonding_excludes_from_selection_and_gates_completion() {
        let mut reg = registry(101);
        reg.register(Address::new("rA"), BOND, 1, 0).unwrap();
        reg.start_new_epoch(1000);
        assert!(reg.is_active(&Address::new("rA")));

        reg.initiate_unbond(&Address::new("rA"), 50_000).unwrap();
        assert!(!reg.is_active(&Address::new("rA")));

        let err = reg.complete_unbond(&Address::new("rA"), 60_000);
        assert!(matches!(err, Err(RegistryError::UnbondingPeriodActive { .. })));

        let done = reg
            .complete_unbond(
                &Address::new("rA"),
                50_000 + StakingParams::default().epoch_duration_ms,
            )
            .unwrap();
        assert_eq!(done.bond_drops, BOND);
        assert!(reg.operator(&Address::new("rA")).is_none());
    }

    #[test]
    fn ejected_addresses_cannot_return() {
        let mut reg = registry(101);
        reg.register(Address::new("rA"), BOND, 1, 0).unwrap();
        let forfeited = reg.eject(&Address::new("rA")).unwrap();
        assert_eq!(forfeited, BOND);
        let op = reg.operator(&Address::new("rA")).unwrap();
        assert_eq!(op.status, OperatorStatus::Ejected);
        assert_eq!(op.bond_drops, 0);
        assert!(matches!(
            reg.register(Address::new("rA"), BOND, 2, 1),
            Err(RegistryError::AddressEjected(_))
        ));
        assert!(matches!(
            reg.initiate_unbond(&Address::new("rA"), 2),
            Err(RegistryError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn epoch_rotation_resets_per_epoch_metrics_only() {
        let mut reg = registry(101);
        reg.register(Address::new("rA"), BOND, 1, 0).unwrap();
        reg.record_participation(&Address::new("rA"), true).unwrap();
        reg.record_participation(&Address::new("rA"), false).unwrap();

        let before = reg.operator(&Address::new("rA")).unwrap().metrics.clone();
        assert_eq!(before.successful_reveals, 1);
        assert_eq!(before.missed_reveals, 1);

        reg.start_new_epoch(1000);
        let after = reg.operator(&Address::new("rA")).unwrap().metrics.clone();
        assert_eq!(after.successful_reveals, 0);
        assert_eq!(after.missed_reveals, 0);
        assert_eq!(after.lifetime_missed_reveals, 1);
        assert_eq!(after.total_participations, 2);
    }
}
