// Path: crates/services/src/jury.rs

//! VRF-weighted jury sampling and supermajority resolution.
//!
//! Panels are sampled deterministically: the seed is
//! `sha256(proposal_id ++ ledger_hash)` and drives a ChaCha20 stream, so
//! any party holding the same eligible list reproduces the same panel.
//! Weights are `sqrt(balance)`, favoring breadth over plutocracy. The
//! human-majority variant excludes identified AI accounts from the pool.

use accord_types::app::{Address, Hash32, JuryVerdict, ProposalId, VoteChoice};
use accord_types::codec;
use accord_types::error::JuryError;
use accord_types::params::JuryParams;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeMap;

/// An account eligible for jury duty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleAccount {
    /// The account address.
    pub address: Address,
    /// Token balance; the sampling weight is its square root.
    pub balance: u128,
    /// Last activity wall-clock time (ms).
    pub last_active: u64,
    /// Whether the account is an identified AI; excluded from
    /// human-majority panels.
    pub is_ai: bool,
}

#[derive(Debug)]
struct JuryPanel {
    members: Vec<Address>,
    votes: BTreeMap<Address, VoteChoice>,
    opened_at_ms: u64,
    verdict: Option<JuryVerdict>,
}

/// The jury subsystem: panels keyed by proposal id.
#[derive(Debug)]
pub struct JurySystem {
    params: JuryParams,
    panels: BTreeMap<ProposalId, JuryPanel>,
}

impl JurySystem {
    /// Creates an empty jury subsystem.
    pub fn new(params: JuryParams) -> Self {
        Self {
            params,
            panels: BTreeMap::new(),
        }
    }

    /// Samples a panel for a proposal and opens its deliberation window.
    ///
    /// `human_only` selects the Class IV variant. Fails when fewer
    /// eligible accounts remain than the panel size after filtering.
    pub fn select_panel(
        &mut self,
        proposal_id: ProposalId,
        ledger_hash: Hash32,
        eligibles: &[EligibleAccount],
        now_ms: u64,
        human_only: bool,
    ) -> Result<Vec<Address>, JuryError> {
        let window_start = now_ms.saturating_sub(self.params.eligibility_window_ms);
        let mut pool: Vec<&EligibleAccount> = eligibles
            .iter()
            .filter(|e| e.last_active >= window_start)
            .filter(|e| !human_only || !e.is_ai)
            .collect();
        if pool.len() < self.params.size {
            return Err(JuryError::InsufficientEligible {
                required: self.params.size,
                got: pool.len(),
            });
        }
        // Canonical pool order: reproducibility must not depend on the
        // caller's list ordering.
        pool.sort_by(|a, b| a.address.cmp(&b.address));

        let mut seed_material = Vec::with_capacity(64);
        seed_material.extend_from_slice(&proposal_id.0);
        seed_material.extend_from_slice(&ledger_hash.0);
        let mut rng = ChaCha20Rng::from_seed(codec::sha256(&seed_material));

        let members = sample_weighted(&mut rng, &mut pool, self.params.size);
        self.panels.insert(
            proposal_id,
            JuryPanel {
                members: members.clone(),
                votes: BTreeMap::new(),
                opened_at_ms: now_ms,
                verdict: None,
            },
        );
        log::info!(
            "selected {} jurors for {} (human_only {})",
            members.len(),
            proposal_id,
            human_only
        );
        Ok(members)
    }

    /// Records a juror's vote within the deliberation window.
    pub fn cast_vote(
        &mut self,
        proposal_id: ProposalId,
        juror: Address,
        choice: VoteChoice,
        now_ms: u64,
    ) -> Result<(), JuryError> {
        let deadline_ms = self.params.voting_period_s * 1_000;
        let panel = self
            .panels
            .get_mut(&proposal_id)
            .ok_or(JuryError::PanelNotFound(proposal_id))?;
        if now_ms > panel.opened_at_ms.saturating_add(deadline_ms) {
            return Err(JuryError::DeliberationExpired(proposal_id));
        }
        if !panel.members.contains(&juror) {
            return Err(JuryError::NotEmpanelled(juror));
        }
        if panel.votes.contains_key(&juror) {
            return Err(JuryError::AlreadyVoted(juror));
        }
        panel.votes.insert(juror, choice);
        Ok(())
    }

    /// Resolves the panel once every juror voted or the window expired;
    /// returns `None` while deliberation is still open. The verdict is
    /// stored and repeat calls return it unchanged.
    pub fn try_resolve(
        &mut self,
        proposal_id: ProposalId,
        now_ms: u64,
    ) -> Result<Option<JuryVerdict>, JuryError> {
        let supermajority_num = self.params.supermajority_numerator as u64;
        let supermajority_den = self.params.supermajority_denominator as u64;
        let deadline_ms = self.params.voting_period_s * 1_000;

        let panel = self
            .panels
            .get_mut(&proposal_id)
            .ok_or(JuryError::PanelNotFound(proposal_id))?;
        if let Some(done) = panel.verdict {
            return Ok(Some(done));
        }

        let expired = now_ms > panel.opened_at_ms.saturating_add(deadline_ms);
        let complete = panel.votes.len() == panel.members.len();
        if !expired && !complete {
            return Ok(None);
        }

        let yes = panel.votes.values().filter(|v| **v == VoteChoice::Yes).count() as u64;
        let no = panel.votes.values().filter(|v| **v == VoteChoice::No).count() as u64;
        let decided = yes + no;
        let verdict = if decided == 0 {
            JuryVerdict::NoVerdict
        } else {
            let threshold = (decided * supermajority_num).div_ceil(supermajority_den);
            if yes >= threshold {
                JuryVerdict::Approved
            } else if no >= threshold {
                JuryVerdict::Rejected
            } else {
                JuryVerdict::NoVerdict
            }
        };
        panel.verdict = Some(verdict);
        log::info!(
            "jury for {} resolved {:?} (yes {}, no {}, abstain {})",
            proposal_id,
            verdict,
            yes,
            no,
            panel.votes.len() as u64 - decided
        );
        Ok(Some(verdict))
    }

    /// The panel members, if a panel exists.
    pub fn panel(&self, proposal_id: &ProposalId) -> Option<&[Address]> {
        self.panels.get(proposal_id).map(|p| p.members.as_slice())
    }
}

/// Seeded weighted sampling without replacement: `count` distinct members,
/// each drawn with probability proportional to `sqrt(balance)` among the
/// remaining pool.
#[allow(clippy::indexing_slicing)]
fn sample_weighted(
    rng: &mut ChaCha20Rng,
    pool: &mut Vec<&EligibleAccount>,
    count: usize,
) -> Vec<Address> {
    let mut members = Vec::with_capacity(count);
    while members.len() < count && !pool.is_empty() {
        let weights: Vec<f64> = pool.iter().map(|e| (e.balance as f64).sqrt()).collect();
        let total: f64 = weights.iter().sum();
        let picked = if total <= 0.0 {
            // Degenerate pool of zero balances: fall back to uniform.
            rng.gen_range(0..pool.len())
        } else {
            let mut point = rng.gen_range(0.0..total);
            let mut chosen = pool.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if point < *w {
                    chosen = i;
                    break;
                }
                point -= w;
            }
            chosen
        };
        members.push(pool.swap_remove(picked).address.clone());
    }
    members
}
