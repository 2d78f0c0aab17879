// Path: crates/types/src/error/mod.rs
//! Core error types for the Accord kernel.
//!
//! Four classes run through these enums: validation errors (bad caller
//! input, no state change), stale/out-of-phase errors (right message,
//! wrong time, no state change), invariant violations (kernel bugs,
//! surfaced synchronously and fatal to the hosting process), and external
//! failures (absorbed at the adapter boundary).

use crate::app::{Address, GovernancePhase, ProposalId};
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors from the verification engine and canonicalizer.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The `logic_ast` failed to parse as JSON, or contained a value with
    /// no canonical JSON representation. Fatal to verification; Channel A
    /// reports `pass = false` with zeroed sub-flags.
    #[error("Malformed AST: {0}")]
    MalformedAst(String),
}

impl ErrorCode for VerifyError {
    fn code(&self) -> &'static str {
        match self {
            Self::MalformedAst(_) => "VERIFY_MALFORMED_AST",
        }
    }
}

/// Errors from the commit–reveal consensus rounds.
#[derive(Error, Debug)]
pub enum ConsensusError {
    /// No round exists for the given proposal.
    #[error("No consensus round for proposal {0}")]
    UnknownRound(ProposalId),
    /// A round for this proposal already exists.
    #[error("Consensus round for proposal {0} already exists")]
    RoundAlreadyExists(ProposalId),
    /// A commitment arrived after the commit deadline or phase.
    #[error("Commit phase is closed for proposal {0}")]
    CommitPhaseClosed(ProposalId),
    /// The oracle already committed in this round.
    #[error("Oracle {0} already committed")]
    DuplicateCommitment(Address),
    /// A reveal arrived from an oracle with no commitment in this round.
    #[error("Oracle {0} has no matching commitment")]
    NoMatchingCommitment(Address),
    /// The reveal does not hash back to the oracle's commitment.
    #[error("Reveal from oracle {0} does not match its commitment hash")]
    CommitmentMismatch(Address),
    /// A reveal arrived after the reveal deadline or phase.
    #[error("Reveal phase is closed for proposal {0}")]
    RevealPhaseClosed(ProposalId),
    /// The oracle already revealed in this round.
    #[error("Oracle {0} already revealed")]
    DuplicateReveal(Address),
    /// Aggregation was requested before both deadlines elapsed.
    #[error("Round for proposal {0} is not ready to tally")]
    NotReadyToTally(ProposalId),
    /// The round already aggregated; its output is immutable.
    #[error("Round for proposal {0} is already complete")]
    AlreadyComplete(ProposalId),
    /// The revealed verdict could not be canonically encoded for the hash
    /// check.
    #[error("Reveal encoding failed: {0}")]
    RevealEncoding(String),
}

impl ErrorCode for ConsensusError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownRound(_) => "CONSENSUS_UNKNOWN_ROUND",
            Self::RoundAlreadyExists(_) => "CONSENSUS_ROUND_EXISTS",
            Self::CommitPhaseClosed(_) => "CONSENSUS_COMMIT_CLOSED",
            Self::DuplicateCommitment(_) => "CONSENSUS_DUPLICATE_COMMIT",
            Self::NoMatchingCommitment(_) => "CONSENSUS_NO_COMMITMENT",
            Self::CommitmentMismatch(_) => "CONSENSUS_COMMITMENT_MISMATCH",
            Self::RevealPhaseClosed(_) => "CONSENSUS_REVEAL_CLOSED",
            Self::DuplicateReveal(_) => "CONSENSUS_DUPLICATE_REVEAL",
            Self::NotReadyToTally(_) => "CONSENSUS_NOT_READY",
            Self::AlreadyComplete(_) => "CONSENSUS_ALREADY_COMPLETE",
            Self::RevealEncoding(_) => "CONSENSUS_REVEAL_ENCODING",
        }
    }
}

/// Errors from the oracle registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The address already holds a live registration.
    #[error("Operator {0} is already registered")]
    AlreadyRegistered(Address),
    /// The offered bond is below the protocol minimum.
    #[error("Bond {got} drops is below the {required} drop minimum")]
    BondBelowMinimum {
        /// The offered bond.
        got: u128,
        /// The protocol minimum.
        required: u128,
    },
    /// No operator record exists for the address.
    #[error("Unknown operator {0}")]
    UnknownOperator(Address),
    /// The address was ejected and can never re-register.
    #[error("Address {0} was ejected and cannot re-register")]
    AddressEjected(Address),
    /// `complete_unbond` on an operator that never initiated unbonding.
    #[error("Operator {0} is not unbonding")]
    NotUnbonding(Address),
    /// The unbonding period has not elapsed yet.
    #[error("Unbonding period still active; {remaining_ms} ms remain")]
    UnbondingPeriodActive {
        /// Milliseconds until `complete_unbond` becomes valid.
        remaining_ms: u64,
    },
    /// The operation requires a status the operator does not hold.
    #[error("Operator {address} has status {status}, expected {expected}")]
    InvalidStatus {
        /// The operator.
        address: Address,
        /// The status found.
        status: String,
        /// The status required.
        expected: String,
    },
}

impl ErrorCode for RegistryError {
    fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered(_) => "REGISTRY_ALREADY_REGISTERED",
            Self::BondBelowMinimum { .. } => "REGISTRY_BOND_BELOW_MINIMUM",
            Self::UnknownOperator(_) => "REGISTRY_UNKNOWN_OPERATOR",
            Self::AddressEjected(_) => "REGISTRY_ADDRESS_EJECTED",
            Self::NotUnbonding(_) => "REGISTRY_NOT_UNBONDING",
            Self::UnbondingPeriodActive { .. } => "REGISTRY_UNBONDING_ACTIVE",
            Self::InvalidStatus { .. } => "REGISTRY_INVALID_STATUS",
        }
    }
}

/// Errors from the staking and slashing ledger.
#[derive(Error, Debug)]
pub enum StakingError {
    /// No ledger account exists for the address.
    #[error("Unknown operator {0} in staking ledger")]
    UnknownOperator(Address),
    /// Bond arithmetic overflowed. This is an invariant violation: the
    /// process must halt and surface the diagnostic.
    #[error("Bond arithmetic overflow: {0}")]
    Overflow(String),
    /// The conservation audit found drops created or destroyed. Invariant
    /// violation.
    #[error("Bond conservation violated: deposits {deposited} != accounted {accounted}")]
    ConservationViolation {
        /// Total drops ever deposited.
        deposited: u128,
        /// Total drops accounted for across bonds, slashes, releases, and
        /// pending rewards.
        accounted: u128,
    },
    /// A claim was made with no pending rewards.
    #[error("Operator {0} has no pending rewards")]
    NothingToClaim(Address),
}

impl ErrorCode for StakingError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownOperator(_) => "STAKING_UNKNOWN_OPERATOR",
            Self::Overflow(_) => "STAKING_OVERFLOW",
            Self::ConservationViolation { .. } => "STAKING_CONSERVATION_VIOLATION",
            Self::NothingToClaim(_) => "STAKING_NOTHING_TO_CLAIM",
        }
    }
}

/// Errors from the voting system.
#[derive(Error, Debug)]
pub enum VotingError {
    /// A period is already open for the proposal.
    #[error("Voting period already open for proposal {0}")]
    PeriodAlreadyOpen(ProposalId),
    /// No open period exists for the proposal.
    #[error("No open voting period for proposal {0}")]
    PeriodNotOpen(ProposalId),
    /// The voter already cast in this period.
    #[error("Account {0} already voted")]
    AlreadyVoted(Address),
    /// Delegating to oneself is rejected.
    #[error("Account {0} cannot delegate to itself")]
    SelfDelegation(Address),
    /// `undelegate` on a delegation that does not exist.
    #[error("No delegation from {from} to {to}")]
    DelegationNotFound {
        /// The purported delegator.
        from: Address,
        /// The purported delegate.
        to: Address,
    },
    /// Vote power arithmetic overflowed. Invariant violation.
    #[error("Vote power overflow")]
    PowerOverflow,
}

impl ErrorCode for VotingError {
    fn code(&self) -> &'static str {
        match self {
            Self::PeriodAlreadyOpen(_) => "VOTING_PERIOD_ALREADY_OPEN",
            Self::PeriodNotOpen(_) => "VOTING_PERIOD_NOT_OPEN",
            Self::AlreadyVoted(_) => "VOTING_ALREADY_VOTED",
            Self::SelfDelegation(_) => "VOTING_SELF_DELEGATION",
            Self::DelegationNotFound { .. } => "VOTING_DELEGATION_NOT_FOUND",
            Self::PowerOverflow => "VOTING_POWER_OVERFLOW",
        }
    }
}

/// Errors from jury selection and deliberation.
#[derive(Error, Debug)]
pub enum JuryError {
    /// Fewer eligible accounts than the panel size.
    #[error("Insufficient eligible accounts: need {required}, found {got}")]
    InsufficientEligible {
        /// The panel size.
        required: usize,
        /// Eligible accounts found.
        got: usize,
    },
    /// No panel exists for the proposal.
    #[error("No jury panel for proposal {0}")]
    PanelNotFound(ProposalId),
    /// The account is not on the panel.
    #[error("Account {0} is not an empanelled juror")]
    NotEmpanelled(Address),
    /// The juror already voted.
    #[error("Juror {0} already voted")]
    AlreadyVoted(Address),
    /// The 72-hour deliberation window has closed.
    #[error("Deliberation window for proposal {0} has expired")]
    DeliberationExpired(ProposalId),
}

impl ErrorCode for JuryError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientEligible { .. } => "JURY_INSUFFICIENT_ELIGIBLE",
            Self::PanelNotFound(_) => "JURY_PANEL_NOT_FOUND",
            Self::NotEmpanelled(_) => "JURY_NOT_EMPANELLED",
            Self::AlreadyVoted(_) => "JURY_ALREADY_VOTED",
            Self::DeliberationExpired(_) => "JURY_DELIBERATION_EXPIRED",
        }
    }
}

/// Errors from the ledger substrate adapter.
#[derive(Error, Debug)]
pub enum SubstrateError {
    /// A memo submission failed; the protocol continues on local state.
    #[error("Memo submission failed: {0}")]
    Submission(String),
    /// The substrate is unreachable.
    #[error("Substrate unavailable: {0}")]
    Unavailable(String),
    /// An escrow operation referenced an unknown sequence.
    #[error("Unknown escrow sequence {0}")]
    UnknownEscrow(u64),
}

impl ErrorCode for SubstrateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Submission(_) => "SUBSTRATE_SUBMISSION_FAILED",
            Self::Unavailable(_) => "SUBSTRATE_UNAVAILABLE",
            Self::UnknownEscrow(_) => "SUBSTRATE_UNKNOWN_ESCROW",
        }
    }
}

/// Errors from the semantic assessor adapter. All variants are absorbed
/// into the conservative fallback verdict by the orchestrator.
#[derive(Error, Debug)]
pub enum AssessorError {
    /// The assessor is unreachable.
    #[error("Assessor unavailable: {0}")]
    Unavailable(String),
    /// The assessor did not answer within the host's deadline.
    #[error("Assessor timed out")]
    Timeout,
    /// The assessor answered with an unparseable verdict.
    #[error("Malformed assessor verdict: {0}")]
    Malformed(String),
}

impl ErrorCode for AssessorError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "ASSESSOR_UNAVAILABLE",
            Self::Timeout => "ASSESSOR_TIMEOUT",
            Self::Malformed(_) => "ASSESSOR_MALFORMED",
        }
    }
}

/// Errors from the governance orchestrator. Wraps the subsystem errors so
/// orchestrator operations propagate with `?`.
#[derive(Error, Debug)]
pub enum GovernanceError {
    /// No proposal with the given id exists.
    #[error("Proposal {0} not found")]
    UnknownProposal(ProposalId),
    /// A proposal with the same canonical identity already exists.
    #[error("Proposal {0} already submitted")]
    DuplicateProposal(ProposalId),
    /// The requested operation is not valid in the proposal's phase. State
    /// is untouched.
    #[error("Operation '{operation}' invalid in phase {phase}")]
    InvalidTransition {
        /// The proposal's current phase.
        phase: GovernancePhase,
        /// The operation that was attempted.
        operation: String,
    },
    /// An error originating from the consensus module.
    #[error("Consensus error: {0}")]
    Consensus(#[from] ConsensusError),
    /// An error originating from the voting system.
    #[error("Voting error: {0}")]
    Voting(#[from] VotingError),
    /// An error originating from the jury.
    #[error("Jury error: {0}")]
    Jury(#[from] JuryError),
    /// An error originating from the registry.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    /// An error originating from the staking ledger.
    #[error("Staking error: {0}")]
    Staking(#[from] StakingError),
    /// An error originating from verification.
    #[error("Verification error: {0}")]
    Verify(#[from] VerifyError),
}

impl ErrorCode for GovernanceError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownProposal(_) => "GOVERNANCE_UNKNOWN_PROPOSAL",
            Self::DuplicateProposal(_) => "GOVERNANCE_DUPLICATE_PROPOSAL",
            Self::InvalidTransition { .. } => "GOVERNANCE_INVALID_TRANSITION",
            Self::Consensus(e) => e.code(),
            Self::Voting(e) => e.code(),
            Self::Jury(e) => e.code(),
            Self::Registry(e) => e.code(),
            Self::Staking(e) => e.code(),
            Self::Verify(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_distinct() {
        let a = RegistryError::AlreadyRegistered(Address::new("rA"));
        let b = RegistryError::UnknownOperator(Address::new("rA"));
        assert_eq!(a.code(), "REGISTRY_ALREADY_REGISTERED");
        assert_ne!(a.code(), b.code());
    }

    #[test]
    fn governance_error_inherits_inner_code() {
        let inner = ConsensusError::UnknownRound(ProposalId([0; 32]));
        let code = inner.code();
        let outer: GovernanceError = inner.into();
        assert_eq!(outer.code(), code);
    }
}
