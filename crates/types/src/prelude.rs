// Path: crates/types/src/prelude.rs
//! A curated set of the most commonly used types.

pub use crate::app::{
    Address, AggregatedVerdict, CanonicalPayload, ChannelAVerdict, ChannelBVerdict, Commitment,
    DecidabilityClass, Epoch, FrictionParams, GovernancePhase, GovernanceProposal, Hash32,
    JuryOutcome, JuryVerdict, Layer, LifecycleEvent, OperatorMetrics, OperatorStatus,
    OracleOperator, OracleVerdict, Proposal, ProposalId, Reveal, Route, RoutingOutcome,
    RoundPhase, SlashEvent, SlashType, VoteChoice, VotingTally,
};
pub use crate::error::{
    AssessorError, ConsensusError, ErrorCode, GovernanceError, JuryError, RegistryError,
    StakingError, SubstrateError, VerifyError, VotingError,
};
pub use crate::params::{
    ConsensusParams, JuryParams, RoutingParams, StakingParams, VerificationParams,
};
