// Path: crates/api/src/assessor.rs

//! The semantic-alignment assessor boundary (Channel B).
//!
//! The assessor is a black box: the kernel consumes its verdict as an
//! opaque tuple and never recomputes or replays it. An assessor returning
//! `ai_interest_conflict = true` forces Class IV routing regardless of its
//! other outputs; an assessor failure is absorbed into the conservative
//! fallback verdict by the orchestrator.

use accord_types::app::{ChannelBVerdict, Proposal};
use accord_types::error::AssessorError;
use async_trait::async_trait;

/// The external reasoning service producing Channel B verdicts.
#[async_trait]
pub trait SemanticAssessor: Send + Sync {
    /// Assesses a proposal's semantic alignment and decidability class.
    async fn analyze(&self, proposal: &Proposal) -> Result<ChannelBVerdict, AssessorError>;
}
