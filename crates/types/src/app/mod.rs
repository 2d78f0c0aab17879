// Path: crates/types/src/app/mod.rs

//! Core application-level data structures for the Accord kernel.
//!
//! The submodules mirror the ownership boundaries of the system: proposal
//! inputs here, verdicts in [`verdict`], operator records in [`oracle`],
//! slash accounting in [`penalties`], the orchestrator envelope in
//! [`governance`], lifecycle notifications in [`events`], and the
//! bit-stable ledger memo payloads in [`memo`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable lifecycle notifications emitted by the orchestrator.
pub mod events;
/// The orchestrator's proposal envelope and its phase machine vocabulary.
pub mod governance;
/// Bit-stable payload formats for outbound ledger memos.
pub mod memo;
/// Oracle operator records, epochs, and the commit–reveal message types.
pub mod oracle;
/// Append-only slash events and their classification.
pub mod penalties;
/// Channel A / Channel B verdict records, friction, and routing outcomes.
pub mod verdict;

pub use events::LifecycleEvent;
pub use governance::{GovernancePhase, GovernanceProposal, JuryOutcome, JuryVerdict, VoteChoice, VotingTally};
pub use oracle::{
    Commitment, Epoch, OperatorMetrics, OperatorStatus, OracleOperator, Reveal, RoundPhase,
};
pub use penalties::{SlashEvent, SlashType};
pub use verdict::{
    AggregatedVerdict, ChannelAVerdict, ChannelBVerdict, DecidabilityClass, EpistemicFlag,
    FrictionParams, OracleVerdict, Route, RoutingOutcome,
};

/// An opaque account identifier on the ledger substrate.
///
/// Addresses are carried verbatim as handed in by the substrate; the kernel
/// never derives or validates them beyond equality.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates an address from any string-like value.
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    /// Returns the address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A 256-bit identifier derived from the canonical payload hash.
///
/// Rendered as 64 lowercase hex characters everywhere it crosses a
/// serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProposalId(pub [u8; 32]);

impl ProposalId {
    /// Parses an id from its 64-character lowercase hex rendering.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let bytes = hex::decode(s).map_err(|e| format!("invalid proposal id hex: {}", e))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| format!("invalid proposal id length: {}", v.len()))?;
        Ok(Self(arr))
    }

    /// Renders the id as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ProposalId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ProposalId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A 32-byte hash or nonce, hex-rendered at serialization boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// Parses a value from its 64-character lowercase hex rendering.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let bytes = hex::decode(s).map_err(|e| format!("invalid hash hex: {}", e))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| format!("invalid hash length: {}", v.len()))?;
        Ok(Self(arr))
    }

    /// Renders the value as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Hash32 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// The four immutability-ordered governance layers.
///
/// Higher layers can only be modified through stricter procedures; `L0` not
/// at all.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// The immutable constitutional bedrock. Proposals against it are rejected.
    #[serde(rename = "L0-Immutable")]
    L0Immutable,
    /// Constitutional rules, amendable under supermajority procedures.
    #[serde(rename = "L1-Constitutional")]
    L1Constitutional,
    /// Operational policy, the default governance surface.
    #[serde(rename = "L2-Operational")]
    L2Operational,
    /// Execution-level parameters with the lightest procedures.
    #[serde(rename = "L3-Execution")]
    L3Execution,
}

impl Layer {
    /// Returns the wire tag for this layer (the serde rename string).
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::L0Immutable => "L0-Immutable",
            Layer::L1Constitutional => "L1-Constitutional",
            Layer::L2Operational => "L2-Operational",
            Layer::L3Execution => "L3-Execution",
        }
    }

    /// Parses a layer from its wire tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "L0-Immutable" => Some(Layer::L0Immutable),
            "L1-Constitutional" => Some(Layer::L1Constitutional),
            "L2-Operational" => Some(Layer::L2Operational),
            "L3-Execution" => Some(Layer::L3Execution),
            _ => None,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The immutable input to the governance pipeline.
///
/// A proposal's identity is the SHA-256 of its canonical payload; two
/// proposals differing only in whitespace, key order, or trailing text
/// punctuation are the same proposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Proposal {
    /// The submitting account on the ledger substrate.
    pub proposer: Address,
    /// The JSON-serialized abstract syntax tree of the machine-readable logic.
    pub logic_ast: String,
    /// The natural-language description.
    pub text: String,
    /// The governance layer the proposal targets.
    pub layer: Layer,
    /// Submission wall-clock timestamp, milliseconds since the UNIX epoch.
    pub created_at: u64,
}

/// The byte-exact reduction of a proposal used for hashing, compression,
/// and fraud proofs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPayload {
    /// `canonical_json ++ '.' ++ normalized_text`, UTF-8.
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`; the proposal identity.
    pub hash: ProposalId,
}
