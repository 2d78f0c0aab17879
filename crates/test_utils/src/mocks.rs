// Path: crates/test_utils/src/mocks.rs

//! Mock implementations of the adapter traits.
//!
//! `MockSubstrate` is a deterministic in-memory ledger: the index advances
//! only when a test advances it, memos are logged verbatim, and ledger
//! hashes derive from the index alone. `MockAssessor` returns a scripted
//! verdict or a scripted failure.

use accord_api::assessor::SemanticAssessor;
use accord_api::events::EventObserver;
use accord_api::substrate::{LedgerSubstrate, MemoReceipt};
use accord_types::app::{Address, ChannelBVerdict, Hash32, LifecycleEvent, Proposal};
use accord_types::codec;
use accord_types::error::{AssessorError, SubstrateError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// One memo recorded by the mock substrate.
#[derive(Debug, Clone)]
pub struct RecordedMemo {
    /// Destination account.
    pub destination: Address,
    /// The memo type tag.
    pub memo_type: String,
    /// The payload bytes as submitted.
    pub payload: Vec<u8>,
    /// The ledger index assigned.
    pub ledger_index: u64,
}

/// A deterministic in-memory ledger substrate.
#[derive(Debug, Default)]
pub struct MockSubstrate {
    ledger_index: AtomicU64,
    memos: Mutex<Vec<RecordedMemo>>,
    next_escrow_seq: AtomicU64,
    /// When set, every submission fails with this message.
    fail_submissions: Mutex<Option<String>>,
}

impl MockSubstrate {
    /// Creates a substrate at the given starting ledger index.
    pub fn at_ledger(index: u64) -> Self {
        let s = Self::default();
        s.ledger_index.store(index, Ordering::SeqCst);
        s
    }

    /// Advances the validated ledger by `n` intervals.
    pub fn advance(&self, n: u64) -> u64 {
        self.ledger_index.fetch_add(n, Ordering::SeqCst) + n
    }

    /// All memos recorded so far.
    pub fn memos(&self) -> Vec<RecordedMemo> {
        self.memos.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Makes every subsequent submission fail.
    pub fn break_submissions(&self, reason: &str) {
        if let Ok(mut guard) = self.fail_submissions.lock() {
            *guard = Some(reason.to_string());
        }
    }
}

#[async_trait]
impl LedgerSubstrate for MockSubstrate {
    async fn current_ledger_index(&self) -> Result<u64, SubstrateError> {
        Ok(self.ledger_index.load(Ordering::SeqCst))
    }

    async fn submit_memo(
        &self,
        destination: &Address,
        memo_type: &str,
        payload_bytes: &[u8],
    ) -> Result<MemoReceipt, SubstrateError> {
        if let Ok(guard) = self.fail_submissions.lock() {
            if let Some(reason) = guard.as_ref() {
                return Err(SubstrateError::Submission(reason.clone()));
            }
        }
        let ledger_index = self.ledger_index.load(Ordering::SeqCst);
        let memo = RecordedMemo {
            destination: destination.clone(),
            memo_type: memo_type.to_string(),
            payload: payload_bytes.to_vec(),
            ledger_index,
        };
        let tx_hash = codec::sha256_hex(&memo.payload);
        if let Ok(mut memos) = self.memos.lock() {
            memos.push(memo);
        }
        Ok(MemoReceipt {
            tx_hash,
            ledger_index,
            validated: true,
        })
    }

    async fn create_escrow(&self, _amount: u128, _finish_after: u64) -> Result<u64, SubstrateError> {
        Ok(self.next_escrow_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn finish_escrow(&self, _owner: &Address, _seq: u64) -> Result<(), SubstrateError> {
        Ok(())
    }

    async fn cancel_escrow(&self, _owner: &Address, _seq: u64) -> Result<(), SubstrateError> {
        Ok(())
    }

    async fn ledger_hash(&self, index: u64) -> Result<Hash32, SubstrateError> {
        Ok(Hash32(codec::sha256(index.to_be_bytes())))
    }
}

/// A scripted semantic assessor.
#[derive(Debug)]
pub struct MockAssessor {
    verdict: Mutex<Result<ChannelBVerdict, String>>,
}

impl MockAssessor {
    /// An assessor that always returns `verdict`.
    pub fn returning(verdict: ChannelBVerdict) -> Self {
        Self {
            verdict: Mutex::new(Ok(verdict)),
        }
    }

    /// An assessor that always fails, exercising the conservative
    /// fallback path.
    pub fn failing(reason: &str) -> Self {
        Self {
            verdict: Mutex::new(Err(reason.to_string())),
        }
    }
}

#[async_trait]
impl SemanticAssessor for MockAssessor {
    async fn analyze(&self, _proposal: &Proposal) -> Result<ChannelBVerdict, AssessorError> {
        match self.verdict.lock() {
            Ok(guard) => match &*guard {
                Ok(v) => Ok(v.clone()),
                Err(reason) => Err(AssessorError::Unavailable(reason.clone())),
            },
            Err(_) => Err(AssessorError::Unavailable("poisoned".to_string())),
        }
    }
}

/// An observer that records every event in order.
#[derive(Debug, Default)]
pub struct CapturingObserver {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl CapturingObserver {
    /// Creates an empty capture.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the events seen so far.
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// The event kinds in order, for compact assertions.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events()
            .iter()
            .map(|e| match e {
                LifecycleEvent::Submitted { .. } => "submitted",
                LifecycleEvent::ReviewComplete { .. } => "review-complete",
                LifecycleEvent::Routed { .. } => "routed",
                LifecycleEvent::VotingOpened { .. } => "voting-opened",
                LifecycleEvent::VoteCast { .. } => "vote-cast",
                LifecycleEvent::VotingClosed { .. } => "voting-closed",
                LifecycleEvent::JurySelected { .. } => "jury-selected",
                LifecycleEvent::VerdictReached { .. } => "verdict-reached",
                LifecycleEvent::Passed { .. } => "passed",
                LifecycleEvent::Rejected { .. } => "rejected",
                LifecycleEvent::TimelockStarted { .. } => "timelock-started",
                LifecycleEvent::TimelockExpired { .. } => "timelock-expired",
                LifecycleEvent::Executed { .. } => "executed",
            })
            .collect()
    }
}

impl EventObserver for CapturingObserver {
    fn on_event(&self, event: &LifecycleEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
