// Path: crates/api/src/substrate.rs

//! The ledger substrate boundary.
//!
//! The substrate provides timestamped memo transactions, escrow
//! primitives, the validated ledger clock, and ledger hashes for VRF
//! seeding. The kernel trusts the substrate's validated-ledger signal and
//! does not enforce finality itself.

use accord_types::app::{Address, Hash32};
use accord_types::error::SubstrateError;
use async_trait::async_trait;

/// The substrate's acknowledgement of a submitted memo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoReceipt {
    /// The transaction hash on the ledger.
    pub tx_hash: String,
    /// The ledger index the transaction landed in.
    pub ledger_index: u64,
    /// Whether the ledger containing the transaction is validated.
    pub validated: bool,
}

/// The ledger substrate consumed by the kernel.
///
/// All methods are invoked from adapter context; implementations may block
/// on network I/O internally but must not call back into the kernel.
#[async_trait]
pub trait LedgerSubstrate: Send + Sync {
    /// Returns the current validated ledger index.
    async fn current_ledger_index(&self) -> Result<u64, SubstrateError>;

    /// Submits a memo transaction carrying `payload_bytes` under the given
    /// type tag.
    async fn submit_memo(
        &self,
        destination: &Address,
        memo_type: &str,
        payload_bytes: &[u8],
    ) -> Result<MemoReceipt, SubstrateError>;

    /// Creates an escrow of `amount` drops releasable after `finish_after`
    /// (ledger time), returning the escrow sequence.
    async fn create_escrow(&self, amount: u128, finish_after: u64) -> Result<u64, SubstrateError>;

    /// Finishes a matured escrow, releasing the funds to the owner.
    async fn finish_escrow(&self, owner: &Address, seq: u64) -> Result<(), SubstrateError>;

    /// Cancels an escrow before maturity.
    async fn cancel_escrow(&self, owner: &Address, seq: u64) -> Result<(), SubstrateError>;

    /// Returns the hash of the ledger at `index`, used for VRF seeding.
    async fn ledger_hash(&self, index: u64) -> Result<Hash32, SubstrateError>;
}
