use crate::{LedgerReceipt, LedgerRecord, LedgerTransaction, Network, Result, DID};

/// The client side of the interaction with the ledger.  Implementations own transport, retries,
/// and connection management; the lifecycle coordinator never retries on its own.
///
/// Errors are expected to be reported as follows:
/// - [`crate::Error::TransportError`] if the ledger could not be reached.
/// - [`crate::Error::LedgerSubmissionError`] if the ledger rejected a transaction.
/// - [`crate::Error::ConflictingUpdate`] if the ledger's sequence number for the DID differs from
///   the one the submitted message was built against.
/// - [`crate::Error::DIDNotFound`] if `query` finds no record of the DID.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    /// The network this client is configured for.  DIDs created through it live on this network.
    fn network(&self) -> Network;
    async fn submit(&self, transaction: LedgerTransaction) -> Result<LedgerReceipt>;
    async fn query(&self, did: &DID) -> Result<LedgerRecord>;
}
