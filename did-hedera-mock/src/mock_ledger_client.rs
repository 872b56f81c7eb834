use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock,
};

use did_hedera::{
    Error, LedgerClient, LedgerClientConfig, LedgerReceipt, LedgerRecord, LedgerTransaction,
    Network, Result, DID,
};

use crate::MockLedger;

/// Mock (i.e. ephemeral, intra-process) implementation of LedgerClient.  Several clients may
/// share one MockLedger, which is how concurrent writers to the same DID are simulated.
///
/// Any configured latency elapses before the ledger is touched, and each call then commits
/// atomically under the ledger lock, so a call that is dropped mid-flight leaves no trace.
pub struct MockLedgerClient {
    pub user_agent: String,
    config: LedgerClientConfig,
    mock_ledger_la: Arc<RwLock<MockLedger>>,
    offline: AtomicBool,
}

impl MockLedgerClient {
    pub fn new(
        user_agent: String,
        config: LedgerClientConfig,
        mock_ledger_la: Arc<RwLock<MockLedger>>,
    ) -> Self {
        Self {
            user_agent,
            config,
            mock_ledger_la,
            offline: AtomicBool::new(false),
        }
    }
    /// While offline, every call fails with [`Error::TransportError`] without reaching the ledger.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    async fn connect(&self) -> Result<()> {
        if let Some(simulated_latency) = self.config.simulated_latency_o {
            tokio::time::sleep(simulated_latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::TransportError(
                format!("{} could not reach the {} ledger", self.user_agent, self.config.network)
                    .into(),
            ));
        }
        Ok(())
    }
    fn submit_locked(&self, transaction: LedgerTransaction) -> Result<LedgerReceipt> {
        let mut mock_ledger_g = self
            .mock_ledger_la
            .write()
            .map_err(|_| Error::TransportError("mock ledger lock is poisoned".into()))?;
        if mock_ledger_g.network != self.config.network {
            return Err(Error::TransportError(
                format!(
                    "client is configured for {} but the ledger is {}",
                    self.config.network, mock_ledger_g.network
                )
                .into(),
            ));
        }
        match transaction {
            LedgerTransaction::TopicCreate { admin_key, memo } => {
                mock_ledger_g.create_topic(self.user_agent.as_str(), admin_key, memo)
            }
            LedgerTransaction::TopicMessageSubmit { topic_id, message } => {
                mock_ledger_g.submit_message(self.user_agent.as_str(), topic_id, message)
            }
        }
    }
    fn query_locked(&self, did: &DID) -> Result<LedgerRecord> {
        let mock_ledger_g = self
            .mock_ledger_la
            .read()
            .map_err(|_| Error::TransportError("mock ledger lock is poisoned".into()))?;
        mock_ledger_g.query(self.user_agent.as_str(), did)
    }
}

#[async_trait::async_trait]
impl LedgerClient for MockLedgerClient {
    fn network(&self) -> Network {
        self.config.network
    }
    async fn submit(&self, transaction: LedgerTransaction) -> Result<LedgerReceipt> {
        tracing::trace!(
            "{} submitting {} transaction paid for by operator account {}",
            self.user_agent,
            transaction.name(),
            self.config.operator_account_id
        );
        self.connect().await?;
        self.submit_locked(transaction)
    }
    async fn query(&self, did: &DID) -> Result<LedgerRecord> {
        self.connect().await?;
        self.query_locked(did)
    }
}
