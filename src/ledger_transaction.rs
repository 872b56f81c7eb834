use crate::{SignedDIDMessage, TopicId};

/// The transactions the lifecycle needs from the ledger.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "transaction", rename_all = "kebab-case")]
pub enum LedgerTransaction {
    /// Creates a public topic: only an admin key is set, so anyone may submit messages, but only
    /// the admin may update or delete the topic itself.
    TopicCreate {
        #[serde(rename = "adminKey")]
        admin_key: String,
        memo: String,
    },
    TopicMessageSubmit {
        #[serde(rename = "topicId")]
        topic_id: TopicId,
        message: SignedDIDMessage,
    },
}

impl LedgerTransaction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TopicCreate { .. } => "topic-create",
            Self::TopicMessageSubmit { .. } => "topic-message-submit",
        }
    }
}

/// Acknowledgement that the ledger reached consensus on a transaction.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct LedgerReceipt {
    #[serde(rename = "topicId")]
    pub topic_id: TopicId,
    /// Sequence number the message received within its topic.  Absent for topic creation.
    #[serde(
        rename = "sequenceNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_number_o: Option<u64>,
    #[serde(rename = "consensusTimestamp", with = "time::serde::rfc3339")]
    pub consensus_timestamp: time::OffsetDateTime,
}

/// The ledger's materialized view of a DID: the raw bytes of its current document plus the
/// bookkeeping needed for resolution metadata and conflict detection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerRecord {
    pub document: Vec<u8>,
    pub sequence_number: u64,
    pub created: time::OffsetDateTime,
    pub updated: time::OffsetDateTime,
    pub deactivated: bool,
}
