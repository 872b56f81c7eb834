use did_hedera::{DIDDocument, SignedDIDMessage, TopicId, DID};

/// A consensus topic.  In this mock, every topic hosts at most one DID.
#[derive(Clone, Debug)]
pub struct Topic {
    pub topic_id: TopicId,
    /// Multibase-encoded public key of the topic's admin.
    pub admin_key: String,
    pub memo: String,
    /// Every accepted message, in consensus order.
    pub message_v: Vec<SignedDIDMessage>,
    /// The state obtained by applying message_v in order.  None until a create message lands.
    pub did_state_o: Option<DIDState>,
}

impl Topic {
    pub fn new(topic_id: TopicId, admin_key: String, memo: String) -> Self {
        Self {
            topic_id,
            admin_key,
            memo,
            message_v: Vec::new(),
            did_state_o: None,
        }
    }
}

/// Materialized state of the DID hosted on a topic.
#[derive(Clone, Debug)]
pub struct DIDState {
    pub did: DID,
    /// The current document.  After deactivation this is the tombstone.
    pub did_document: DIDDocument,
    pub sequence_number: u64,
    pub created: time::OffsetDateTime,
    pub updated: time::OffsetDateTime,
    pub deactivated: bool,
}
