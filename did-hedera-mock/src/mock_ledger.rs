use std::collections::HashMap;

use did_hedera::{
    key_codec, DIDDocument, DIDMessage, DIDOperation, Error, LedgerReceipt, LedgerRecord, Network, Result,
    SignedDIDMessage, TopicId, DID,
};

use crate::{DIDState, Topic};

/// Mock ledger -- Purely in-memory, intra-process ledger.  Hosts topics and the DIDs recorded on
/// them, and enforces the rules a real ledger-backed DID method enforces on every message:
/// valid signature, authorized signer, matching network and topic, current sequence number, and
/// update documents that match the operations they carry.
#[derive(Debug)]
pub struct MockLedger {
    pub network: Network,
    next_topic_num: u64,
    topic_m: HashMap<TopicId, Topic>,
}

impl MockLedger {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            next_topic_num: 1000,
            topic_m: HashMap::new(),
        }
    }
    pub fn topic(&self, topic_id: &TopicId) -> Option<&Topic> {
        self.topic_m.get(topic_id)
    }
    pub fn create_topic(
        &mut self,
        user_agent: &str,
        admin_key: String,
        memo: String,
    ) -> Result<LedgerReceipt> {
        tracing::info!(
            "ledger ({}) servicing TOPIC CREATE request from {:?} with admin key {}",
            self.network,
            user_agent,
            admin_key
        );
        key_codec::ed25519_verifying_key(&key_codec::decode_multibase(&admin_key)?).map_err(
            |e| Error::LedgerSubmissionError(format!("INVALID_ADMIN_KEY: {}", e).into()),
        )?;
        let topic_id = TopicId::new(0, 0, self.next_topic_num);
        self.next_topic_num += 1;
        self.topic_m
            .insert(topic_id, Topic::new(topic_id, admin_key, memo));
        Ok(LedgerReceipt {
            topic_id,
            sequence_number_o: None,
            consensus_timestamp: time::OffsetDateTime::now_utc(),
        })
    }
    pub fn submit_message(
        &mut self,
        user_agent: &str,
        topic_id: TopicId,
        signed_did_message: SignedDIDMessage,
    ) -> Result<LedgerReceipt> {
        let message = &signed_did_message.message;
        tracing::info!(
            "ledger ({}) servicing {} message from {:?} on topic {} for\n    DID: {}",
            self.network,
            message.operation.name(),
            user_agent,
            topic_id,
            message.did
        );

        if message.did.network() != self.network {
            return Err(Error::LedgerSubmissionError(
                "DID network doesn't match that of the ledger".into(),
            ));
        }
        if message.did.topic_id() != topic_id {
            return Err(Error::LedgerSubmissionError(
                "DID topic doesn't match the topic the message was submitted to".into(),
            ));
        }
        let topic = self.topic_m.get_mut(&topic_id).ok_or_else(|| {
            Error::LedgerSubmissionError(format!("INVALID_TOPIC_ID: {}", topic_id).into())
        })?;
        let signer = signed_did_message.verify()?;
        let consensus_timestamp = time::OffsetDateTime::now_utc();

        let sequence_number = match &message.operation {
            DIDOperation::Create { document } => {
                if topic.did_state_o.is_some() {
                    return Err(Error::LedgerSubmissionError(
                        "DID already exists on this topic".into(),
                    ));
                }
                if message.previous_sequence_number_o.is_some() {
                    return Err(Error::LedgerSubmissionError(
                        "create message must not carry a previous sequence number".into(),
                    ));
                }
                if document.did != message.did {
                    return Err(Error::LedgerSubmissionError(
                        "create message document id doesn't match its DID".into(),
                    ));
                }
                if topic.admin_key != key_codec::encode_multibase(signer.as_bytes()) {
                    return Err(Error::LedgerSubmissionError(
                        "create message must be signed by the topic admin key".into(),
                    ));
                }
                if message.did.public_key_base58() != key_codec::encode_base58(signer.as_bytes()) {
                    return Err(Error::LedgerSubmissionError(
                        "DID identifier doesn't match the key that signed the create message"
                            .into(),
                    ));
                }
                document.verify()?;
                document.authorize_signing_key(&signer)?;
                topic.did_state_o = Some(DIDState {
                    did: message.did.clone(),
                    did_document: document.clone(),
                    sequence_number: 1,
                    created: consensus_timestamp,
                    updated: consensus_timestamp,
                    deactivated: false,
                });
                1
            }
            DIDOperation::Update { document, updates } => {
                let did_state = active_did_state(topic, message, &signer)?;
                let replayed_did_document =
                    did_state.did_document.apply_update_operations(updates)?;
                if replayed_did_document != *document {
                    return Err(Error::LedgerSubmissionError(
                        "update message document doesn't match the result of its operations"
                            .into(),
                    ));
                }
                did_state.did_document = replayed_did_document;
                did_state.sequence_number += 1;
                did_state.updated = consensus_timestamp;
                did_state.sequence_number
            }
            DIDOperation::Deactivate => {
                let did_state = active_did_state(topic, message, &signer)?;
                did_state.did_document = DIDDocument::tombstone(message.did.clone());
                did_state.deactivated = true;
                did_state.sequence_number += 1;
                did_state.updated = consensus_timestamp;
                did_state.sequence_number
            }
        };
        topic.message_v.push(signed_did_message);
        Ok(LedgerReceipt {
            topic_id,
            sequence_number_o: Some(sequence_number),
            consensus_timestamp,
        })
    }
    pub fn query(&self, user_agent: &str, did: &DID) -> Result<LedgerRecord> {
        tracing::debug!(
            "ledger ({}) servicing QUERY request from {:?} for\n    DID: {}",
            self.network,
            user_agent,
            did
        );
        let did_state = self
            .topic_m
            .get(&did.topic_id())
            .and_then(|topic| topic.did_state_o.as_ref())
            .filter(|did_state| did_state.did == *did)
            .ok_or_else(|| Error::DIDNotFound(did.clone()))?;
        let document = serde_json::to_vec(&did_state.did_document)
            .map_err(|e| Error::Serialization(e.to_string().into()))?;
        Ok(LedgerRecord {
            document,
            sequence_number: did_state.sequence_number,
            created: did_state.created,
            updated: did_state.updated,
            deactivated: did_state.deactivated,
        })
    }
}

/// Returns the state of the DID the message addresses, provided it can still be changed by a
/// message built against `message.previous_sequence_number_o` and signed by `signer`.
fn active_did_state<'t>(
    topic: &'t mut Topic,
    message: &DIDMessage,
    signer: &ed25519_dalek::VerifyingKey,
) -> Result<&'t mut DIDState> {
    let did_state = topic
        .did_state_o
        .as_mut()
        .ok_or_else(|| Error::DIDNotFound(message.did.clone()))?;
    if did_state.deactivated {
        return Err(Error::DocumentDeactivated(message.did.clone()));
    }
    if message.previous_sequence_number_o != Some(did_state.sequence_number) {
        return Err(Error::ConflictingUpdate {
            did: message.did.clone(),
            expected: message.previous_sequence_number_o.unwrap_or(0),
            actual: did_state.sequence_number,
        });
    }
    did_state.did_document.authorize_signing_key(signer)?;
    Ok(did_state)
}
