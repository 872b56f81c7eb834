use std::sync::Arc;

use crate::{
    key_codec, DIDDocument, DIDDocumentMetadata, DIDMessage, DIDOperation, DIDResolutionMetadata,
    DIDResolutionResult, Error, LedgerClient, LedgerReceipt, LedgerRecord, LedgerTransaction,
    ResolutionFormat, Result, UpdateOperations, DID,
};

/// Memo attached to topics created for new DIDs.
pub const DID_TOPIC_MEMO: &str = "did:hedera DID topic";

/// Drives a DID through its lifecycle against a ledger:
///
/// ```text
/// NonExistent --create--> Active --update--> Active --deactivate--> Deactivated
/// ```
///
/// Deactivated is terminal.  Authorization of the signing key is checked against the current
/// document before anything is submitted, and update batches are applied locally first, so a
/// failing update or deactivation never reaches the ledger when it can be caught here.  Nothing
/// is retried; every failure is returned to the caller, who decides whether to retry.
///
/// The coordinator holds no mutable state, so it can be shared freely between tasks.  Two
/// concurrent updates of the same DID are ordered by the ledger; the loser gets
/// [`Error::ConflictingUpdate`].
#[derive(Clone)]
pub struct DIDLifecycleCoordinator {
    ledger_client_a: Arc<dyn LedgerClient>,
}

impl DIDLifecycleCoordinator {
    pub fn new(ledger_client_a: Arc<dyn LedgerClient>) -> Self {
        Self { ledger_client_a }
    }
    /// Creates a DID controlled by `owner_key`, returning the DID and its document as resolved
    /// from the ledger after creation.
    pub async fn create(
        &self,
        owner_key: &ed25519_dalek::SigningKey,
    ) -> Result<(DID, DIDDocument)> {
        let owner_verifying_key = owner_key.verifying_key();
        let owner_key_multibase = key_codec::encode_multibase(owner_verifying_key.as_bytes());
        tracing::debug!("creating DID topic with admin key {}", owner_key_multibase);

        let topic_receipt = self
            .submit(
                LedgerTransaction::TopicCreate {
                    admin_key: owner_key_multibase,
                    memo: DID_TOPIC_MEMO.to_string(),
                },
                None,
            )
            .await?;
        let did = DID::new(
            self.ledger_client_a.network(),
            owner_verifying_key.as_bytes(),
            topic_receipt.topic_id,
        )?;

        let root_did_document = DIDDocument::create_root(did.clone(), &owner_verifying_key);
        root_did_document.verify()?;
        let signed_did_message = DIDMessage {
            did: did.clone(),
            operation: DIDOperation::Create {
                document: root_did_document,
            },
            previous_sequence_number_o: None,
            timestamp: time::OffsetDateTime::now_utc(),
        }
        .sign(owner_key)?;
        self.submit(
            LedgerTransaction::TopicMessageSubmit {
                topic_id: did.topic_id(),
                message: signed_did_message,
            },
            Some(&did),
        )
        .await?;
        tracing::info!("created DID {}", did);

        let did_document = self.resolve(&did, ResolutionFormat::DidJson).await?;
        Ok((did, did_document))
    }
    /// Resolves the current document of `did`.  This never mutates anything on the ledger.
    /// A deactivated DID resolves to its tombstone marker document; use
    /// [`DIDLifecycleCoordinator::resolve_with_metadata`] to see the deactivation flag.
    pub async fn resolve(&self, did: &DID, format: ResolutionFormat) -> Result<DIDDocument> {
        let (did_document, _) = self.resolve_current(did).await?;
        Ok(did_document.with_context(format.includes_context()))
    }
    /// Resolves the current document of `did` along with its document and resolution metadata.
    pub async fn resolve_with_metadata(
        &self,
        did: &DID,
        format: ResolutionFormat,
    ) -> Result<DIDResolutionResult> {
        let (did_document, ledger_record) = self.resolve_current(did).await?;
        Ok(DIDResolutionResult {
            did_document: did_document.with_context(format.includes_context()),
            did_document_metadata: DIDDocumentMetadata {
                created: ledger_record.created,
                updated: ledger_record.updated,
                version_id: ledger_record.sequence_number,
                deactivated_o: ledger_record.deactivated.then_some(true),
            },
            did_resolution_metadata: DIDResolutionMetadata {
                content_type: format.as_media_type().to_string(),
            },
        })
    }
    /// Applies `update_operations` in order to the current document of `did` and records the
    /// result on the ledger as a single message, so the whole batch lands or none of it does.
    /// `signing_key` must match a controlling verification method of the current document.
    /// The returned document has the application/did+json shape, as from `create` and `resolve`.
    pub async fn update(
        &self,
        did: &DID,
        update_operations: &UpdateOperations,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        let (current_did_document, ledger_record) = self.resolve_active(did).await?;
        current_did_document.authorize_signing_key(&signing_key.verifying_key())?;
        let new_did_document = current_did_document.apply_update_operations(update_operations)?;
        tracing::debug!(
            "updating DID {} with {} operation(s) against sequence number {}",
            did,
            update_operations.len(),
            ledger_record.sequence_number
        );

        let signed_did_message = DIDMessage {
            did: did.clone(),
            operation: DIDOperation::Update {
                document: new_did_document.clone(),
                updates: update_operations.clone(),
            },
            previous_sequence_number_o: Some(ledger_record.sequence_number),
            timestamp: time::OffsetDateTime::now_utc(),
        }
        .sign(signing_key)?;
        let receipt = self
            .submit(
                LedgerTransaction::TopicMessageSubmit {
                    topic_id: did.topic_id(),
                    message: signed_did_message,
                },
                Some(did),
            )
            .await?;
        tracing::info!(
            "updated DID {}; ledger sequence number is now {:?}",
            did,
            receipt.sequence_number_o
        );
        Ok(new_did_document.with_context(false))
    }
    /// Deactivates `did`, after which it resolves to a tombstone and accepts no further changes.
    /// Deactivating an already-deactivated DID fails with [`Error::DocumentDeactivated`].
    pub async fn deactivate(
        &self,
        did: &DID,
        signing_key: &ed25519_dalek::SigningKey,
    ) -> Result<DIDDocument> {
        let (current_did_document, ledger_record) = self.resolve_active(did).await?;
        current_did_document.authorize_signing_key(&signing_key.verifying_key())?;

        let signed_did_message = DIDMessage {
            did: did.clone(),
            operation: DIDOperation::Deactivate,
            previous_sequence_number_o: Some(ledger_record.sequence_number),
            timestamp: time::OffsetDateTime::now_utc(),
        }
        .sign(signing_key)?;
        self.submit(
            LedgerTransaction::TopicMessageSubmit {
                topic_id: did.topic_id(),
                message: signed_did_message,
            },
            Some(did),
        )
        .await?;
        tracing::info!("deactivated DID {}", did);
        Ok(DIDDocument::tombstone(did.clone()).with_context(false))
    }

    async fn resolve_current(&self, did: &DID) -> Result<(DIDDocument, LedgerRecord)> {
        tracing::debug!("querying ledger for DID {}", did);
        let ledger_record = self.ledger_client_a.query(did).await?;
        if ledger_record.deactivated {
            return Ok((DIDDocument::tombstone(did.clone()), ledger_record));
        }
        let did_document = DIDDocument::parse_json_bytes(&ledger_record.document)?;
        if did_document.did != *did {
            return Err(Error::MalformedDocument(
                format!(
                    "ledger returned document for {} when {} was requested",
                    did_document.did, did
                )
                .into(),
            ));
        }
        Ok((did_document, ledger_record))
    }
    async fn resolve_active(&self, did: &DID) -> Result<(DIDDocument, LedgerRecord)> {
        let (did_document, ledger_record) = self.resolve_current(did).await?;
        if ledger_record.deactivated {
            return Err(Error::DocumentDeactivated(did.clone()));
        }
        Ok((did_document, ledger_record))
    }
    /// Submits `transaction`, reporting transport failures as submission failures of the DID
    /// being operated on.  Ledger-reported conditions such as conflicts pass through unchanged.
    async fn submit(
        &self,
        transaction: LedgerTransaction,
        did_o: Option<&DID>,
    ) -> Result<LedgerReceipt> {
        let transaction_name = transaction.name();
        self.ledger_client_a
            .submit(transaction)
            .await
            .map_err(|e| match e {
                Error::TransportError(message) => {
                    tracing::warn!(
                        "{} transaction for {:?} failed in transport: {}",
                        transaction_name,
                        did_o.map(DID::as_str),
                        message
                    );
                    Error::LedgerSubmissionError(
                        format!(
                            "{} transaction for {} failed in transport: {}",
                            transaction_name,
                            did_o.map_or("new DID", DID::as_str),
                            message
                        )
                        .into(),
                    )
                }
                e => e,
            })
    }
}
