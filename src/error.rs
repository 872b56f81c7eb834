use std::borrow::Cow;

use crate::DID;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Conflicting update for {did}: message expected ledger sequence number {expected}, but ledger is at {actual}")]
    ConflictingUpdate { did: DID, expected: u64, actual: u64 },
    #[error("DID not found: {0}")]
    DIDNotFound(DID),
    #[error("DID document deactivated: {0}")]
    DocumentDeactivated(DID),
    #[error("Duplicate target {target:?} in operation {operation_index}")]
    DuplicateOperationTarget {
        operation_index: usize,
        target: String,
    },
    #[error("Update batch contains no operations")]
    EmptyBatch,
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(Cow<'static, str>),
    #[error("Invalid service endpoint {endpoint:?}: {reason}")]
    InvalidServiceEndpoint {
        endpoint: String,
        reason: Cow<'static, str>,
    },
    #[error("Invalid signature: {0}")]
    InvalidSignature(Cow<'static, str>),
    #[error("Ledger submission error: {0}")]
    LedgerSubmissionError(Cow<'static, str>),
    #[error("Malformed DID: {0}")]
    MalformedDID(Cow<'static, str>),
    #[error("Malformed DID document: {0}")]
    MalformedDocument(Cow<'static, str>),
    #[error("No verification method")]
    NoVerificationMethod,
    #[error("Target {target:?} of operation {operation_index} not found in DID document")]
    OperationTargetNotFound {
        operation_index: usize,
        target: String,
    },
    #[error("Serialization error: {0}")]
    Serialization(Cow<'static, str>),
    #[error("Transport error: {0}")]
    TransportError(Cow<'static, str>),
    #[error("Signing key {actual} is not authorized to modify {did}; authorized keys: {expected:?}")]
    UnauthorizedSigningKey {
        did: DID,
        expected: Vec<String>,
        actual: String,
    },
    #[error("Unsupported key encoding: {0}")]
    UnsupportedKeyEncoding(Cow<'static, str>),
}

impl From<ed25519_dalek::SignatureError> for Error {
    fn from(e: ed25519_dalek::SignatureError) -> Self {
        Self::InvalidSignature(e.to_string().into())
    }
}
