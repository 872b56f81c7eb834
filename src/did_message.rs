use crate::{key_codec, DIDDocument, Error, Result, UpdateOperations, DID};

/// The change a DID message records.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum DIDOperation {
    Create {
        document: DIDDocument,
    },
    /// Carries both the operations and the document they produce, so that the ledger can check
    /// one against the other.
    Update {
        document: DIDDocument,
        updates: UpdateOperations,
    },
    Deactivate,
}

impl DIDOperation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Deactivate => "deactivate",
        }
    }
}

/// A message recorded on a DID's topic.  Every state transition of a DID is one of these.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DIDMessage {
    pub did: DID,
    #[serde(flatten)]
    pub operation: DIDOperation,
    /// The ledger sequence number of the state this message was built against.  Absent for
    /// create.  The ledger refuses the message if its state has moved on since.
    #[serde(
        rename = "previousSequenceNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_sequence_number_o: Option<u64>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: time::OffsetDateTime,
}

impl DIDMessage {
    /// Signs the canonical (JCS) serialization of this message.
    pub fn sign(self, signing_key: &ed25519_dalek::SigningKey) -> Result<SignedDIDMessage> {
        use ed25519_dalek::Signer;
        let message_bytes = self.serialize_canonically()?;
        let signature = signing_key.sign(&message_bytes);
        Ok(SignedDIDMessage {
            message: self,
            signer: key_codec::encode_multibase(signing_key.verifying_key().as_bytes()),
            signature: key_codec::encode_multibase(&signature.to_bytes()),
        })
    }
    pub fn serialize_canonically(&self) -> Result<Vec<u8>> {
        serde_json_canonicalizer::to_vec(self).map_err(|e| {
            Error::Serialization(format!("DID message to canonical JSON: {}", e).into())
        })
    }
}

/// A DIDMessage along with the multibase-encoded public key that signed it and the signature.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SignedDIDMessage {
    pub message: DIDMessage,
    pub signer: String,
    pub signature: String,
}

impl SignedDIDMessage {
    /// Verifies the signature, returning the signer's public key.  This says nothing about
    /// whether that key is authorized for the DID; see [`DIDDocument::authorize_signing_key`].
    pub fn verify(&self) -> Result<ed25519_dalek::VerifyingKey> {
        let verifying_key =
            key_codec::ed25519_verifying_key(&key_codec::decode_multibase(&self.signer)?)?;
        let signature_bytes = key_codec::decode_multibase(&self.signature)?;
        let signature = ed25519_dalek::Signature::from_slice(&signature_bytes)?;
        let message_bytes = self.message.serialize_canonically()?;
        verifying_key.verify_strict(&message_bytes, &signature)?;
        Ok(verifying_key)
    }
}
