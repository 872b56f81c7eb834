use crate::{DIDDocument, DIDDocumentMetadata};

#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDResolutionMetadata {
    #[serde(rename = "contentType")]
    pub content_type: String,
}

/// See <https://www.w3.org/TR/did-resolution/#did-resolution-result>.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDResolutionResult {
    #[serde(rename = "didDocument")]
    pub did_document: DIDDocument,
    #[serde(rename = "didDocumentMetadata")]
    pub did_document_metadata: DIDDocumentMetadata,
    #[serde(rename = "didResolutionMetadata")]
    pub did_resolution_metadata: DIDResolutionMetadata,
}
