/// See <https://www.w3.org/TR/did-1.0/#did-document-metadata> for definitions.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDDocumentMetadata {
    /// Consensus timestamp of the message that created the DID.
    #[serde(with = "time::serde::rfc3339")]
    pub created: time::OffsetDateTime,
    /// Consensus timestamp of the most recent message applied to the DID.
    #[serde(with = "time::serde::rfc3339")]
    pub updated: time::OffsetDateTime,
    /// The ledger sequence number of the DID's latest state; the create message is 1.
    #[serde(rename = "versionId")]
    pub version_id: u64,
    /// If a DID has been deactivated, DID document metadata MUST include this property with the
    /// boolean value true.
    #[serde(
        rename = "deactivated",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub deactivated_o: Option<bool>,
}

impl DIDDocumentMetadata {
    pub fn is_deactivated(&self) -> bool {
        self.deactivated_o.unwrap_or(false)
    }
}
