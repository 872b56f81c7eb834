use std::str::FromStr;

use crate::{KeyMaterial, KeyPurpose, DID, ED25519_VERIFICATION_KEY_2020};

/// The `property` value naming the plain "verificationMethod" list rather than a relationship.
const VERIFICATION_METHOD_PROPERTY: &str = "verificationMethod";

/// A single mutation of a DID document.  Batches of these are applied in order, so an operation
/// may refer to an id introduced by an earlier operation in the same batch.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "operation", rename_all = "kebab-case")]
pub enum UpdateOperation {
    AddVerificationMethod {
        id: String,
        /// Defaults to Ed25519VerificationKey2020 when absent on the wire.
        #[serde(default = "default_verification_method_type")]
        r#type: String,
        /// Defaults to the DID being updated when absent on the wire.
        #[serde(rename = "controller", default, skip_serializing_if = "Option::is_none")]
        controller_o: Option<DID>,
        #[serde(flatten)]
        key_material: KeyMaterial,
        /// The verification relationship to also reference the new method from.  If absent, or
        /// given as "verificationMethod", the method is only added to "verificationMethod".
        #[serde(
            rename = "property",
            default,
            deserialize_with = "deserialize_key_purpose_o",
            skip_serializing_if = "Option::is_none"
        )]
        key_purpose_o: Option<KeyPurpose>,
    },
    RemoveVerificationMethod {
        id: String,
    },
    AddService {
        id: String,
        r#type: String,
        #[serde(rename = "serviceEndpoint")]
        service_endpoint: String,
    },
    RemoveService {
        id: String,
    },
}

impl UpdateOperation {
    /// The id of the verification method or service this operation targets.
    pub fn target_id(&self) -> &str {
        match self {
            Self::AddVerificationMethod { id, .. }
            | Self::RemoveVerificationMethod { id }
            | Self::AddService { id, .. }
            | Self::RemoveService { id } => id.as_str(),
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddVerificationMethod { .. } => "add-verification-method",
            Self::RemoveVerificationMethod { .. } => "remove-verification-method",
            Self::AddService { .. } => "add-service",
            Self::RemoveService { .. } => "remove-service",
        }
    }
}

fn default_verification_method_type() -> String {
    ED25519_VERIFICATION_KEY_2020.to_string()
}

fn deserialize_key_purpose_o<'de, D>(deserializer: D) -> Result<Option<KeyPurpose>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let property_o: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    match property_o.as_deref() {
        None | Some(VERIFICATION_METHOD_PROPERTY) => Ok(None),
        Some(property) => KeyPurpose::from_str(property)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
