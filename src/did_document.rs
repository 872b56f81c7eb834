use std::collections::HashSet;

use crate::{
    key_codec, public_key_material::absolute_reference, verification_method,
    verification_method::DID_ROOT_KEY_FRAGMENT,
    Error, KeyPurpose, PublicKeyMaterial, Result, Service, UpdateOperation, UpdateOperations,
    VerificationMethod, DID,
};

/// The JSON-LD context of the DID core data model.
pub const DID_CORE_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Data model for did:hedera DID documents.  A DIDDocument is a value: applying updates produces a
/// new DIDDocument and leaves the original untouched, so historical states stay inspectable.
///
/// To deserialize from untrusted input, use [`DIDDocument::parse`] or
/// [`DIDDocument::parse_json_bytes`], which also check the document-level invariants that serde
/// alone does not (unique service ids, references that resolve to verification methods).
///
/// The fields are public for inspection.  The validated ways to obtain a document are
/// [`DIDDocument::create_root`], [`DIDDocument::parse`], [`DIDDocument::parse_json_bytes`] and
/// [`DIDDocument::apply_update_operations`]; a document edited field by field must be checked
/// with [`DIDDocument::verify`] before use.
#[derive(Clone, Debug, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct DIDDocument {
    #[serde(rename = "@context", default, skip_serializing_if = "Vec::is_empty")]
    pub context_v: Vec<String>,
    /// The serde-rename to "id" is intentional.  The DID spec mandates the field name "id", but
    /// the field value does have to be a DID.
    #[serde(rename = "id")]
    pub did: DID,
    #[serde(rename = "controller", default, skip_serializing_if = "Option::is_none")]
    pub controller_o: Option<DID>,
    #[serde(flatten)]
    pub public_key_material: PublicKeyMaterial,
    #[serde(rename = "service", default, skip_serializing_if = "Vec::is_empty")]
    pub service_v: Vec<Service>,
}

impl DIDDocument {
    /// Forms the document a DID starts out with: a single Ed25519 verification method derived
    /// from the owner's public key, referenced as the controlling key.
    pub fn create_root(did: DID, owner_verifying_key: &ed25519_dalek::VerifyingKey) -> Self {
        let root_verification_method = VerificationMethod::ed25519_verification_key_2020(
            did.clone(),
            DID_ROOT_KEY_FRAGMENT,
            owner_verifying_key,
        );
        let root_key_id = root_verification_method.id.clone();
        Self {
            context_v: vec![DID_CORE_CONTEXT.to_string()],
            controller_o: Some(did.clone()),
            did,
            public_key_material: PublicKeyMaterial {
                verification_method_v: vec![root_verification_method],
                authentication_v: vec![root_key_id.clone()],
                assertion_method_v: vec![root_key_id.clone()],
                capability_invocation_v: vec![root_key_id],
                ..Default::default()
            },
            service_v: Vec::new(),
        }
    }
    /// The marker left behind once a DID is deactivated: the identifier with no verification
    /// methods, relationships, or services.
    pub fn tombstone(did: DID) -> Self {
        Self {
            context_v: vec![DID_CORE_CONTEXT.to_string()],
            did,
            controller_o: None,
            public_key_material: PublicKeyMaterial::default(),
            service_v: Vec::new(),
        }
    }
    pub fn is_tombstone(&self) -> bool {
        self.controller_o.is_none()
            && self.public_key_material == PublicKeyMaterial::default()
            && self.service_v.is_empty()
    }
    /// Parses a JSON value in the application/did+json shape and verifies it.
    pub fn parse(value: &serde_json::Value) -> Result<Self> {
        let did_document = Self::deserialize_document(serde_json::from_value(value.clone()))?;
        did_document.verify()?;
        Ok(did_document)
    }
    /// Same as [`DIDDocument::parse`], but from raw bytes.
    pub fn parse_json_bytes(bytes: &[u8]) -> Result<Self> {
        let did_document = Self::deserialize_document(serde_json::from_slice(bytes))?;
        did_document.verify()?;
        Ok(did_document)
    }
    /// Canonical (JCS) serialization, which is what gets signed and recorded on the ledger.
    pub fn serialize_canonically(&self) -> Result<Vec<u8>> {
        serde_json_canonicalizer::to_vec(self).map_err(|e| {
            Error::Serialization(format!("DID document to canonical JSON: {}", e).into())
        })
    }
    pub fn verification_method_v(&self) -> &[VerificationMethod] {
        &self.public_key_material.verification_method_v
    }
    /// Accepts either a relative (`#fragment`) or absolute id.
    pub fn find_verification_method(&self, id: &str) -> Option<&VerificationMethod> {
        self.public_key_material.verification_method(&self.did, id)
    }
    /// Accepts either a relative (`#fragment`) or absolute id.
    pub fn find_service(&self, id: &str) -> Option<&Service> {
        let absolute_id = absolute_reference(&self.did, id);
        self.service_v
            .iter()
            .find(|service| absolute_reference(&self.did, &service.id) == absolute_id)
    }
    /// The verification methods whose keys may sign updates to and deactivation of this document.
    pub fn controlling_verification_methods(
        &self,
    ) -> impl std::iter::Iterator<Item = &VerificationMethod> {
        self.public_key_material
            .verification_methods_for_purposes(&self.did, &KeyPurpose::CONTROLLING_VARIANTS)
    }
    /// Checks that `verifying_key` matches the key material of a controlling verification method.
    /// The comparison is on raw key bytes, so it holds regardless of which textual encoding the
    /// document uses.
    pub fn authorize_signing_key(&self, verifying_key: &ed25519_dalek::VerifyingKey) -> Result<()> {
        let mut expected_v = Vec::new();
        for verification_method in self.controlling_verification_methods() {
            let public_key_bytes = verification_method.public_key_bytes()?;
            if public_key_bytes.as_slice() == verifying_key.as_bytes() {
                return Ok(());
            }
            expected_v.push(verification_method.key_material.to_multibase()?);
        }
        Err(Error::UnauthorizedSigningKey {
            did: self.did.clone(),
            expected: expected_v,
            actual: key_codec::encode_multibase(verifying_key.as_bytes()),
        })
    }
    /// Applies the operations in order, producing the new document state.  Nothing is modified
    /// if any operation fails.
    pub fn apply_update_operations(&self, update_operations: &UpdateOperations) -> Result<Self> {
        let mut new_did_document = self.clone();
        for (operation_index, update_operation) in update_operations.iter().enumerate() {
            new_did_document.apply_update_operation(operation_index, update_operation)?;
        }
        new_did_document.verify()?;
        if new_did_document
            .controlling_verification_methods()
            .next()
            .is_none()
        {
            return Err(Error::MalformedDocument(
                "update would leave no verification method able to control the DID".into(),
            ));
        }
        Ok(new_did_document)
    }
    pub fn verify(&self) -> Result<()> {
        if let Some(controller) = self.controller_o.as_ref() {
            if controller.network() != self.did.network() {
                return Err(Error::MalformedDocument(
                    "controller DID must be on the same network as the DID".into(),
                ));
            }
        }
        self.public_key_material.verify(&self.did)?;
        let mut service_id_s = HashSet::with_capacity(self.service_v.len());
        for service in &self.service_v {
            service.verify()?;
            if !service_id_s.insert(absolute_reference(&self.did, &service.id)) {
                return Err(Error::MalformedDocument(
                    format!("duplicate service id {:?}", service.id).into(),
                ));
            }
        }
        Ok(())
    }
    /// Returns a copy with the JSON-LD context set or stripped, as the given format requires.
    pub(crate) fn with_context(&self, include_context: bool) -> Self {
        let mut did_document = self.clone();
        did_document.context_v = if include_context {
            vec![DID_CORE_CONTEXT.to_string()]
        } else {
            Vec::new()
        };
        did_document
    }

    fn deserialize_document(
        deserialize_result: serde_json::Result<Self>,
    ) -> Result<Self> {
        deserialize_result.map_err(|e| Error::MalformedDocument(e.to_string().into()))
    }
    fn apply_update_operation(
        &mut self,
        operation_index: usize,
        update_operation: &UpdateOperation,
    ) -> Result<()> {
        let target = absolute_reference(&self.did, update_operation.target_id());
        match update_operation {
            UpdateOperation::AddVerificationMethod {
                r#type,
                controller_o,
                key_material,
                key_purpose_o,
                ..
            } => {
                if self.find_verification_method(&target).is_some() {
                    return Err(Error::DuplicateOperationTarget {
                        operation_index,
                        target,
                    });
                }
                verification_method::verify_key_material(r#type, key_material)?;
                let controller = controller_o.clone().unwrap_or_else(|| self.did.clone());
                self.public_key_material
                    .verification_method_v
                    .push(VerificationMethod {
                        id: target.clone(),
                        r#type: r#type.clone(),
                        controller,
                        key_material: key_material.clone(),
                    });
                if let Some(key_purpose) = key_purpose_o {
                    self.public_key_material
                        .references_for_purpose_mut(*key_purpose)
                        .push(target);
                }
            }
            UpdateOperation::RemoveVerificationMethod { .. } => {
                if !self
                    .public_key_material
                    .remove_verification_method(&self.did, &target)
                {
                    return Err(Error::OperationTargetNotFound {
                        operation_index,
                        target,
                    });
                }
            }
            UpdateOperation::AddService {
                r#type,
                service_endpoint,
                ..
            } => {
                if self.find_service(&target).is_some() {
                    return Err(Error::DuplicateOperationTarget {
                        operation_index,
                        target,
                    });
                }
                self.service_v.push(Service {
                    id: target,
                    r#type: r#type.clone(),
                    service_endpoint: service_endpoint.clone(),
                });
            }
            UpdateOperation::RemoveService { .. } => {
                let did = &self.did;
                let len_before = self.service_v.len();
                self.service_v
                    .retain(|service| absolute_reference(did, &service.id) != target);
                if self.service_v.len() == len_before {
                    return Err(Error::OperationTargetNotFound {
                        operation_index,
                        target,
                    });
                }
            }
        }
        Ok(())
    }
}
