use std::collections::HashSet;

use crate::{
    service, verification_method, Error, KeyMaterial, KeyPurpose, Result, UpdateOperation, DID,
};

/// Accumulates an ordered batch of DID document mutations.  The builder is consumed by
/// [`UpdateOperationBuilder::build`], which validates the batch and freezes it into
/// [`UpdateOperations`].
#[derive(Clone, Debug, Default)]
pub struct UpdateOperationBuilder {
    operation_v: Vec<UpdateOperation>,
}

impl UpdateOperationBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    /// Adds a verification method that is only listed under "verificationMethod".
    pub fn add_verification_method(
        self,
        id: impl Into<String>,
        r#type: impl Into<String>,
        controller: DID,
        key_material: KeyMaterial,
    ) -> Self {
        self.push(UpdateOperation::AddVerificationMethod {
            id: id.into(),
            r#type: r#type.into(),
            controller_o: Some(controller),
            key_material,
            key_purpose_o: None,
        })
    }
    /// Adds a verification method and references it from the given verification relationship.
    pub fn add_verification_method_with_purpose(
        self,
        id: impl Into<String>,
        r#type: impl Into<String>,
        controller: DID,
        key_material: KeyMaterial,
        key_purpose: KeyPurpose,
    ) -> Self {
        self.push(UpdateOperation::AddVerificationMethod {
            id: id.into(),
            r#type: r#type.into(),
            controller_o: Some(controller),
            key_material,
            key_purpose_o: Some(key_purpose),
        })
    }
    pub fn remove_verification_method(self, id: impl Into<String>) -> Self {
        self.push(UpdateOperation::RemoveVerificationMethod { id: id.into() })
    }
    pub fn add_service(
        self,
        id: impl Into<String>,
        r#type: impl Into<String>,
        service_endpoint: impl Into<String>,
    ) -> Self {
        self.push(UpdateOperation::AddService {
            id: id.into(),
            r#type: r#type.into(),
            service_endpoint: service_endpoint.into(),
        })
    }
    pub fn remove_service(self, id: impl Into<String>) -> Self {
        self.push(UpdateOperation::RemoveService { id: id.into() })
    }
    /// Validates and freezes the batch.  Validation happens here, before anything reaches the
    /// ledger: the batch must be nonempty, added ids must carry a fragment, no two add operations
    /// of the same kind may target the same id, key material must decode (to an Ed25519 public key
    /// for Ed25519 types), and service endpoints must parse as URIs.
    pub fn build(self) -> Result<UpdateOperations> {
        if self.operation_v.is_empty() {
            return Err(Error::EmptyBatch);
        }
        let mut added_verification_method_fragment_s = HashSet::new();
        let mut added_service_fragment_s = HashSet::new();
        for (operation_index, operation) in self.operation_v.iter().enumerate() {
            match operation {
                UpdateOperation::AddVerificationMethod {
                    id,
                    r#type,
                    key_material,
                    ..
                } => {
                    if !added_verification_method_fragment_s.insert(fragment_of(id)?) {
                        return Err(Error::DuplicateOperationTarget {
                            operation_index,
                            target: id.clone(),
                        });
                    }
                    verification_method::verify_key_material(r#type, key_material)?;
                }
                UpdateOperation::AddService {
                    id,
                    service_endpoint,
                    ..
                } => {
                    if !added_service_fragment_s.insert(fragment_of(id)?) {
                        return Err(Error::DuplicateOperationTarget {
                            operation_index,
                            target: id.clone(),
                        });
                    }
                    service::verify_service_endpoint(service_endpoint)?;
                }
                UpdateOperation::RemoveVerificationMethod { .. }
                | UpdateOperation::RemoveService { .. } => {}
            }
        }
        Ok(UpdateOperations(self.operation_v))
    }
    fn push(mut self, operation: UpdateOperation) -> Self {
        self.operation_v.push(operation);
        self
    }
}

/// A validated, immutable, ordered batch of update operations.
#[derive(
    Clone, Debug, derive_more::Deref, Eq, PartialEq, serde::Deserialize, serde::Serialize,
)]
#[serde(
    try_from = "Vec<UpdateOperation>",
    into = "Vec<UpdateOperation>"
)]
pub struct UpdateOperations(Vec<UpdateOperation>);

impl UpdateOperations {
    pub fn builder() -> UpdateOperationBuilder {
        UpdateOperationBuilder::new()
    }
    pub fn into_vec(self) -> Vec<UpdateOperation> {
        self.0
    }
}

impl TryFrom<Vec<UpdateOperation>> for UpdateOperations {
    type Error = Error;
    fn try_from(operation_v: Vec<UpdateOperation>) -> Result<Self> {
        UpdateOperationBuilder { operation_v }.build()
    }
}

impl From<UpdateOperations> for Vec<UpdateOperation> {
    fn from(update_operations: UpdateOperations) -> Self {
        update_operations.0
    }
}

/// Ids within one batch all address the same DID document, so they are compared by fragment.
/// Added ids must carry a non-empty fragment.
fn fragment_of(id: &str) -> Result<&str> {
    match id.split_once('#') {
        Some((_, fragment)) if !fragment.is_empty() => Ok(fragment),
        _ => Err(Error::MalformedDocument(
            format!("id {:?} must contain a non-empty fragment", id).into(),
        )),
    }
}
