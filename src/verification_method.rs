use crate::{
    key_codec, verification_method_selector::ED25519_TYPE_PREFIX, Error, KeyMaterial, Result, DID,
};

/// Verification method type for Ed25519 keys encoded as multibase.
pub const ED25519_VERIFICATION_KEY_2020: &str = "Ed25519VerificationKey2020";
/// Fragment of the verification method derived from the key a DID was created with.
pub const DID_ROOT_KEY_FRAGMENT: &str = "did-root-key";

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VerificationMethod {
    /// Either a full DID URL (`<did>#<fragment>`) or a relative one (`#<fragment>`).
    pub id: String,
    pub r#type: String,
    pub controller: DID,
    #[serde(flatten)]
    pub key_material: KeyMaterial,
}

impl VerificationMethod {
    /// Convenience method for making a well-formed Ed25519VerificationKey2020 entry whose key
    /// material is the multibase encoding of the given public key.
    pub fn ed25519_verification_key_2020(
        controller: DID,
        fragment: &str,
        verifying_key: &ed25519_dalek::VerifyingKey,
    ) -> Self {
        Self {
            id: controller.with_fragment(fragment),
            r#type: ED25519_VERIFICATION_KEY_2020.into(),
            controller,
            key_material: KeyMaterial::multibase_from_raw(verifying_key.as_bytes()),
        }
    }
    /// The fragment part of the id, without the '#'.
    pub fn fragment(&self) -> Option<&str> {
        self.id.split_once('#').map(|(_, fragment)| fragment)
    }
    /// Decodes the key material into raw public key bytes.
    pub fn public_key_bytes(&self) -> Result<Vec<u8>> {
        self.key_material.decode()
    }
    pub fn verify(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::MalformedDocument(
                "verification method id must not be empty".into(),
            ));
        }
        if self.fragment().map_or(true, str::is_empty) {
            return Err(Error::MalformedDocument(
                format!(
                    "verification method id {:?} must contain a non-empty fragment",
                    self.id
                )
                .into(),
            ));
        }
        verify_key_material(&self.r#type, &self.key_material)
    }
}

/// Checks that `key_material` decodes, and for Ed25519 verification method types, that it is a
/// 32-byte Ed25519 public key.
pub(crate) fn verify_key_material(r#type: &str, key_material: &KeyMaterial) -> Result<()> {
    let public_key_bytes = key_material.decode()?;
    if r#type.starts_with(ED25519_TYPE_PREFIX) {
        key_codec::ed25519_verifying_key(&public_key_bytes)?;
    }
    Ok(())
}
