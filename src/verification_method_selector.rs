//! Picks the canonical key entry out of a DID document's verification methods and pulls out its
//! raw key bytes.  Both functions are pure.

use crate::{Error, Result, VerificationMethod};

/// Prefix of the verification method types that carry Ed25519 keys.
pub const ED25519_TYPE_PREFIX: &str = "Ed25519";

/// Returns the first verification method whose type starts with `preferred_type_prefix`, falling
/// back to the first verification method overall.
pub fn select_verification_method<'a>(
    verification_method_v: &'a [VerificationMethod],
    preferred_type_prefix: &str,
) -> Result<&'a VerificationMethod> {
    verification_method_v
        .iter()
        .find(|verification_method| verification_method.r#type.starts_with(preferred_type_prefix))
        .or_else(|| verification_method_v.first())
        .ok_or(Error::NoVerificationMethod)
}

/// Decodes the key material of `verification_method`, whichever form it is held in.
pub fn extract_key_material(verification_method: &VerificationMethod) -> Result<Vec<u8>> {
    verification_method.public_key_bytes()
}
