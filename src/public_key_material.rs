use std::collections::HashSet;

use crate::{Error, KeyPurpose, Result, VerificationMethod, DID};

/// The verification methods of a DID document together with the verification relationships that
/// reference them.  References may be relative (`#fragment`) or absolute (`<did>#fragment`).
#[derive(Clone, Debug, Default, serde::Deserialize, Eq, PartialEq, serde::Serialize)]
pub struct PublicKeyMaterial {
    #[serde(rename = "verificationMethod", default)]
    pub verification_method_v: Vec<VerificationMethod>,
    #[serde(rename = "authentication", default, skip_serializing_if = "Vec::is_empty")]
    pub authentication_v: Vec<String>,
    #[serde(rename = "assertionMethod", default, skip_serializing_if = "Vec::is_empty")]
    pub assertion_method_v: Vec<String>,
    #[serde(rename = "keyAgreement", default, skip_serializing_if = "Vec::is_empty")]
    pub key_agreement_v: Vec<String>,
    #[serde(
        rename = "capabilityInvocation",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub capability_invocation_v: Vec<String>,
    #[serde(
        rename = "capabilityDelegation",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub capability_delegation_v: Vec<String>,
}

impl PublicKeyMaterial {
    /// Returns the references listed under the given KeyPurpose, i.e. the elements of the
    /// "authentication", "assertionMethod", "keyAgreement", "capabilityInvocation", or
    /// "capabilityDelegation" field of the DID document.
    pub fn references_for_purpose(&self, key_purpose: KeyPurpose) -> &Vec<String> {
        match key_purpose {
            KeyPurpose::Authentication => &self.authentication_v,
            KeyPurpose::AssertionMethod => &self.assertion_method_v,
            KeyPurpose::KeyAgreement => &self.key_agreement_v,
            KeyPurpose::CapabilityInvocation => &self.capability_invocation_v,
            KeyPurpose::CapabilityDelegation => &self.capability_delegation_v,
        }
    }
    pub fn references_for_purpose_mut(&mut self, key_purpose: KeyPurpose) -> &mut Vec<String> {
        match key_purpose {
            KeyPurpose::Authentication => &mut self.authentication_v,
            KeyPurpose::AssertionMethod => &mut self.assertion_method_v,
            KeyPurpose::KeyAgreement => &mut self.key_agreement_v,
            KeyPurpose::CapabilityInvocation => &mut self.capability_invocation_v,
            KeyPurpose::CapabilityDelegation => &mut self.capability_delegation_v,
        }
    }
    pub fn verification_method(&self, did: &DID, id: &str) -> Option<&VerificationMethod> {
        let absolute_id = absolute_reference(did, id);
        self.verification_method_v
            .iter()
            .find(|verification_method| absolute_reference(did, &verification_method.id) == absolute_id)
    }
    /// Returns the verification methods referenced from any of the given purposes, in
    /// verificationMethod order and without repetition.
    pub fn verification_methods_for_purposes<'a>(
        &'a self,
        did: &'a DID,
        key_purpose_v: &'a [KeyPurpose],
    ) -> impl std::iter::Iterator<Item = &'a VerificationMethod> + 'a {
        let referenced_s = key_purpose_v
            .iter()
            .flat_map(|&key_purpose| self.references_for_purpose(key_purpose).iter())
            .map(|reference| absolute_reference(did, reference))
            .collect::<HashSet<String>>();
        self.verification_method_v
            .iter()
            .filter(move |verification_method| {
                referenced_s.contains(&absolute_reference(did, &verification_method.id))
            })
    }
    /// Removes the verification method with the given id along with every reference to it.
    /// Returns false if there was no such verification method.
    pub fn remove_verification_method(&mut self, did: &DID, id: &str) -> bool {
        let absolute_id = absolute_reference(did, id);
        let len_before = self.verification_method_v.len();
        self.verification_method_v.retain(|verification_method| {
            absolute_reference(did, &verification_method.id) != absolute_id
        });
        if self.verification_method_v.len() == len_before {
            return false;
        }
        for key_purpose in KeyPurpose::VARIANTS {
            self.references_for_purpose_mut(key_purpose)
                .retain(|reference| absolute_reference(did, reference) != absolute_id);
        }
        true
    }
    pub fn verify(&self, did: &DID) -> Result<()> {
        let mut verification_method_id_s = HashSet::with_capacity(self.verification_method_v.len());
        for verification_method in &self.verification_method_v {
            verification_method.verify()?;
            if !verification_method_id_s.insert(absolute_reference(did, &verification_method.id)) {
                return Err(Error::MalformedDocument(
                    format!(
                        "duplicate verification method id {:?}",
                        verification_method.id
                    )
                    .into(),
                ));
            }
        }
        for key_purpose in KeyPurpose::VARIANTS {
            for reference in self.references_for_purpose(key_purpose) {
                if !verification_method_id_s.contains(&absolute_reference(did, reference)) {
                    return Err(Error::MalformedDocument(
                        format!(
                            "{} reference {:?} does not match any listed verification method",
                            key_purpose, reference
                        )
                        .into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Expands a relative reference (`#fragment`) against `did`.  Absolute references are returned
/// unchanged.
pub fn absolute_reference(did: &DID, reference: &str) -> String {
    if reference.starts_with('#') {
        did.with_fragment(reference)
    } else {
        reference.to_string()
    }
}
