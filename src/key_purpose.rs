use crate::Error;

/// Enumeration of the verification relationships a verification method can be referenced from,
/// as specified by the DID spec.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum KeyPurpose {
    Authentication,
    AssertionMethod,
    KeyAgreement,
    CapabilityInvocation,
    CapabilityDelegation,
}

impl KeyPurpose {
    /// An ordered array of all the variants in KeyPurpose.
    pub const VARIANTS: [KeyPurpose; 5] = [
        KeyPurpose::Authentication,
        KeyPurpose::AssertionMethod,
        KeyPurpose::KeyAgreement,
        KeyPurpose::CapabilityInvocation,
        KeyPurpose::CapabilityDelegation,
    ];
    /// The purposes whose keys may sign updates to and deactivation of the DID document.
    pub const CONTROLLING_VARIANTS: [KeyPurpose; 2] = [
        KeyPurpose::Authentication,
        KeyPurpose::CapabilityInvocation,
    ];
    /// Produce the camelCase string for this variant, as used in the DID doc.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyPurpose::Authentication => "authentication",
            KeyPurpose::AssertionMethod => "assertionMethod",
            KeyPurpose::KeyAgreement => "keyAgreement",
            KeyPurpose::CapabilityInvocation => "capabilityInvocation",
            KeyPurpose::CapabilityDelegation => "capabilityDelegation",
        }
    }
}

impl std::fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for KeyPurpose {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "authentication" => Ok(KeyPurpose::Authentication),
            "assertionMethod" => Ok(KeyPurpose::AssertionMethod),
            "keyAgreement" => Ok(KeyPurpose::KeyAgreement),
            "capabilityInvocation" => Ok(KeyPurpose::CapabilityInvocation),
            "capabilityDelegation" => Ok(KeyPurpose::CapabilityDelegation),
            _ => Err(Error::MalformedDocument(
                format!("unrecognized verification relationship {:?}", s).into(),
            )),
        }
    }
}
