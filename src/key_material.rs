use crate::{key_codec, Error, Result};

/// The public key of a verification method, in whichever textual encoding is authoritative for it.
/// On the wire this is either the `publicKeyMultibase` or the `publicKeyBase58` field.  If a
/// document carries both, they must decode to the same bytes, and the multibase form is kept.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "KeyMaterialFields", into = "KeyMaterialFields")]
pub enum KeyMaterial {
    Multibase(String),
    Base58(String),
}

impl KeyMaterial {
    pub fn multibase_from_raw(raw_key_bytes: &[u8]) -> Self {
        Self::Multibase(key_codec::encode_multibase(raw_key_bytes))
    }
    pub fn base58_from_raw(raw_key_bytes: &[u8]) -> Self {
        Self::Base58(key_codec::encode_base58(raw_key_bytes))
    }
    /// Builds the key material from the optional wire fields, checking that at least one is
    /// present and that both agree if both are present.
    pub fn from_fields(
        public_key_multibase_o: Option<String>,
        public_key_base58_o: Option<String>,
    ) -> Result<Self> {
        match (public_key_multibase_o, public_key_base58_o) {
            (Some(public_key_multibase), Some(public_key_base58)) => {
                let multibase_bytes = key_codec::decode_multibase(&public_key_multibase)?;
                let base58_bytes = key_codec::decode_base58(&public_key_base58)?;
                if multibase_bytes != base58_bytes {
                    return Err(Error::InvalidEncoding(
                        "publicKeyMultibase and publicKeyBase58 decode to different keys".into(),
                    ));
                }
                Ok(Self::Multibase(public_key_multibase))
            }
            (Some(public_key_multibase), None) => Ok(Self::Multibase(public_key_multibase)),
            (None, Some(public_key_base58)) => Ok(Self::Base58(public_key_base58)),
            (None, None) => Err(Error::UnsupportedKeyEncoding(
                "neither publicKeyMultibase nor publicKeyBase58 is present".into(),
            )),
        }
    }
    /// Decodes to the raw key bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        match self {
            Self::Multibase(public_key_multibase) => {
                key_codec::decode_multibase(public_key_multibase)
            }
            Self::Base58(public_key_base58) => key_codec::decode_base58(public_key_base58),
        }
    }
    /// Canonical multibase form, regardless of which form is authoritative.
    pub fn to_multibase(&self) -> Result<String> {
        match self {
            Self::Multibase(public_key_multibase) => {
                key_codec::decode_multibase(public_key_multibase)?;
                Ok(public_key_multibase.clone())
            }
            Self::Base58(public_key_base58) => key_codec::base58_to_multibase(public_key_base58),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(serde::Deserialize, serde::Serialize)]
struct KeyMaterialFields {
    #[serde(rename = "publicKeyMultibase")]
    public_key_multibase_o: Option<String>,
    #[serde(rename = "publicKeyBase58")]
    public_key_base58_o: Option<String>,
}

impl TryFrom<KeyMaterialFields> for KeyMaterial {
    type Error = Error;
    fn try_from(key_material_fields: KeyMaterialFields) -> Result<Self> {
        Self::from_fields(
            key_material_fields.public_key_multibase_o,
            key_material_fields.public_key_base58_o,
        )
    }
}

impl From<KeyMaterial> for KeyMaterialFields {
    fn from(key_material: KeyMaterial) -> Self {
        match key_material {
            KeyMaterial::Multibase(public_key_multibase) => Self {
                public_key_multibase_o: Some(public_key_multibase),
                public_key_base58_o: None,
            },
            KeyMaterial::Base58(public_key_base58) => Self {
                public_key_multibase_o: None,
                public_key_base58_o: Some(public_key_base58),
            },
        }
    }
}
