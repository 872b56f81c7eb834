use crate::Error;

/// The representation a DID document is requested in.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ResolutionFormat {
    /// Plain JSON; the document carries no "@context".
    #[default]
    DidJson,
    /// JSON-LD; the document carries the DID core "@context".
    DidLdJson,
}

impl ResolutionFormat {
    pub fn as_media_type(&self) -> &'static str {
        match self {
            Self::DidJson => "application/did+json",
            Self::DidLdJson => "application/did+ld+json",
        }
    }
    pub fn includes_context(&self) -> bool {
        matches!(self, Self::DidLdJson)
    }
}

impl std::fmt::Display for ResolutionFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_media_type())
    }
}

impl std::str::FromStr for ResolutionFormat {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application/did+json" => Ok(Self::DidJson),
            "application/did+ld+json" => Ok(Self::DidLdJson),
            _ => Err(Error::Serialization(
                format!("unsupported DID document representation {:?}", s).into(),
            )),
        }
    }
}
