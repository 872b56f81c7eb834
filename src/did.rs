use std::str::FromStr;

use crate::{key_codec, Error, Network, Result, TopicId};

const DID_HEDERA_PREFIX: &str = "did:hedera:";

/// A did:hedera DID, having the form
///
/// ```text
/// did:hedera:<network>:<base58btc(ed25519 public key)>_<topic id>
/// ```
///
/// e.g. `did:hedera:testnet:4eVmx7hCbf1mB1okzKUHWzcgWPnDf1yhuY7xLpWM3mDD_0.0.7319830`.  The
/// public key is the one the DID was created with, and the topic is the ledger topic on which all
/// of the DID's messages are recorded.  Once constructed, a DID is never modified.
#[derive(
    Clone,
    Debug,
    derive_more::Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde_with::DeserializeFromStr,
    serde_with::SerializeDisplay,
)]
#[display(fmt = "{}", did_string)]
pub struct DID {
    did_string: String,
    network: Network,
    topic_id: TopicId,
}

impl DID {
    pub fn new(network: Network, public_key_bytes: &[u8], topic_id: TopicId) -> Result<Self> {
        key_codec::ed25519_verifying_key(public_key_bytes)?;
        Ok(Self {
            did_string: format!(
                "{}{}:{}_{}",
                DID_HEDERA_PREFIX,
                network,
                key_codec::encode_base58(public_key_bytes),
                topic_id
            ),
            network,
            topic_id,
        })
    }
    pub fn as_str(&self) -> &str {
        self.did_string.as_str()
    }
    pub fn network(&self) -> Network {
        self.network
    }
    pub fn topic_id(&self) -> TopicId {
        self.topic_id
    }
    /// The base58 encoding of the public key that the DID was created with.
    pub fn public_key_base58(&self) -> &str {
        let method_specific_id = self.method_specific_id();
        let end = method_specific_id
            .rfind('_')
            .expect("programmer error: DID was validated at construction");
        &method_specific_id[..end]
    }
    /// Returns `<did>#<fragment>`.  A leading '#' on `fragment` is accepted and not duplicated.
    pub fn with_fragment(&self, fragment: &str) -> String {
        format!("{}#{}", self.did_string, fragment.trim_start_matches('#'))
    }
    fn method_specific_id(&self) -> &str {
        // Skip "did:hedera:<network>:".
        let network_len = self.network.as_str().len();
        &self.did_string[DID_HEDERA_PREFIX.len() + network_len + 1..]
    }
}

impl AsRef<str> for DID {
    fn as_ref(&self) -> &str {
        self.did_string.as_str()
    }
}

impl FromStr for DID {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let remainder = s.strip_prefix(DID_HEDERA_PREFIX).ok_or_else(|| {
            Error::MalformedDID(format!("expected {:?} prefix in {:?}", DID_HEDERA_PREFIX, s).into())
        })?;
        let (network_str, method_specific_id) = remainder
            .split_once(':')
            .ok_or_else(|| Error::MalformedDID(format!("missing network in {:?}", s).into()))?;
        let network = Network::from_str(network_str)?;
        let (public_key_base58, topic_id_str) =
            method_specific_id.rsplit_once('_').ok_or_else(|| {
                Error::MalformedDID(format!("missing topic id in {:?}", s).into())
            })?;
        let public_key_bytes = key_codec::decode_base58(public_key_base58)
            .map_err(|e| Error::MalformedDID(format!("{:?}: {}", s, e).into()))?;
        let topic_id = TopicId::from_str(topic_id_str)?;
        let did = Self::new(network, &public_key_bytes, topic_id)
            .map_err(|e| Error::MalformedDID(format!("{:?}: {}", s, e).into()))?;
        // Reject non-canonical encodings, so that string equality is DID equality.
        if did.did_string != s {
            return Err(Error::MalformedDID(
                format!("non-canonical DID {:?}", s).into(),
            ));
        }
        Ok(did)
    }
}
