//! Textual encodings of raw public key bytes.  Two forms are supported, and they are mutually
//! derivable without loss:
//!
//! - multibase: `"z" + base58btc(raw_key_bytes)`.  The raw key is NOT multicodec-prefixed.
//! - base58: `base58btc(raw_key_bytes)` with no prefix at all.

use crate::{Error, Result};

/// Length of a raw Ed25519 public key.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = ed25519_dalek::PUBLIC_KEY_LENGTH;

const BASE58BTC_PREFIX: char = 'z';

pub fn encode_multibase(raw_key_bytes: &[u8]) -> String {
    multibase::encode(multibase::Base::Base58Btc, raw_key_bytes)
}

pub fn decode_multibase(s: &str) -> Result<Vec<u8>> {
    if !s.starts_with(BASE58BTC_PREFIX) {
        return Err(Error::InvalidEncoding(
            format!(
                "multibase string {:?} does not start with the base58btc prefix 'z'",
                s
            )
            .into(),
        ));
    }
    let (base, raw_key_bytes) = multibase::decode(s)
        .map_err(|e| Error::InvalidEncoding(format!("multibase string {:?}: {}", s, e).into()))?;
    debug_assert_eq!(base, multibase::Base::Base58Btc);
    Ok(raw_key_bytes)
}

pub fn encode_base58(raw_key_bytes: &[u8]) -> String {
    bs58::encode(raw_key_bytes).into_string()
}

pub fn decode_base58(s: &str) -> Result<Vec<u8>> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| Error::InvalidEncoding(format!("base58 string {:?}: {}", s, e).into()))
}

/// Converts a base58 key string into its canonical multibase form, validating it on the way.
pub fn base58_to_multibase(base58: &str) -> Result<String> {
    decode_base58(base58)?;
    Ok(format!("{}{}", BASE58BTC_PREFIX, base58))
}

/// Strips the multibase prefix, validating that the remainder is base58btc.
pub fn multibase_to_base58(multibase: &str) -> Result<String> {
    decode_multibase(multibase)?;
    Ok(multibase[BASE58BTC_PREFIX.len_utf8()..].to_string())
}

/// Interprets raw key bytes as an Ed25519 public key.
pub fn ed25519_verifying_key(raw_key_bytes: &[u8]) -> Result<ed25519_dalek::VerifyingKey> {
    let key_array: &[u8; ED25519_PUBLIC_KEY_LENGTH] = raw_key_bytes.try_into().map_err(|_| {
        Error::InvalidEncoding(
            format!(
                "expected {} bytes of Ed25519 public key, got {}",
                ED25519_PUBLIC_KEY_LENGTH,
                raw_key_bytes.len()
            )
            .into(),
        )
    })?;
    ed25519_dalek::VerifyingKey::from_bytes(key_array)
        .map_err(|e| Error::InvalidEncoding(format!("not an Ed25519 point: {}", e).into()))
}
