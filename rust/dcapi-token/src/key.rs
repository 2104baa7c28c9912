//! HS256 token signing key.

use crate::InvalidToken;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dcapi_common::Settings;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// JOSE header of every token this crate signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signing algorithm.
    pub alg: String,
    /// Token type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
}

impl Header {
    /// The only accepted algorithm.
    pub const ALGORITHM: &'static str = "HS256";

    pub(crate) fn hs256() -> Self {
        Self {
            alg: Self::ALGORITHM.into(),
            typ: Some("JWT".into()),
        }
    }
}

/// Shared secret used to sign and verify tokens.
#[derive(Clone)]
pub struct TokenKey(Hmac<Sha256>);

impl TokenKey {
    /// Create a key from a shared secret.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self(Hmac::new_from_slice(secret.as_ref()).expect("HMAC can take key of any size"))
    }

    /// Create a key from the configured token secret.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_token_secret())
    }

    /// Sign `message`, returning the raw MAC.
    pub(crate) fn sign(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.0.clone();
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    /// Check `signature` over `message` in constant time.
    pub(crate) fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), InvalidToken> {
        let mut mac = self.0.clone();
        mac.update(message);
        mac.verify_slice(signature)
            .map_err(|_| InvalidToken::Signature)
    }
}

impl std::fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenKey(..)")
    }
}

/// Encode bytes as unpadded base64url.
pub(crate) fn encode_segment(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode an unpadded base64url segment.
pub(crate) fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, InvalidToken> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| InvalidToken::Malformed(format!("{name} is not base64url: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_verifies_its_own_signature() {
        let key = TokenKey::new("secret");
        let signature = key.sign(b"header.payload");
        assert_eq!(key.verify(b"header.payload", &signature), Ok(()));
    }

    #[test]
    fn it_rejects_a_signature_from_another_key() {
        let signature = TokenKey::new("other").sign(b"header.payload");
        assert_eq!(
            TokenKey::new("secret").verify(b"header.payload", &signature),
            Err(InvalidToken::Signature)
        );
    }

    #[test]
    fn it_rejects_a_signature_over_another_message() {
        let key = TokenKey::new("secret");
        let signature = key.sign(b"header.payload");
        assert_eq!(
            key.verify(b"header.tampered", &signature),
            Err(InvalidToken::Signature)
        );
    }

    #[test]
    fn it_does_not_print_the_secret() {
        let key = TokenKey::new("hunter2");
        assert_eq!(format!("{key:?}"), "TokenKey(..)");
    }
}
