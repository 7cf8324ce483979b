use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

/// Context string mixed into the signing key derived from the admin password
const SIGNING_KEY_CONTEXT: &str = "chakra-stones/admin-token/v1";

fn new_mac(key: &[u8]) -> Result<HmacSha256, InternalError> {
    HmacSha256::new_from_slice(key).map_err(|e| InternalError::crypto("hmac_init", e.to_string()))
}

/// Compute HMAC-SHA256 and return it as a hexadecimal string
pub fn hmac_sha256_hex(key: &str, message: &str) -> Result<String, InternalError> {
    let mut mac = new_mac(key.as_bytes())?;
    mac.update(message.as_bytes());
    Ok(format!("{:x}", mac.finalize().into_bytes()))
}

/// Compare a submitted secret against the expected one in constant time
///
/// Both values are passed through HMAC-SHA256 under a random one-off key, so
/// the comparison always runs over two 32-byte digests regardless of input
/// lengths.
pub fn secrets_match(expected: &str, candidate: &str) -> Result<bool, InternalError> {
    let mut key = [0u8; 32];
    rand::rng().fill(&mut key);

    let mut expected_mac = new_mac(&key)?;
    expected_mac.update(expected.as_bytes());
    let expected_digest = expected_mac.finalize().into_bytes();

    let mut candidate_mac = new_mac(&key)?;
    candidate_mac.update(candidate.as_bytes());

    Ok(candidate_mac.verify_slice(&expected_digest).is_ok())
}

/// Derive a token signing key from the admin password
///
/// Used when no dedicated ADMIN_TOKEN_SECRET is configured. Rotating the
/// password invalidates every outstanding token.
pub fn derive_signing_key(admin_password: &str) -> Result<String, InternalError> {
    hmac_sha256_hex(admin_password, SIGNING_KEY_CONTEXT)
}

/// Generate a random value suitable for ADMIN_TOKEN_SECRET
///
/// 32 random bytes, URL-safe base64 without padding (43 characters).
pub fn generate_token_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
