//! Opaque session-token generation.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

/// Generate a cryptographically random session token.
///
/// Returns a URL-safe base64 string (43 characters) from 32 random bytes.
/// The token carries no structure or claims; it is only meaningful as a
/// lookup key into the sessions table, whose unique constraint enforces
/// global uniqueness at issuance.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
