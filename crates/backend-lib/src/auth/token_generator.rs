// ============================
// crates/backend-lib/src/auth/token_generator.rs
// ============================
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
/** Secure identifier generation for issued tokens
Token identifiers are the only handle used to revoke a token, so a
collision would let one user revoke another's session. */
use rand::RngCore;

/// Token identifier size in bytes (16 bytes = 128 bits of entropy)
const TOKEN_ID_BYTES: usize = 16;

/** Generate a fresh token identifier
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_token_id() -> String {
    generate_secure_token_with_size(TOKEN_ID_BYTES)
}

/** Generate a cryptographically secure random token with specified size
`rand::rng()` is a ChaCha-based CSPRNG reseeded from the OS.
# Arguments
* `bytes` - The size of the random token in bytes
# Returns
A base64 URL-safe encoded string without padding */
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buffer);
    URL_SAFE_NO_PAD.encode(buffer)
}
