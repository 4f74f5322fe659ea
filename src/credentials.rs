//! Salted password hashing and constant-time verification.
//!
//! Credentials are stored as two hex columns (salt + digest) and derived with
//! PBKDF2-HMAC-SHA256. Derivation is CPU-bound; callers run it under
//! `tokio::task::spawn_blocking` (see the admin repository).

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Iteration count sized to resist offline brute force while keeping login
/// latency in the tens of milliseconds.
pub const PBKDF2_ITERATIONS: u32 = 310_000;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// A freshly derived credential pair, both parts hex-encoded.
#[derive(Debug, Clone)]
pub struct Credential {
    pub salt: String,
    pub hash: String,
}

/// Derives a credential from a password with a fresh random salt.
#[must_use]
pub fn derive(password: &str) -> Credential {
    use rand::Rng;

    let salt_bytes: [u8; SALT_LEN] = rand::rng().random();
    let salt = encode_hex(&salt_bytes);
    let hash = derive_with_salt(password, &salt);

    Credential { salt, hash }
}

/// Recomputes the derivation with the stored salt and compares against the
/// stored digest in constant time.
///
/// Returns false for any malformed stored value (wrong length, non-hex);
/// never panics on attacker-controlled input.
#[must_use]
pub fn verify(password: &str, salt: &str, expected_hash: &str) -> bool {
    let computed = derive_with_salt(password, salt);

    if computed.len() != expected_hash.len() {
        return false;
    }

    computed
        .as_bytes()
        .ct_eq(expected_hash.as_bytes())
        .into()
}

/// Generates an unguessable 256-bit token as a 64-char hex string.
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let bytes: [u8; 32] = rand::rng().random();
    encode_hex(&bytes)
}

fn derive_with_salt(password: &str, salt: &str) -> String {
    let mut output = [0u8; KEY_LEN];
    // The hex salt string itself is the PBKDF2 salt input, matching the
    // stored format.
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        PBKDF2_ITERATIONS,
        &mut output,
    );
    encode_hex(&output)
}

fn encode_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut acc, b| {
            use std::fmt::Write;
            let _ = write!(acc, "{b:02x}");
            acc
        })
}
