use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::constants::{CREDENTIAL_SALT_SIZE, CREDENTIAL_SCHEME, KDF_CONTEXT_CREDENTIAL};
use crate::error::CredentialError;

/// Turns account secrets into stored credentials and checks them at login.
pub trait CredentialVerifier: Send + Sync {
    /// Produce the value persisted in the user record.
    fn hash(&self, secret: &str) -> String;

    /// Check a login attempt against a persisted credential.
    fn verify(&self, secret: &str, stored: &str) -> bool;

    /// Whether a persisted credential should be re-hashed on next login.
    fn needs_rehash(&self, stored: &str) -> bool;
}

/// Salted BLAKE3 credentials, stored as `blake3$<salt hex>$<digest hex>`.
///
/// Records written before hashing existed hold the plaintext secret. Those
/// are still accepted (constant-time compare) and reported by
/// [`CredentialVerifier::needs_rehash`] so the caller can upgrade them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Verifier;

impl Blake3Verifier {
    pub fn new() -> Self {
        Self
    }

    fn digest(salt: &[u8], secret: &str) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT_CREDENTIAL);
        hasher.update(salt);
        hasher.update(secret.as_bytes());
        *hasher.finalize().as_bytes()
    }
}

impl CredentialVerifier for Blake3Verifier {
    fn hash(&self, secret: &str) -> String {
        let salt = generate_salt();
        let digest = Self::digest(&salt, secret);
        format!(
            "{CREDENTIAL_SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        )
    }

    fn verify(&self, secret: &str, stored: &str) -> bool {
        match parse_hashed(stored) {
            Ok(Some((salt, expected))) => {
                let actual = Self::digest(&salt, secret);
                actual[..].ct_eq(&expected[..]).into()
            }
            Ok(None) => secret.as_bytes().ct_eq(stored.as_bytes()).into(),
            Err(e) => {
                tracing::warn!(error = %e, "rejecting unreadable credential");
                false
            }
        }
    }

    fn needs_rehash(&self, stored: &str) -> bool {
        !is_hashed(stored)
    }
}

pub fn generate_salt() -> [u8; CREDENTIAL_SALT_SIZE] {
    let mut salt = [0u8; CREDENTIAL_SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// True when `stored` carries the hashed-credential prefix.
pub fn is_hashed(stored: &str) -> bool {
    stored
        .strip_prefix(CREDENTIAL_SCHEME)
        .is_some_and(|rest| rest.starts_with('$'))
}

// Ok(None) means legacy plaintext
fn parse_hashed(
    stored: &str,
) -> Result<Option<([u8; CREDENTIAL_SALT_SIZE], [u8; 32])>, CredentialError> {
    if !is_hashed(stored) {
        return Ok(None);
    }

    let mut parts = stored.splitn(3, '$').skip(1);
    let (Some(salt_hex), Some(digest_hex)) = (parts.next(), parts.next()) else {
        return Err(CredentialError::MalformedHash);
    };

    let salt_bytes = hex::decode(salt_hex)?;
    if salt_bytes.len() != CREDENTIAL_SALT_SIZE {
        return Err(CredentialError::InvalidSaltLength {
            expected: CREDENTIAL_SALT_SIZE,
            actual: salt_bytes.len(),
        });
    }
    let digest_bytes = hex::decode(digest_hex)?;
    if digest_bytes.len() != 32 {
        return Err(CredentialError::MalformedHash);
    }

    let mut salt = [0u8; CREDENTIAL_SALT_SIZE];
    salt.copy_from_slice(&salt_bytes);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&digest_bytes);
    Ok(Some((salt, digest)))
}
