//! Key hashing and verification
//!
//! Every capability secret (pool master/writer/reader keys, signature keys)
//! is stored only as an Argon2id hash in PHC string format. The plaintext
//! secret never leaves the request that presented it.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Minimum accepted length of a presented secret, in characters
pub const MIN_KEY_LEN: usize = 4;
/// Maximum accepted length of a presented secret, in characters
pub const MAX_KEY_LEN: usize = 128;

#[derive(Debug, thiserror::Error)]
pub enum KeyError {
    #[error("invalid key hashing parameters: {0}")]
    Params(String),
    #[error("failed to hash key: {0}")]
    Hash(String),
}

/// A one-way hash of a secret, as produced by [`KeyVerifier::hash`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyHash(String);

impl KeyHash {
    /// Wrap a hash string loaded from storage. No validation happens here;
    ///  a malformed value simply never verifies.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for KeyHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyHash(..)")
    }
}

/// Hashes and verifies secrets with Argon2id.
#[derive(Clone)]
pub struct KeyVerifier {
    argon2: Argon2<'static>,
}

impl Default for KeyVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeyVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyVerifier").finish_non_exhaustive()
    }
}

impl KeyVerifier {
    /// Verifier with the recommended Argon2id parameters
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Verifier with explicit cost parameters.
    ///
    /// # Arguments
    /// * `memory_kib` - memory cost in KiB (at least `8 * parallelism`)
    /// * `iterations` - number of passes
    /// * `parallelism` - degree of parallelism
    ///
    /// Only the cost of *new* hashes is affected: verification always uses the
    ///  parameters embedded in the stored hash.
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, KeyError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| KeyError::Params(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a secret with a fresh random salt
    pub fn hash(&self, secret: &str) -> Result<KeyHash, KeyError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| KeyError::Hash(e.to_string()))?;
        Ok(KeyHash(hash.to_string()))
    }

    /// Check whether `secret` produced `hash`.
    ///
    /// A stored hash that cannot be parsed verifies as `false`.
    pub fn verify(&self, secret: &str, hash: &KeyHash) -> bool {
        let parsed = match PasswordHash::new(hash.as_str()) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "stored key hash is malformed");
                return false;
            }
        };
        self.argon2
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
pub(crate) fn test_verifier() -> KeyVerifier {
    KeyVerifier::with_cost(8, 1, 1).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let verifier = test_verifier();
        let hash = verifier.hash("correct horse").unwrap();
        assert!(verifier.verify("correct horse", &hash));
        assert!(!verifier.verify("battery staple", &hash));
    }

    #[test]
    fn test_same_secret_hashes_differently() {
        let verifier = test_verifier();
        let a = verifier.hash("secret").unwrap();
        let b = verifier.hash("secret").unwrap();
        assert_ne!(a, b);
        assert!(verifier.verify("secret", &a));
        assert!(verifier.verify("secret", &b));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let verifier = test_verifier();
        assert!(!verifier.verify("secret", &KeyHash::from_stored("")));
        assert!(!verifier.verify("secret", &KeyHash::from_stored("not-a-phc-string")));
        assert!(!verifier.verify(
            "secret",
            &KeyHash::from_stored("$argon2id$v=19$m=8,t=1,p=1$broken")
        ));
    }

    #[test]
    fn test_verify_uses_embedded_params() {
        let cheap = test_verifier();
        let hash = cheap.hash("secret").unwrap();
        // A verifier configured with other costs still accepts the hash
        let other = KeyVerifier::with_cost(16, 2, 1).unwrap();
        assert!(other.verify("secret", &hash));
    }

    #[test]
    fn test_debug_does_not_leak_hash() {
        let verifier = test_verifier();
        let hash = verifier.hash("secret").unwrap();
        assert_eq!(format!("{:?}", hash), "KeyHash(..)");
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(matches!(
            KeyVerifier::with_cost(1, 1, 1),
            Err(KeyError::Params(_))
        ));
    }
}
