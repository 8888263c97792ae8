//! Pseudonymous identities that can be attached to pools and messages

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{Denial, KeyKind, NodeError};
use crate::keys::{KeyHash, KeyVerifier};

/// Length of a generated signature id
pub const SIGNATURE_ID_LEN: usize = 5;

/// Unambiguous symbols signature ids are drawn from (no 0/O, 1/l/I)
const SIGNATURE_ID_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Draw a fresh random signature id
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..SIGNATURE_ID_LEN)
        .map(|_| SIGNATURE_ID_ALPHABET[rng.gen_range(0..SIGNATURE_ID_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub id: String,
    pub key_hash: KeyHash,
    /// Display name
    pub value: String,
    pub description: Option<String>,
    pub created_at: Option<OffsetDateTime>,
}

/// A caller's claim to own a signature
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureClaim {
    pub id: String,
    pub key: String,
}

impl fmt::Debug for SignatureClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureClaim")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Turns a [`SignatureClaim`] into a verified [`Signature`].
#[derive(Debug, Clone)]
pub struct SignatureBinder {
    verifier: KeyVerifier,
}

impl SignatureBinder {
    pub fn new(verifier: KeyVerifier) -> Self {
        Self { verifier }
    }

    /// Check a claim against the signature the store returned for its id.
    ///
    /// # Arguments
    /// * `claim` - the id and plaintext key the caller presented
    /// * `found` - result of looking `claim.id` up in the store
    ///
    /// # Returns
    /// * `Ok(Signature)` - the signature, ready to attach
    /// * `Err(NodeError::NotFound)` - no signature with that id
    /// * `Err(NodeError::AccessDenied)` - the key does not verify
    pub fn bind(&self, claim: &SignatureClaim, found: Option<Signature>) -> Result<Signature, NodeError> {
        let signature = found.ok_or_else(|| NodeError::NotFound("Signature does not exist.".into()))?;
        if !self.verifier.verify(&claim.key, &signature.key_hash) {
            tracing::warn!(signature = %claim.id, "invalid signature key presented");
            return Err(Denial::InvalidKey(KeyKind::Signature).into());
        }
        Ok(signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::test_verifier;

    fn signature(verifier: &KeyVerifier) -> Signature {
        Signature {
            id: generate_id(),
            key_hash: verifier.hash("sig-secret").unwrap(),
            value: "anon".into(),
            description: None,
            created_at: None,
        }
    }

    #[test]
    fn test_generated_ids() {
        for _ in 0..100 {
            let id = generate_id();
            assert_eq!(id.len(), SIGNATURE_ID_LEN);
            assert!(id.bytes().all(|b| SIGNATURE_ID_ALPHABET.contains(&b)));
        }
        assert_eq!(SIGNATURE_ID_ALPHABET.len(), 57);
    }

    #[test]
    fn test_bind_valid_claim() {
        let verifier = test_verifier();
        let binder = SignatureBinder::new(verifier.clone());
        let sig = signature(&verifier);
        let claim = SignatureClaim {
            id: sig.id.clone(),
            key: "sig-secret".into(),
        };
        assert_eq!(binder.bind(&claim, Some(sig.clone())).unwrap(), sig);
    }

    #[test]
    fn test_bind_missing_signature() {
        let binder = SignatureBinder::new(test_verifier());
        let claim = SignatureClaim {
            id: "zzzzz".into(),
            key: "sig-secret".into(),
        };
        assert_eq!(
            binder.bind(&claim, None),
            Err(NodeError::NotFound("Signature does not exist.".into()))
        );
    }

    #[test]
    fn test_bind_wrong_key() {
        let verifier = test_verifier();
        let binder = SignatureBinder::new(verifier.clone());
        let sig = signature(&verifier);
        let claim = SignatureClaim {
            id: sig.id.clone(),
            key: "not-it".into(),
        };
        assert_eq!(
            binder.bind(&claim, Some(sig)),
            Err(NodeError::AccessDenied(Denial::InvalidKey(KeyKind::Signature)))
        );
    }
}
