use time::OffsetDateTime;

use super::drafts::{SignatureDraft, SignatureUpdate};
use super::validate::{FieldChecks, MAX_SIGNATURE_VALUE_LEN, MIN_SIGNATURE_VALUE_LEN};
use super::views::SignatureInfo;
use super::{store_error, Node, SIGNATURE_NOT_FOUND};
use crate::error::{Denial, KeyKind, NodeError};
use crate::signature::{generate_id, Signature};
use crate::store::{NodeStore, StoreError};

/// How many fresh ids to try before giving up on a collision streak
const MAX_ID_ATTEMPTS: usize = 16;

impl<S: NodeStore> Node<S> {
    pub async fn create_signature(&self, draft: SignatureDraft) -> Result<SignatureInfo, NodeError> {
        let mut checks = FieldChecks::new();
        checks
            .length(
                "value",
                &draft.value,
                MIN_SIGNATURE_VALUE_LEN,
                MAX_SIGNATURE_VALUE_LEN,
            )
            .key("key", &draft.key)
            .description(draft.description.as_deref());
        let errors = checks.into_errors();
        if !errors.is_empty() {
            return Err(NodeError::violations("Invalid signature parameters", &errors));
        }

        let key_hash = self.verifier.hash(&draft.key)?;
        let created_at = (!draft.hide_creation_date).then(OffsetDateTime::now_utc);

        for _ in 0..MAX_ID_ATTEMPTS {
            let signature = Signature {
                id: generate_id(),
                key_hash: key_hash.clone(),
                value: draft.value.clone(),
                description: draft.description.clone(),
                created_at,
            };
            match self.store.create_signature(signature).await {
                Ok(signature) => {
                    tracing::info!(signature = %signature.id, "created signature");
                    return Ok(SignatureInfo::from(&signature));
                }
                Err(StoreError::SignatureIdTaken(id)) => {
                    tracing::debug!(signature = %id, "signature id collision, retrying");
                }
                Err(e) => return Err(store_error(e)),
            }
        }

        Err(NodeError::internal(format!(
            "no free signature id after {} attempts",
            MAX_ID_ATTEMPTS
        )))
    }

    pub async fn signature_info(&self, id: &str) -> Result<SignatureInfo, NodeError> {
        let signature = self.load_signature(id).await?;
        Ok(SignatureInfo::from(&signature))
    }

    /// Change a signature's value, description or key. Needs its current key.
    pub async fn update_signature(
        &self,
        id: &str,
        update: SignatureUpdate,
    ) -> Result<SignatureInfo, NodeError> {
        let mut checks = FieldChecks::new();
        checks
            .optional_length(
                "value",
                update.value.as_deref(),
                MIN_SIGNATURE_VALUE_LEN,
                MAX_SIGNATURE_VALUE_LEN,
            )
            .optional_key("new_key", update.new_key.as_deref())
            .description(update.description.as_deref());
        let errors = checks.into_errors();
        if !errors.is_empty() {
            return Err(NodeError::violations("Invalid signature parameters", &errors));
        }

        let mut signature = self.load_signature(id).await?;
        if !self.verifier.verify(&update.key, &signature.key_hash) {
            tracing::warn!(signature = %signature.id, "invalid signature key presented");
            return Err(Denial::InvalidKey(KeyKind::Signature).into());
        }

        if let Some(value) = update.value {
            signature.value = value;
        }
        if let Some(description) = update.description {
            signature.description = Some(description);
        }
        if let Some(new_key) = &update.new_key {
            signature.key_hash = self.verifier.hash(new_key)?;
        }

        self.store
            .save_signature(&signature)
            .await
            .map_err(store_error)?;
        tracing::info!(signature = %signature.id, "updated signature");
        Ok(SignatureInfo::from(&signature))
    }

    async fn load_signature(&self, id: &str) -> Result<Signature, NodeError> {
        self.store
            .find_signature(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| NodeError::NotFound(SIGNATURE_NOT_FOUND.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_utils::node;
    use super::*;

    fn draft() -> SignatureDraft {
        SignatureDraft {
            value: "anon".into(),
            key: "sig-key".into(),
            description: Some("just someone".into()),
            hide_creation_date: false,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let node = node();
        let created = node.create_signature(draft()).await.unwrap();
        assert_eq!(created.id.len(), crate::signature::SIGNATURE_ID_LEN);
        assert!(created.created_at.is_some());

        let fetched = node.signature_info(&created.id).await.unwrap();
        assert_eq!(fetched, created);

        let err = node.signature_info("nope!").await.unwrap_err();
        assert_eq!(err, NodeError::NotFound("Signature does not exist.".into()));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_fields() {
        let node = node();
        let err = node
            .create_signature(SignatureDraft {
                value: String::new(),
                key: "k".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            NodeError::InvalidInput(
                "Invalid signature parameters: `value` must be between 1 and 64 characters long, \
                 `key` must be between 4 and 128 characters long."
                    .into()
            )
        );
    }

    #[tokio::test]
    async fn test_update_requires_key() {
        let node = node();
        let created = node.create_signature(draft()).await.unwrap();

        let err = node
            .update_signature(
                &created.id,
                SignatureUpdate {
                    key: "wrong".into(),
                    value: Some("renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, NodeError::AccessDenied(Denial::InvalidKey(KeyKind::Signature)));

        let updated = node
            .update_signature(
                &created.id,
                SignatureUpdate {
                    key: "sig-key".into(),
                    new_key: Some("new-sig-key".into()),
                    value: Some("renamed".into()),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.value, "renamed");
        assert_eq!(updated.description.as_deref(), Some("just someone"));

        // the old key stops working
        let err = node
            .update_signature(
                &created.id,
                SignatureUpdate {
                    key: "sig-key".into(),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::AccessDenied(_)));
        assert!(node
            .update_signature(
                &created.id,
                SignatureUpdate {
                    key: "new-sig-key".into(),
                    ..Default::default()
                },
            )
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_hidden_creation_date() {
        let node = node();
        let mut hidden = draft();
        hidden.hide_creation_date = true;
        let created = node.create_signature(hidden).await.unwrap();
        assert!(created.created_at.is_none());
    }
}
