use serde::{Deserialize, Serialize};
use serde_with::base64::Base64;
use serde_with::serde_as;

use super::kind::MessageKind;
use super::Payload;

/// Payload fields exactly as submitted. Which of them may be set depends
///  on the declared [`MessageKind`].
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde_as(as = "Option<Base64>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ciphertext: Option<Vec<u8>>,
    #[serde_as(as = "Option<Base64>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Vec<u8>>,
    #[serde_as(as = "Option<Base64>")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<Vec<u8>>,
}

impl MessageFields {
    pub fn plaintext(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn encrypted(ciphertext: Vec<u8>, nonce: Vec<u8>, tag: Vec<u8>) -> Self {
        Self {
            text: None,
            ciphertext: Some(ciphertext),
            nonce: Some(nonce),
            tag: Some(tag),
        }
    }

    fn encrypted_fields(&self) -> [(&'static str, Option<&Vec<u8>>); 3] {
        [
            ("ciphertext", self.ciphertext.as_ref()),
            ("nonce", self.nonce.as_ref()),
            ("tag", self.tag.as_ref()),
        ]
    }

    /// Check the fields against `kind` and build the payload.
    ///
    /// Every violation is collected; `Err` is never empty.
    pub fn into_payload(self, kind: MessageKind) -> Result<Payload, Vec<String>> {
        let errors = shape_violations(kind, &self);
        if !errors.is_empty() {
            return Err(errors);
        }
        // shape check guarantees the unwrapped fields are present
        Ok(match kind {
            MessageKind::Plaintext => Payload::Plaintext {
                text: self.text.unwrap_or_default(),
            },
            MessageKind::Encrypted => Payload::Encrypted {
                ciphertext: self.ciphertext.unwrap_or_default(),
                nonce: self.nonce.unwrap_or_default(),
                tag: self.tag.unwrap_or_default(),
            },
        })
    }
}

/// Field-shape rules for a message of the declared kind
pub fn shape_violations(kind: MessageKind, fields: &MessageFields) -> Vec<String> {
    let mut errors = Vec::new();
    match kind {
        MessageKind::Plaintext => {
            if fields.text.as_deref().map_or(true, str::is_empty) {
                errors.push("plaintext message requires non-empty `text`".to_string());
            }
            for (name, value) in fields.encrypted_fields() {
                if value.is_some() {
                    errors.push(format!("plaintext message must not declare `{}`", name));
                }
            }
        }
        MessageKind::Encrypted => {
            if fields.text.is_some() {
                errors.push("encrypted message must not declare `text`".to_string());
            }
            for (name, value) in fields.encrypted_fields() {
                if value.map_or(true, |v| v.is_empty()) {
                    errors.push(format!("encrypted message requires non-empty `{}`", name));
                }
            }
        }
    }
    errors
}

/// An encrypted pool takes only encrypted messages, and the other way around
pub fn check_compatibility(pool_encrypted: bool, kind: MessageKind) -> Result<(), String> {
    match (pool_encrypted, kind) {
        (true, MessageKind::Encrypted) | (false, MessageKind::Plaintext) => Ok(()),
        (true, MessageKind::Plaintext) => {
            Err("Encrypted pool accepts only encrypted messages.".to_string())
        }
        (false, MessageKind::Encrypted) => {
            Err("Pool is not encrypted, only plaintext messages are accepted.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_plaintext() {
        let payload = MessageFields::plaintext("hello")
            .into_payload(MessageKind::Plaintext)
            .unwrap();
        assert_eq!(
            payload,
            Payload::Plaintext {
                text: "hello".into()
            }
        );
    }

    #[test]
    fn test_valid_encrypted() {
        let payload = MessageFields::encrypted(vec![1, 2], vec![3], vec![4])
            .into_payload(MessageKind::Encrypted)
            .unwrap();
        assert_eq!(payload.kind(), MessageKind::Encrypted);
    }

    #[test]
    fn test_plaintext_violations_collected() {
        let fields = MessageFields {
            text: Some(String::new()),
            ciphertext: Some(vec![1]),
            nonce: None,
            tag: Some(vec![]),
        };
        let errors = shape_violations(MessageKind::Plaintext, &fields);
        assert_eq!(
            errors,
            vec![
                "plaintext message requires non-empty `text`".to_string(),
                "plaintext message must not declare `ciphertext`".to_string(),
                "plaintext message must not declare `tag`".to_string(),
            ]
        );
    }

    #[test]
    fn test_encrypted_violations_collected() {
        let fields = MessageFields {
            text: Some("oops".into()),
            ciphertext: Some(vec![1]),
            nonce: Some(vec![]),
            tag: None,
        };
        let errors = shape_violations(MessageKind::Encrypted, &fields);
        assert_eq!(
            errors,
            vec![
                "encrypted message must not declare `text`".to_string(),
                "encrypted message requires non-empty `nonce`".to_string(),
                "encrypted message requires non-empty `tag`".to_string(),
            ]
        );
    }

    #[test]
    fn test_compatibility() {
        assert!(check_compatibility(true, MessageKind::Encrypted).is_ok());
        assert!(check_compatibility(false, MessageKind::Plaintext).is_ok());
        assert!(check_compatibility(true, MessageKind::Plaintext).is_err());
        assert!(check_compatibility(false, MessageKind::Encrypted).is_err());
    }

    #[test]
    fn test_bytes_are_base64_on_the_wire() {
        let fields = MessageFields::encrypted(b"secret".to_vec(), vec![0, 1], vec![255]);
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["ciphertext"], "c2VjcmV0");
        assert!(json.get("text").is_none());
        let back: MessageFields = serde_json::from_value(json).unwrap();
        assert_eq!(back, fields);
    }
}
