use crate::keys::{MAX_KEY_LEN, MIN_KEY_LEN};

pub const MIN_DESCRIPTION_LEN: usize = 1;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MIN_TAG_LEN: usize = 1;
pub const MAX_TAG_LEN: usize = 64;
pub const MIN_SIGNATURE_VALUE_LEN: usize = 1;
pub const MAX_SIGNATURE_VALUE_LEN: usize = 64;

/// Collects field-level problems so they can be reported together
#[derive(Debug, Default)]
pub(crate) struct FieldChecks {
    errors: Vec<String>,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min || len > max {
            self.errors.push(format!(
                "`{}` must be between {} and {} characters long",
                field, min, max
            ));
        }
        self
    }

    pub fn optional_length(
        &mut self,
        field: &str,
        value: Option<&str>,
        min: usize,
        max: usize,
    ) -> &mut Self {
        if let Some(value) = value {
            self.length(field, value, min, max);
        }
        self
    }

    pub fn key(&mut self, field: &str, value: &str) -> &mut Self {
        self.length(field, value, MIN_KEY_LEN, MAX_KEY_LEN)
    }

    pub fn optional_key(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        self.optional_length(field, value, MIN_KEY_LEN, MAX_KEY_LEN)
    }

    pub fn description(&mut self, value: Option<&str>) -> &mut Self {
        self.optional_length("description", value, MIN_DESCRIPTION_LEN, MAX_DESCRIPTION_LEN)
    }

    pub fn push(&mut self, error: String) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = String>) -> &mut Self {
        self.errors.extend(errors);
        self
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_counted_in_characters() {
        let mut checks = FieldChecks::new();
        checks.key("master_key", "ключ");
        assert!(checks.into_errors().is_empty());

        let mut checks = FieldChecks::new();
        checks
            .key("master_key", "abc")
            .optional_key("writer_key", None)
            .description(Some(""));
        assert_eq!(
            checks.into_errors(),
            vec![
                "`master_key` must be between 4 and 128 characters long".to_string(),
                "`description` must be between 1 and 1000 characters long".to_string(),
            ]
        );
    }
}
