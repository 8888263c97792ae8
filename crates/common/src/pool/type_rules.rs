//! Which keys and flags each pool type may carry.

use super::kind::PoolType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Forbidden,
    Required,
    Optional,
}

/// One row of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTypeRow {
    pub writer_key: Requirement,
    pub reader_key: Requirement,
    pub encrypted: Requirement,
}

/// The rule table.
///
/// | type    | writer    | reader    | encrypted |
/// |---------|-----------|-----------|-----------|
/// | wall    | forbidden | forbidden | forbidden |
/// | channel | required  | forbidden | forbidden |
/// | chat    | required  | required  | optional  |
/// | mailbox | forbidden | required  | forbidden |
pub fn row(pool_type: PoolType) -> PoolTypeRow {
    use Requirement::*;
    match pool_type {
        PoolType::Wall => PoolTypeRow {
            writer_key: Forbidden,
            reader_key: Forbidden,
            encrypted: Forbidden,
        },
        PoolType::Channel => PoolTypeRow {
            writer_key: Required,
            reader_key: Forbidden,
            encrypted: Forbidden,
        },
        PoolType::Chat => PoolTypeRow {
            writer_key: Required,
            reader_key: Required,
            encrypted: Optional,
        },
        PoolType::Mailbox => PoolTypeRow {
            writer_key: Forbidden,
            reader_key: Required,
            encrypted: Forbidden,
        },
    }
}

/// The key/flag combination proposed for a new pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyLayout {
    pub has_writer_key: bool,
    pub has_reader_key: bool,
    pub encrypted: bool,
}

fn check(
    field: &str,
    present: bool,
    requirement: Requirement,
    pool_type: PoolType,
    errors: &mut Vec<String>,
) {
    match (requirement, present) {
        (Requirement::Required, false) => {
            errors.push(format!("`{}` is required for `{}` pools", field, pool_type))
        }
        (Requirement::Forbidden, true) => {
            errors.push(format!("`{}` is not allowed for `{}` pools", field, pool_type))
        }
        _ => {}
    }
}

/// Every rule the layout breaks for `pool_type`. Empty means the layout is legal.
pub fn violations(pool_type: PoolType, layout: KeyLayout) -> Vec<String> {
    let row = row(pool_type);
    let mut errors = Vec::new();

    check("writer_key", layout.has_writer_key, row.writer_key, pool_type, &mut errors);
    check("reader_key", layout.has_reader_key, row.reader_key, pool_type, &mut errors);

    // encryption is judged on its own, never through the per-key columns
    if layout.encrypted && row.encrypted == Requirement::Forbidden {
        errors.push("only `chat` pools can be encrypted".to_string());
    }

    errors
}
