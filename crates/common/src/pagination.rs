use serde::{Deserialize, Serialize};

/// Which pagination shape list operations accept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// Exactly one of `first` / `last`
    #[default]
    FirstLast,
    /// `limit` plus optional `offset`
    LimitOffset,
}

impl std::fmt::Display for PaginationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaginationMode::FirstLast => write!(f, "first_last"),
            PaginationMode::LimitOffset => write!(f, "limit_offset"),
        }
    }
}

impl std::str::FromStr for PaginationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_last" | "first-last" => Ok(PaginationMode::FirstLast),
            "limit_offset" | "limit-offset" => Ok(PaginationMode::LimitOffset),
            other => Err(format!("unknown pagination mode: {}", other)),
        }
    }
}

/// Raw pagination parameters as received from a caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

impl PageParams {
    pub fn first(n: i64) -> Self {
        Self {
            first: Some(n),
            ..Default::default()
        }
    }

    pub fn last(n: i64) -> Self {
        Self {
            last: Some(n),
            ..Default::default()
        }
    }

    pub fn window(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    #[error("One of the following parameters must be specified (not both): `first`, `last`.")]
    FirstOrLast,
    #[error("`{0}` must be more than 0.")]
    NotPositive(&'static str),
    #[error("`offset` must be more than 0 or equal to it.")]
    NegativeOffset,
    #[error("`limit` must be specified.")]
    MissingLimit,
}

/// A validated slice request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The `n` oldest entries
    First(usize),
    /// The `n` newest entries, still in ascending order
    Last(usize),
    /// `[offset, offset + limit)`, clipped
    Range { offset: usize, limit: usize },
}

impl Window {
    /// Borrow the selected part of `items`. Never reorders, never fails.
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let len = items.len();
        match *self {
            Window::First(n) => &items[..n.min(len)],
            Window::Last(n) => &items[len.saturating_sub(n)..],
            Window::Range { offset, limit } => {
                let start = offset.min(len);
                let end = start.saturating_add(limit).min(len);
                &items[start..end]
            }
        }
    }
}

/// Validates [`PageParams`] against the configured [`PaginationMode`].
///
/// Parameters that belong to the other mode are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationPolicy {
    mode: PaginationMode,
}

impl PaginationPolicy {
    pub fn new(mode: PaginationMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    pub fn window(&self, params: &PageParams) -> Result<Window, PaginationError> {
        match self.mode {
            PaginationMode::FirstLast => match (params.first, params.last) {
                (Some(first), None) => Ok(Window::First(positive("first", first)?)),
                (None, Some(last)) => Ok(Window::Last(positive("last", last)?)),
                _ => Err(PaginationError::FirstOrLast),
            },
            PaginationMode::LimitOffset => {
                let limit = params.limit.ok_or(PaginationError::MissingLimit)?;
                let limit = positive("limit", limit)?;
                let offset = params.offset.unwrap_or(0);
                if offset < 0 {
                    return Err(PaginationError::NegativeOffset);
                }
                Ok(Window::Range {
                    offset: usize::try_from(offset).unwrap_or(usize::MAX),
                    limit,
                })
            }
        }
    }
}

fn positive(name: &'static str, value: i64) -> Result<usize, PaginationError> {
    if value <= 0 {
        return Err(PaginationError::NotPositive(name));
    }
    Ok(usize::try_from(value).unwrap_or(usize::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_last() -> PaginationPolicy {
        PaginationPolicy::new(PaginationMode::FirstLast)
    }

    fn limit_offset() -> PaginationPolicy {
        PaginationPolicy::new(PaginationMode::LimitOffset)
    }

    #[test]
    fn test_first_takes_oldest() {
        let items = [1, 2, 3, 4, 5];
        let window = first_last().window(&PageParams::first(2)).unwrap();
        assert_eq!(window.apply(&items), &[1, 2]);
    }

    #[test]
    fn test_last_keeps_ascending_order() {
        let items = [1, 2, 3, 4, 5];
        let window = first_last().window(&PageParams::last(2)).unwrap();
        assert_eq!(window.apply(&items), &[4, 5]);
    }

    #[test]
    fn test_last_longer_than_list_returns_everything() {
        let items = [1, 2, 3];
        let window = first_last().window(&PageParams::last(10)).unwrap();
        assert_eq!(window.apply(&items), &[1, 2, 3]);
        let window = first_last().window(&PageParams::first(10)).unwrap();
        assert_eq!(window.apply(&items), &[1, 2, 3]);
    }

    #[test]
    fn test_first_last_exclusive() {
        let both = PageParams {
            first: Some(1),
            last: Some(1),
            ..Default::default()
        };
        assert_eq!(first_last().window(&both), Err(PaginationError::FirstOrLast));
        assert_eq!(
            first_last().window(&PageParams::default()),
            Err(PaginationError::FirstOrLast)
        );
    }

    #[test]
    fn test_non_positive_rejected() {
        assert_eq!(
            first_last().window(&PageParams::first(0)),
            Err(PaginationError::NotPositive("first"))
        );
        assert_eq!(
            first_last().window(&PageParams::last(-3)),
            Err(PaginationError::NotPositive("last"))
        );
        assert_eq!(
            limit_offset().window(&PageParams::window(0, 0)),
            Err(PaginationError::NotPositive("limit"))
        );
        assert_eq!(
            PaginationError::NotPositive("limit").to_string(),
            "`limit` must be more than 0."
        );
    }

    #[test]
    fn test_limit_offset_window_is_clipped() {
        let items = [1, 2, 3, 4, 5];
        let policy = limit_offset();

        let window = policy.window(&PageParams::window(2, 1)).unwrap();
        assert_eq!(window.apply(&items), &[2, 3]);

        let window = policy.window(&PageParams::window(10, 3)).unwrap();
        assert_eq!(window.apply(&items), &[4, 5]);

        let window = policy.window(&PageParams::window(3, 99)).unwrap();
        assert!(window.apply(&items).is_empty());
    }

    #[test]
    fn test_offset_defaults_to_zero_and_must_not_be_negative() {
        let params = PageParams {
            limit: Some(2),
            ..Default::default()
        };
        let window = limit_offset().window(&params).unwrap();
        assert_eq!(window, Window::Range { offset: 0, limit: 2 });

        assert_eq!(
            limit_offset().window(&PageParams::window(2, -1)),
            Err(PaginationError::NegativeOffset)
        );
        assert_eq!(
            limit_offset().window(&PageParams::default()),
            Err(PaginationError::MissingLimit)
        );
    }

    #[test]
    fn test_other_mode_params_ignored() {
        let params = PageParams {
            first: Some(1),
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(first_last().window(&params).unwrap(), Window::First(1));
        assert_eq!(
            limit_offset().window(&params).unwrap(),
            Window::Range { offset: 0, limit: 2 }
        );
    }

    #[test]
    fn test_slicing_is_idempotent() {
        let items: Vec<u32> = (1..=20).collect();
        for params in [PageParams::first(7), PageParams::last(7)] {
            let window = first_last().window(&params).unwrap();
            assert_eq!(window.apply(&items), window.apply(&items));
        }
        let window = limit_offset().window(&PageParams::window(5, 4)).unwrap();
        assert_eq!(window.apply(&items), window.apply(&items));
        assert_eq!(items.len(), 20);
    }
}
