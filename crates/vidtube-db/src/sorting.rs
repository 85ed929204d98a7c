//! Sort configuration for listing queries.

use mongodb::bson::{doc, Document};

/// Default sort field when none (or an empty one) is supplied.
const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Sort direction for queries.
///
/// Only the canonical descending spellings are recognized; anything else,
/// including garbage, sorts ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse from string, returning default if invalid.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "desc" | "descending" | "-1" => Self::Descending,
            _ => Self::Ascending,
        }
    }

    /// The store's order marker for this direction.
    pub const fn bson_order(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// Complete sort configuration.
///
/// The field is an open name rather than an enum: sorting by a field absent
/// from the documents compares all of them equal, which yields the store's
/// natural order.
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub field: String,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Ascending,
        }
    }
}

impl SortConfig {
    /// Create from string parameters with validation.
    pub fn from_params(field: Option<&str>, direction: Option<&str>) -> Self {
        Self {
            field: sanitize_field(field.unwrap_or(DEFAULT_SORT_FIELD)),
            direction: direction
                .map(SortDirection::from_str_or_default)
                .unwrap_or_default(),
        }
    }

    /// The `$sort` stage document for this configuration.
    pub fn sort_document(&self) -> Document {
        doc! { self.field.as_str(): self.direction.bson_order() }
    }
}

/// Restrict a sort field name to plain identifier characters.
///
/// Operators and dotted paths never reach the store; a name that sanitizes
/// to nothing falls back to the default field.
fn sanitize_field(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if cleaned.is_empty() {
        DEFAULT_SORT_FIELD.to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_parsing() {
        assert_eq!(SortDirection::from_str_or_default("desc"), SortDirection::Descending);
        assert_eq!(SortDirection::from_str_or_default("DESCENDING"), SortDirection::Descending);
        assert_eq!(SortDirection::from_str_or_default("-1"), SortDirection::Descending);
        assert_eq!(SortDirection::from_str_or_default("asc"), SortDirection::Ascending);
        assert_eq!(SortDirection::from_str_or_default("sideways"), SortDirection::Ascending);
        assert_eq!(SortDirection::from_str_or_default(""), SortDirection::Ascending);
    }

    #[test]
    fn field_sanitization() {
        let cfg = SortConfig::from_params(Some("duration"), None);
        assert_eq!(cfg.field, "duration");

        let cfg = SortConfig::from_params(Some("$where"), Some("desc"));
        assert_eq!(cfg.field, "where");
        assert_eq!(cfg.direction, SortDirection::Descending);

        let cfg = SortConfig::from_params(Some("$.."), None);
        assert_eq!(cfg.field, "createdAt");
    }

    #[test]
    fn defaults() {
        let cfg = SortConfig::from_params(None, None);
        assert_eq!(cfg.field, "createdAt");
        assert_eq!(cfg.direction, SortDirection::Ascending);
        assert_eq!(cfg.sort_document(), doc! { "createdAt": 1 });
    }
}
