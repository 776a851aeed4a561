//! Sorting types for list queries.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort specification consisting of a field name and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Column or field name to sort by.
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a new sort field.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Parse a descriptor: `"name"` sorts ascending, `"-name"` descending.
    ///
    /// Returns `None` for empty or otherwise malformed descriptors.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let descriptor = descriptor.trim();
        let (field, direction) = match descriptor.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Desc),
            None => (descriptor, SortDirection::Asc),
        };

        if field.is_empty()
            || !field
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return None;
        }

        Some(Self::new(field, direction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptor() {
        assert_eq!(
            SortField::parse("-created_at"),
            Some(SortField::new("created_at", SortDirection::Desc))
        );
        assert_eq!(
            SortField::parse("title"),
            Some(SortField::new("title", SortDirection::Asc))
        );
        assert_eq!(SortField::parse("-"), None);
        assert_eq!(SortField::parse("id; DROP TABLE task"), None);
    }
}
