//! Column values as they travel from a decoded row to the sink.

use indexmap::IndexMap;

/// A single column value.
///
/// The change stream reports every value as text; `Null` is only produced
/// when the source flagged the column as SQL NULL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnValue {
    Text(String),
    Null,
}

impl ColumnValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{s}'"),
            Self::Null => f.write_str("NULL"),
        }
    }
}

/// Column name to value, in the order the columns were captured.
pub type ColumnRecord = IndexMap<String, ColumnValue>;
