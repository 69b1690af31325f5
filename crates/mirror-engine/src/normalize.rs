//! Column value normalization and key discovery.
//!
//! The change stream renders SQL NULL as an empty string for datetime and
//! json columns, so an empty value there cannot be trusted. Such columns are
//! left out of the mutation entirely and the destination keeps its current
//! (or default) value instead of receiving an invalid `''`.

use canal_types::Column;
use mirror_sink::ColumnValue;

/// Type families whose NULL arrives as an empty string.
const NULL_AS_EMPTY_TYPES: [&str; 2] = ["datetime", "json"];

/// True when a column must be omitted from the mutation.
pub fn is_suppressed(mysql_type: &str, value: &str) -> bool {
    value.is_empty() && NULL_AS_EMPTY_TYPES.iter().any(|t| mysql_type.contains(t))
}

/// Value to write for a column that survived [`is_suppressed`].
pub fn column_value(column: &Column) -> ColumnValue {
    if column.is_null {
        ColumnValue::Null
    } else {
        ColumnValue::Text(column.value.clone())
    }
}

/// The column a row is identified by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumn {
    pub name: String,
    pub value: ColumnValue,
}

/// First column flagged `is_key`, if any.
///
/// Only single-column keys are supported; later key columns of a composite
/// key are ignored.
pub fn find_key(columns: &[Column]) -> Option<KeyColumn> {
    columns.iter().find(|c| c.is_key).map(|c| KeyColumn {
        name: c.name.clone(),
        value: column_value(c),
    })
}
