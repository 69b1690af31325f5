//! Statement builders for row mutations.
//!
//! Identifiers are backtick-quoted; values always travel as positional
//! parameters, never inlined into the statement text.

use mirror_sink::{ColumnRecord, ColumnValue};

/// A statement and the positional parameters bound to its `?` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<ColumnValue>,
}

/// Quote a MySQL identifier, doubling any embedded backtick.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// `INSERT INTO t (a, b) VALUES (?, ?)`
///
/// An empty record yields `INSERT INTO t () VALUES ()`, which lets the
/// destination fill every column with its default.
pub fn insert_statement(table: &str, record: &ColumnRecord) -> Statement {
    let columns: Vec<String> = record.keys().map(|c| quote_identifier(c)).collect();
    let placeholders = vec!["?"; record.len()].join(", ");
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_identifier(table),
            columns.join(", "),
            placeholders
        ),
        params: record.values().cloned().collect(),
    }
}

/// `UPDATE t SET a = ?, b = ? WHERE k = ?`
///
/// Returns `None` for an empty record: there is nothing to set.
pub fn update_statement(
    table: &str,
    where_column: &str,
    where_value: &ColumnValue,
    record: &ColumnRecord,
) -> Option<Statement> {
    if record.is_empty() {
        return None;
    }
    let assignments: Vec<String> = record
        .keys()
        .map(|c| format!("{} = ?", quote_identifier(c)))
        .collect();
    let mut params: Vec<ColumnValue> = record.values().cloned().collect();
    params.push(where_value.clone());
    Some(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {} = ?",
            quote_identifier(table),
            assignments.join(", "),
            quote_identifier(where_column)
        ),
        params,
    })
}

/// `DELETE FROM t WHERE k = ?`
pub fn delete_statement(table: &str, where_column: &str, where_value: &ColumnValue) -> Statement {
    Statement {
        sql: format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_identifier(table),
            quote_identifier(where_column)
        ),
        params: vec![where_value.clone()],
    }
}
