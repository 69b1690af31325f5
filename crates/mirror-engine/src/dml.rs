//! Row change replay.
//!
//! Inserts write the after-image, updates write only the columns the source
//! marked as changed and target the row by its key, deletes target the row by
//! the key found in the before-image.

use crate::normalize::{column_value, find_key, is_suppressed, KeyColumn};
use crate::ApplyStats;
use anyhow::{bail, Result};
use canal_types::{Column, EventType, RowData};
use mirror_sink::{ColumnRecord, MirrorSink};
use tracing::warn;

/// What to do with an UPDATE or DELETE row that has no key column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKeyPolicy {
    /// Log and continue with the next row.
    #[default]
    Skip,
    /// Fail the batch.
    Abort,
}

/// Record of every non-suppressed column.
pub fn insert_record(columns: &[Column]) -> ColumnRecord {
    columns
        .iter()
        .filter(|c| !is_suppressed(&c.mysql_type, &c.value))
        .map(|c| (c.name.clone(), column_value(c)))
        .collect()
}

/// Record of the changed, non-suppressed, non-key columns.
pub fn update_record(columns: &[Column]) -> ColumnRecord {
    columns
        .iter()
        .filter(|c| c.updated && !c.is_key && !is_suppressed(&c.mysql_type, &c.value))
        .map(|c| (c.name.clone(), column_value(c)))
        .collect()
}

/// Apply every row of one DML event to `table`, in order.
///
/// Event kinds other than INSERT/UPDATE/DELETE are ignored.
pub async fn apply_dml<S: MirrorSink + ?Sized>(
    sink: &S,
    table: &str,
    event_type: EventType,
    rows: &[RowData],
    policy: MissingKeyPolicy,
    stats: &mut ApplyStats,
) -> Result<()> {
    for row in rows {
        match event_type {
            EventType::Insert => {
                sink.create_row(table, &insert_record(&row.after_columns))
                    .await?;
                stats.rows_inserted += 1;
            }
            EventType::Update => {
                let Some(key) = target_key(table, event_type, &row.after_columns, policy)? else {
                    stats.rows_missing_key += 1;
                    continue;
                };
                let record = update_record(&row.after_columns);
                sink.update_rows(table, &key.name, &key.value, &record)
                    .await?;
                stats.rows_updated += 1;
            }
            EventType::Delete => {
                let Some(key) = target_key(table, event_type, &row.before_columns, policy)? else {
                    stats.rows_missing_key += 1;
                    continue;
                };
                sink.delete_rows(table, &key.name, &key.value).await?;
                stats.rows_deleted += 1;
            }
            _ => {}
        }
    }
    Ok(())
}

fn target_key(
    table: &str,
    event_type: EventType,
    columns: &[Column],
    policy: MissingKeyPolicy,
) -> Result<Option<KeyColumn>> {
    match find_key(columns) {
        Some(key) => Ok(Some(key)),
        None => match policy {
            MissingKeyPolicy::Skip => {
                warn!("Skipping {event_type} row on '{table}': no primary key column");
                Ok(None)
            }
            MissingKeyPolicy::Abort => {
                bail!("Cannot apply {event_type} row on '{table}': no primary key column")
            }
        },
    }
}
