//! MirrorSink trait definition.

use crate::{ColumnRecord, ColumnValue};
use anyhow::Result;

/// Trait for writing mirrored changes to a destination database.
///
/// The sink is owned by the surrounding service; the engine only borrows it
/// and never opens or closes connections itself. Every call completes (or
/// fails) before it returns, so callers that await each call in turn get
/// mutations applied in the order they were issued.
///
/// # Usage Pattern
///
/// ```ignore
/// pub async fn replay<S: MirrorSink>(sink: &S, entries: &[Entry]) -> Result<()> {
///     let engine = MirrorEngine::new(sink);
///     engine.apply(entries).await?;
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait MirrorSink: Send + Sync {
    /// Name of the destination schema this sink writes into.
    ///
    /// Resolved once when the sink is created.
    fn schema_name(&self) -> &str;

    /// Run an arbitrary statement without consuming any result.
    async fn execute(&self, statement: &str, params: &[ColumnValue]) -> Result<()>;

    /// Insert one row built from `record`.
    async fn create_row(&self, table: &str, record: &ColumnRecord) -> Result<()>;

    /// Set `record` on the rows where `where_column = where_value`.
    ///
    /// An empty record changes nothing.
    async fn update_rows(
        &self,
        table: &str,
        where_column: &str,
        where_value: &ColumnValue,
        record: &ColumnRecord,
    ) -> Result<()>;

    /// Delete the rows where `where_column = where_value`.
    async fn delete_rows(&self, table: &str, where_column: &str, where_value: &ColumnValue)
        -> Result<()>;
}
