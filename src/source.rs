//! Change-stream source abstraction.
//!
//! The apply engine only consumes batches; where they come from (a canal
//! server, a capture file) is behind this trait.

use anyhow::Result;
use async_trait::async_trait;
use canal_types::Batch;

/// A source of ordered change-entry batches.
#[async_trait]
pub trait ChangeSource: Send {
    /// Fetch the next batch of at most `max_entries` entries.
    ///
    /// Returns an empty batch (see [`Batch::is_empty`]) when nothing new is
    /// available yet, and `None` once the source is closed for good.
    async fn fetch_batch(&mut self, max_entries: usize) -> Result<Option<Batch>>;

    /// Confirm that every entry of `batch_id` has been applied.
    async fn ack(&mut self, batch_id: i64) -> Result<()>;

    /// Ask for `batch_id` to be delivered again.
    async fn rollback(&mut self, batch_id: i64) -> Result<()>;
}
