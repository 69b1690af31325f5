//! Entry classification and dispatch.

use crate::ddl::apply_ddl;
use crate::dml::{apply_dml, MissingKeyPolicy};
use crate::ApplyStats;
use anyhow::Result;
use canal_types::{decode_row_change, Entry};
use mirror_sink::MirrorSink;
use tracing::{debug, warn};

/// Applies batches of change entries to a destination sink.
///
/// The engine borrows the sink for its whole lifetime and remembers the
/// destination schema name it reported at construction; it keeps no other
/// state between calls.
pub struct MirrorEngine<'a, S: MirrorSink + ?Sized> {
    sink: &'a S,
    dest_schema: String,
    missing_key_policy: MissingKeyPolicy,
}

impl<'a, S: MirrorSink + ?Sized> MirrorEngine<'a, S> {
    pub fn new(sink: &'a S) -> Self {
        Self {
            dest_schema: sink.schema_name().to_string(),
            sink,
            missing_key_policy: MissingKeyPolicy::default(),
        }
    }

    pub fn with_missing_key_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_key_policy = policy;
        self
    }

    pub fn dest_schema(&self) -> &str {
        &self.dest_schema
    }

    /// Apply `entries` strictly in order.
    ///
    /// Transaction markers are skipped and entries whose payload fails to
    /// decode are logged and skipped. The first destination error stops the
    /// batch and is returned; entries after it are not applied.
    pub async fn apply(&self, entries: &[Entry]) -> Result<ApplyStats> {
        let mut stats = ApplyStats::default();
        for entry in entries {
            self.apply_entry(entry, &mut stats).await?;
        }
        Ok(stats)
    }

    async fn apply_entry(&self, entry: &Entry, stats: &mut ApplyStats) -> Result<()> {
        if entry.entry_type().is_transaction_marker() {
            stats.markers_skipped += 1;
            return Ok(());
        }

        let row_change = match decode_row_change(entry) {
            Ok(row_change) => row_change,
            Err(e) => {
                warn!("Skipping entry: {e}");
                stats.decode_failures += 1;
                return Ok(());
            }
        };

        let event_type = row_change.event_type();
        if !event_type.is_dml() {
            if apply_ddl(
                self.sink,
                &row_change.ddl_schema_name,
                &self.dest_schema,
                &row_change.sql,
            )
            .await?
            {
                stats.ddl_applied += 1;
            }
            return Ok(());
        }

        if let Some(header) = &entry.header {
            debug!(
                "binlog[{}:{}], name[{},{}], eventType: {}",
                header.logfile_name,
                header.logfile_offset,
                header.schema_name,
                header.table_name,
                header.event_type()
            );
        }

        apply_dml(
            self.sink,
            entry.table_name(),
            event_type,
            &row_change.row_datas,
            self.missing_key_policy,
            stats,
        )
        .await
    }
}
