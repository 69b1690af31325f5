//! Row-change apply engine for canal-mirror
//!
//! Takes the entries of one change-stream batch and replays each of them on
//! a destination [`mirror_sink::MirrorSink`]:
//!
//! - transaction begin/end markers are dropped
//! - DDL statements are rewritten to the destination schema and executed
//! - INSERT/UPDATE/DELETE rows become key-targeted row mutations
//!
//! Entries are applied one at a time, in the order received, each mutation
//! awaited before the next one starts.

pub mod ddl;
pub mod dml;
mod engine;
pub mod normalize;

pub use ddl::{apply_ddl, rewrite_schema};
pub use dml::{apply_dml, MissingKeyPolicy};
pub use engine::MirrorEngine;
pub use normalize::{find_key, is_suppressed, KeyColumn};

/// Counters for one or more applied batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub markers_skipped: u64,
    pub decode_failures: u64,
    pub ddl_applied: u64,
    pub rows_inserted: u64,
    pub rows_updated: u64,
    pub rows_deleted: u64,
    pub rows_missing_key: u64,
}

impl ApplyStats {
    pub fn rows_applied(&self) -> u64 {
        self.rows_inserted + self.rows_updated + self.rows_deleted
    }

    pub fn merge(&mut self, other: &ApplyStats) {
        self.markers_skipped += other.markers_skipped;
        self.decode_failures += other.decode_failures;
        self.ddl_applied += other.ddl_applied;
        self.rows_inserted += other.rows_inserted;
        self.rows_updated += other.rows_updated;
        self.rows_deleted += other.rows_deleted;
        self.rows_missing_key += other.rows_missing_key;
    }
}

impl std::fmt::Display for ApplyStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ddl, {} inserted, {} updated, {} deleted, {} without key, {} undecodable",
            self.ddl_applied,
            self.rows_inserted,
            self.rows_updated,
            self.rows_deleted,
            self.rows_missing_key,
            self.decode_failures
        )
    }
}
