//! Replay of captured change entries from a dump file.
//!
//! The dump is the length-delimited entry sequence written by
//! [`canal_types::encode_entries`]. Entries are handed out in file order,
//! in batches numbered from 1.

use std::path::Path;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use canal_types::{decode_entries, Batch, Entry};
use tracing::{debug, info};

use crate::source::ChangeSource;

/// A [`ChangeSource`] over entries loaded from a dump file.
pub struct ReplaySource {
    entries: Vec<Entry>,
    cursor: usize,
    next_batch_id: i64,
    // batch id and the cursor position it started at
    in_flight: Option<(i64, usize)>,
}

impl ReplaySource {
    /// Load every entry of the dump at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read entry dump {}", path.display()))?;
        let entries = decode_entries(&data)
            .with_context(|| format!("Failed to decode entry dump {}", path.display()))?;
        info!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            cursor: 0,
            next_batch_id: 1,
            in_flight: None,
        }
    }

    /// Entries not yet handed out.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.cursor
    }
}

#[async_trait]
impl ChangeSource for ReplaySource {
    async fn fetch_batch(&mut self, max_entries: usize) -> Result<Option<Batch>> {
        if max_entries == 0 {
            bail!("Batch size must be greater than zero");
        }
        if self.cursor >= self.entries.len() {
            return Ok(None);
        }

        let start = self.cursor;
        let end = (start + max_entries).min(self.entries.len());
        let id = self.next_batch_id;
        self.next_batch_id += 1;
        self.cursor = end;
        self.in_flight = Some((id, start));

        debug!("Replaying batch {id}: entries {start}..{end}");
        Ok(Some(Batch::new(id, self.entries[start..end].to_vec())))
    }

    async fn ack(&mut self, batch_id: i64) -> Result<()> {
        match self.in_flight {
            Some((id, _)) if id == batch_id => {
                self.in_flight = None;
                Ok(())
            }
            _ => bail!("Cannot ack batch {batch_id}: it is not in flight"),
        }
    }

    async fn rollback(&mut self, batch_id: i64) -> Result<()> {
        match self.in_flight {
            Some((id, start)) if id == batch_id => {
                self.cursor = start;
                self.in_flight = None;
                info!("Rolled back batch {batch_id}, replay resumes at entry {start}");
                Ok(())
            }
            _ => bail!("Cannot roll back batch {batch_id}: it is not in flight"),
        }
    }
}
