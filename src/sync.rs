//! The batch polling loop.
//!
//! Fetches batches from a [`ChangeSource`], applies each through the
//! [`MirrorEngine`], and acknowledges it. A batch that fails to apply is
//! rolled back on the source and the error ends the loop.

use anyhow::{Context, Result};
use mirror_engine::{ApplyStats, MirrorEngine};
use mirror_sink::MirrorSink;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::source::ChangeSource;

/// Polling loop options (non-connection related)
#[derive(Clone, Debug)]
pub struct MirrorOpts {
    /// Maximum entries requested per batch
    pub batch_size: usize,
    /// Pause after an empty batch before polling again
    pub poll_interval: Duration,
}

impl Default for MirrorOpts {
    fn default() -> Self {
        Self {
            batch_size: 100,
            poll_interval: Duration::from_millis(300),
        }
    }
}

/// Mirror every batch `source` delivers until it closes.
///
/// Returns the accumulated counters of all applied batches.
pub async fn run_mirror<C, S>(
    source: &mut C,
    engine: &MirrorEngine<'_, S>,
    opts: &MirrorOpts,
) -> Result<ApplyStats>
where
    C: ChangeSource + ?Sized,
    S: MirrorSink + ?Sized,
{
    info!(
        "Starting mirror into schema '{}' (batch size {}, poll interval {:?})",
        engine.dest_schema(),
        opts.batch_size,
        opts.poll_interval
    );

    let mut total = ApplyStats::default();
    let mut batch_count = 0u64;

    while let Some(batch) = source
        .fetch_batch(opts.batch_size)
        .await
        .context("Failed to fetch batch from change source")?
    {
        if batch.is_empty() {
            tokio::time::sleep(opts.poll_interval).await;
            continue;
        }

        match engine.apply(&batch.entries).await {
            Ok(stats) => {
                source
                    .ack(batch.id)
                    .await
                    .with_context(|| format!("Failed to ack batch {}", batch.id))?;
                debug!(
                    "Batch {} applied ({} entries): {stats}",
                    batch.id,
                    batch.entries.len()
                );
                total.merge(&stats);
                batch_count += 1;
                if batch_count % 100 == 0 {
                    info!("Processed {batch_count} batches: {total}");
                }
            }
            Err(e) => {
                if let Err(rollback_err) = source.rollback(batch.id).await {
                    warn!("Failed to roll back batch {}: {rollback_err:#}", batch.id);
                }
                return Err(e.context(format!("Failed to apply batch {}", batch.id)));
            }
        }
    }

    info!("Mirror completed. Processed {batch_count} batches: {total}");
    Ok(total)
}
