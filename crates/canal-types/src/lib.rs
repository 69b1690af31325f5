//! Canal change-stream types for canal-mirror
//!
//! This crate models what the upstream change-stream source hands to the
//! apply engine: batches of [`Entry`] values whose `store_value` still holds
//! an encoded [`RowChange`]. It also provides the length-delimited dump
//! format used to replay captured entries from a file.

mod protocol;

use prost::Message;
use thiserror::Error;

pub use protocol::{
    Column, Entry, EntryType, EventType, Header, Pair, RowChange, RowData, SourceType,
};

/// Batch id the source reports when nothing new is available.
pub const EMPTY_BATCH_ID: i64 = -1;

/// Errors raised while decoding change-stream payloads
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed row change payload for {schema}.{table}: {source}")]
    RowChange {
        schema: String,
        table: String,
        #[source]
        source: prost::DecodeError,
    },

    #[error("malformed entry #{index} in entry dump: {source}")]
    Dump {
        index: usize,
        #[source]
        source: prost::DecodeError,
    },
}

/// An ordered group of entries delivered together by the change-stream source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub id: i64,
    pub entries: Vec<Entry>,
}

impl Batch {
    pub fn new(id: i64, entries: Vec<Entry>) -> Self {
        Self { id, entries }
    }

    /// A batch with no entries, as reported when the source has nothing new.
    pub fn empty() -> Self {
        Self::new(EMPTY_BATCH_ID, Vec::new())
    }

    /// True when the source signalled "nothing new", either by id or by content.
    pub fn is_empty(&self) -> bool {
        self.id == EMPTY_BATCH_ID || self.entries.is_empty()
    }
}

impl Entry {
    pub fn schema_name(&self) -> &str {
        self.header
            .as_ref()
            .map(|h| h.schema_name.as_str())
            .unwrap_or_default()
    }

    pub fn table_name(&self) -> &str {
        self.header
            .as_ref()
            .map(|h| h.table_name.as_str())
            .unwrap_or_default()
    }
}

/// Decode the row change carried in an entry's `store_value`.
pub fn decode_row_change(entry: &Entry) -> Result<RowChange, DecodeError> {
    RowChange::decode(entry.store_value.as_slice()).map_err(|source| DecodeError::RowChange {
        schema: entry.schema_name().to_string(),
        table: entry.table_name().to_string(),
        source,
    })
}

/// Encode entries as a sequence of length-delimited protobuf messages.
pub fn encode_entries(entries: &[Entry]) -> Vec<u8> {
    let mut out = Vec::new();
    for entry in entries {
        out.extend_from_slice(&entry.encode_length_delimited_to_vec());
    }
    out
}

/// Decode a buffer produced by [`encode_entries`].
pub fn decode_entries(mut buf: &[u8]) -> Result<Vec<Entry>, DecodeError> {
    let mut entries = Vec::new();
    while !buf.is_empty() {
        let entry = Entry::decode_length_delimited(&mut buf).map_err(|source| {
            DecodeError::Dump {
                index: entries.len(),
                source,
            }
        })?;
        entries.push(entry);
    }
    Ok(entries)
}
