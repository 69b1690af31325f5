//! Destination sink abstraction.
//!
//! This crate defines the `MirrorSink` trait, the only primitives the apply
//! engine needs from a destination database, together with the column value
//! types that flow through it. Driver crates (e.g. `mysql-sink`) implement the
//! trait; the engine stays independent of any specific query API.

mod traits;
mod value;

pub use traits::MirrorSink;
pub use value::{ColumnRecord, ColumnValue};
