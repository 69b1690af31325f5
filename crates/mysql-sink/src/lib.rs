//! MySQL destination for canal-mirror
//!
//! Implements [`mirror_sink::MirrorSink`] on top of a `mysql_async` pool.
//! Row mutations go through prepared statements with positional parameters;
//! raw statements without parameters use the text protocol so that any DDL
//! the source captured can be replayed.

mod connect;
mod sink;
mod statement;

pub use connect::{new_mysql_pool, MySqlSink};
pub use statement::{
    delete_statement, insert_statement, quote_identifier, update_statement, Statement,
};
