//! Canal change-entry messages.
//!
//! Field tags follow canal's `EntryProtocol.proto` so that `storeValue`
//! payloads and entries captured from a canal server decode unchanged.
//! Fields this crate never reads (props, gtid, sql types) are still declared
//! so that re-encoded entries keep them.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Entry {
    #[prost(message, optional, tag = "1")]
    pub header: ::core::option::Option<Header>,
    #[prost(enumeration = "EntryType", tag = "2")]
    pub entry_type: i32,
    /// Encoded [`RowChange`]
    #[prost(bytes = "vec", tag = "3")]
    pub store_value: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Header {
    #[prost(int32, tag = "1")]
    pub version: i32,
    #[prost(string, tag = "2")]
    pub logfile_name: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub logfile_offset: i64,
    #[prost(int64, tag = "4")]
    pub server_id: i64,
    #[prost(string, tag = "5")]
    pub serveren_code: ::prost::alloc::string::String,
    #[prost(int64, tag = "6")]
    pub execute_time: i64,
    #[prost(enumeration = "SourceType", tag = "7")]
    pub source_type: i32,
    #[prost(string, tag = "8")]
    pub schema_name: ::prost::alloc::string::String,
    #[prost(string, tag = "9")]
    pub table_name: ::prost::alloc::string::String,
    #[prost(int64, tag = "10")]
    pub event_length: i64,
    #[prost(enumeration = "EventType", tag = "11")]
    pub event_type: i32,
    #[prost(message, repeated, tag = "12")]
    pub props: ::prost::alloc::vec::Vec<Pair>,
    #[prost(string, tag = "13")]
    pub gtid: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Column {
    #[prost(int32, tag = "1")]
    pub index: i32,
    /// `java.sql.Types` code
    #[prost(int32, tag = "2")]
    pub sql_type: i32,
    #[prost(string, tag = "3")]
    pub name: ::prost::alloc::string::String,
    #[prost(bool, tag = "4")]
    pub is_key: bool,
    /// Only meaningful for UPDATE after-images
    #[prost(bool, tag = "5")]
    pub updated: bool,
    #[prost(bool, tag = "6")]
    pub is_null: bool,
    #[prost(message, repeated, tag = "7")]
    pub props: ::prost::alloc::vec::Vec<Pair>,
    #[prost(string, tag = "8")]
    pub value: ::prost::alloc::string::String,
    #[prost(int32, tag = "9")]
    pub length: i32,
    /// Source column type as declared, e.g. `datetime(3)` or `json`
    #[prost(string, tag = "10")]
    pub mysql_type: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RowData {
    #[prost(message, repeated, tag = "1")]
    pub before_columns: ::prost::alloc::vec::Vec<Column>,
    #[prost(message, repeated, tag = "2")]
    pub after_columns: ::prost::alloc::vec::Vec<Column>,
    #[prost(message, repeated, tag = "3")]
    pub props: ::prost::alloc::vec::Vec<Pair>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RowChange {
    #[prost(int64, tag = "1")]
    pub table_id: i64,
    #[prost(enumeration = "EventType", tag = "2")]
    pub event_type: i32,
    #[prost(bool, tag = "10")]
    pub is_ddl: bool,
    /// Raw statement text, DDL only
    #[prost(string, tag = "11")]
    pub sql: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "12")]
    pub row_datas: ::prost::alloc::vec::Vec<RowData>,
    #[prost(message, repeated, tag = "13")]
    pub props: ::prost::alloc::vec::Vec<Pair>,
    /// Schema that was current on the source when the DDL ran
    #[prost(string, tag = "14")]
    pub ddl_schema_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pair {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EntryType {
    Compatible = 0,
    TransactionBegin = 1,
    RowData = 2,
    TransactionEnd = 3,
    Heartbeat = 4,
    GtidLog = 5,
}

impl EntryType {
    /// Transaction boundaries carry no row change and are never applied.
    pub fn is_transaction_marker(self) -> bool {
        matches!(self, Self::TransactionBegin | Self::TransactionEnd)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum EventType {
    Compatible = 0,
    Insert = 1,
    Update = 2,
    Delete = 3,
    Create = 4,
    Alter = 5,
    Erase = 6,
    Query = 7,
    Truncate = 8,
    Rename = 9,
    CIndex = 10,
    DIndex = 11,
    Gtid = 12,
    XaCommit = 13,
    XaRollback = 14,
    MHeartbeat = 15,
}

impl EventType {
    /// Row-level events. Every other kind is treated as a schema statement.
    pub fn is_dml(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }

    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Compatible => "EVENTTYPECOMPATIBLEPROTO2",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Alter => "ALTER",
            Self::Erase => "ERASE",
            Self::Query => "QUERY",
            Self::Truncate => "TRUNCATE",
            Self::Rename => "RENAME",
            Self::CIndex => "CINDEX",
            Self::DIndex => "DINDEX",
            Self::Gtid => "GTID",
            Self::XaCommit => "XACOMMIT",
            Self::XaRollback => "XAROLLBACK",
            Self::MHeartbeat => "MHEARTBEAT",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SourceType {
    Compatible = 0,
    Oracle = 1,
    Mysql = 2,
    Pgsql = 3,
}
