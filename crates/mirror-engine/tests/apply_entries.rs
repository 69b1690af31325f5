//! Batch application tests against an in-memory recording sink.

use std::sync::Mutex;

use anyhow::{bail, Result};
use canal_types::{Column, Entry, EntryType, EventType, Header, RowChange, RowData};
use mirror_engine::{MirrorEngine, MissingKeyPolicy};
use mirror_sink::{ColumnRecord, ColumnValue, MirrorSink};
use prost::Message;

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Execute(String),
    Create {
        table: String,
        record: Vec<(String, ColumnValue)>,
    },
    Update {
        table: String,
        column: String,
        value: ColumnValue,
        record: Vec<(String, ColumnValue)>,
    },
    Delete {
        table: String,
        column: String,
        value: ColumnValue,
    },
}

struct RecordingSink {
    schema: String,
    ops: Mutex<Vec<Op>>,
    fail_table: Option<String>,
}

impl RecordingSink {
    fn new(schema: &str) -> Self {
        Self {
            schema: schema.to_string(),
            ops: Mutex::new(Vec::new()),
            fail_table: None,
        }
    }

    fn failing_on(schema: &str, table: &str) -> Self {
        Self {
            fail_table: Some(table.to_string()),
            ..Self::new(schema)
        }
    }

    fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    fn record(&self, table: &str, op: Op) -> Result<()> {
        if self.fail_table.as_deref() == Some(table) {
            bail!("simulated failure writing to {table}");
        }
        self.ops.lock().unwrap().push(op);
        Ok(())
    }
}

fn pairs(record: &ColumnRecord) -> Vec<(String, ColumnValue)> {
    record
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[async_trait::async_trait]
impl MirrorSink for RecordingSink {
    fn schema_name(&self) -> &str {
        &self.schema
    }

    async fn execute(&self, statement: &str, _params: &[ColumnValue]) -> Result<()> {
        self.record("", Op::Execute(statement.to_string()))
    }

    async fn create_row(&self, table: &str, record: &ColumnRecord) -> Result<()> {
        self.record(
            table,
            Op::Create {
                table: table.to_string(),
                record: pairs(record),
            },
        )
    }

    async fn update_rows(
        &self,
        table: &str,
        where_column: &str,
        where_value: &ColumnValue,
        record: &ColumnRecord,
    ) -> Result<()> {
        self.record(
            table,
            Op::Update {
                table: table.to_string(),
                column: where_column.to_string(),
                value: where_value.clone(),
                record: pairs(record),
            },
        )
    }

    async fn delete_rows(
        &self,
        table: &str,
        where_column: &str,
        where_value: &ColumnValue,
    ) -> Result<()> {
        self.record(
            table,
            Op::Delete {
                table: table.to_string(),
                column: where_column.to_string(),
                value: where_value.clone(),
            },
        )
    }
}

fn col(name: &str, value: &str, mysql_type: &str, is_key: bool, updated: bool) -> Column {
    Column {
        name: name.to_string(),
        value: value.to_string(),
        mysql_type: mysql_type.to_string(),
        is_key,
        updated,
        ..Default::default()
    }
}

fn text(v: &str) -> ColumnValue {
    ColumnValue::text(v)
}

fn entry(table: &str, change: RowChange) -> Entry {
    Entry {
        header: Some(Header {
            logfile_name: "mysql-bin.000001".to_string(),
            logfile_offset: 4,
            schema_name: "src_db".to_string(),
            table_name: table.to_string(),
            event_type: change.event_type,
            ..Default::default()
        }),
        entry_type: EntryType::RowData as i32,
        store_value: change.encode_to_vec(),
    }
}

fn dml(table: &str, event_type: EventType, rows: Vec<RowData>) -> Entry {
    entry(
        table,
        RowChange {
            event_type: event_type as i32,
            row_datas: rows,
            ..Default::default()
        },
    )
}

fn after(columns: Vec<Column>) -> RowData {
    RowData {
        after_columns: columns,
        ..Default::default()
    }
}

fn before(columns: Vec<Column>) -> RowData {
    RowData {
        before_columns: columns,
        ..Default::default()
    }
}

fn ddl(sql: &str, schema: &str) -> Entry {
    entry(
        "",
        RowChange {
            event_type: EventType::Create as i32,
            is_ddl: true,
            sql: sql.to_string(),
            ddl_schema_name: schema.to_string(),
            ..Default::default()
        },
    )
}

fn marker(entry_type: EntryType) -> Entry {
    Entry {
        entry_type: entry_type as i32,
        // never decoded, so garbage here must not matter
        store_value: vec![0xff, 0xff],
        ..Default::default()
    }
}

#[tokio::test]
async fn test_insert_omits_empty_datetime() -> Result<()> {
    let sink = RecordingSink::new("dst_db");
    let engine = MirrorEngine::new(&sink);

    let stats = engine
        .apply(&[dml(
            "users",
            EventType::Insert,
            vec![after(vec![
                col("id", "1", "int", true, false),
                col("updated_at", "", "datetime", false, false),
            ])],
        )])
        .await?;

    assert_eq!(
        sink.ops(),
        vec![Op::Create {
            table: "users".to_string(),
            record: vec![("id".to_string(), text("1"))],
        }]
    );
    assert_eq!(stats.rows_inserted, 1);
    Ok(())
}

#[tokio::test]
async fn test_insert_carries_null_flag() -> Result<()> {
    let sink = RecordingSink::new("dst_db");
    let mut nickname = col("nickname", "", "varchar(20)", false, false);
    nickname.is_null = true;

    MirrorEngine::new(&sink)
        .apply(&[dml(
            "users",
            EventType::Insert,
            vec![after(vec![col("id", "1", "int", true, false), nickname])],
        )])
        .await?;

    assert_eq!(
        sink.ops(),
        vec![Op::Create {
            table: "users".to_string(),
            record: vec![
                ("id".to_string(), text("1")),
                ("nickname".to_string(), ColumnValue::Null),
            ],
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_update_sets_changed_columns_by_key() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    let stats = MirrorEngine::new(&sink)
        .apply(&[dml(
            "users",
            EventType::Update,
            vec![after(vec![
                col("id", "7", "int", true, false),
                col("name", "Bob", "varchar(20)", false, true),
                col("city", "Oslo", "varchar(20)", false, false),
            ])],
        )])
        .await?;

    assert_eq!(
        sink.ops(),
        vec![Op::Update {
            table: "users".to_string(),
            column: "id".to_string(),
            value: text("7"),
            record: vec![("name".to_string(), text("Bob"))],
        }]
    );
    assert_eq!(stats.rows_updated, 1);
    Ok(())
}

#[tokio::test]
async fn test_update_skips_empty_json_even_if_updated() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    MirrorEngine::new(&sink)
        .apply(&[dml(
            "docs",
            EventType::Update,
            vec![after(vec![
                col("id", "3", "bigint", true, false),
                col("body", "", "json", false, true),
                col("title", "t", "varchar(20)", false, true),
            ])],
        )])
        .await?;

    assert_eq!(
        sink.ops(),
        vec![Op::Update {
            table: "docs".to_string(),
            column: "id".to_string(),
            value: text("3"),
            record: vec![("title".to_string(), text("t"))],
        }]
    );
    Ok(())
}

#[tokio::test]
async fn test_delete_targets_before_image_key() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    let stats = MirrorEngine::new(&sink)
        .apply(&[dml(
            "orders",
            EventType::Delete,
            vec![RowData {
                before_columns: vec![
                    col("id", "9", "int", true, false),
                    col("total", "10.50", "decimal(10,2)", false, false),
                ],
                after_columns: vec![col("id", "1000", "int", true, false)],
                ..Default::default()
            }],
        )])
        .await?;

    assert_eq!(
        sink.ops(),
        vec![Op::Delete {
            table: "orders".to_string(),
            column: "id".to_string(),
            value: text("9"),
        }]
    );
    assert_eq!(stats.rows_deleted, 1);
    Ok(())
}

#[tokio::test]
async fn test_ddl_rewritten_to_destination_schema() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    let stats = MirrorEngine::new(&sink)
        .apply(&[ddl("CREATE TABLE src_db.t (id INT PRIMARY KEY)", "src_db")])
        .await?;

    assert_eq!(
        sink.ops(),
        vec![Op::Execute(
            "CREATE TABLE dst_db.t (id INT PRIMARY KEY)".to_string()
        )]
    );
    assert_eq!(stats.ddl_applied, 1);
    Ok(())
}

#[tokio::test]
async fn test_empty_ddl_is_noop() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    let stats = MirrorEngine::new(&sink).apply(&[ddl("", "src_db")]).await?;

    assert!(sink.ops().is_empty());
    assert_eq!(stats.ddl_applied, 0);
    Ok(())
}

#[tokio::test]
async fn test_transaction_markers_never_reach_appliers() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    let stats = MirrorEngine::new(&sink)
        .apply(&[
            marker(EntryType::TransactionBegin),
            marker(EntryType::TransactionEnd),
        ])
        .await?;

    assert!(sink.ops().is_empty());
    assert_eq!(stats.markers_skipped, 2);
    assert_eq!(stats.decode_failures, 0);
    Ok(())
}

#[tokio::test]
async fn test_entries_applied_in_received_order() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    MirrorEngine::new(&sink)
        .apply(&[
            marker(EntryType::TransactionBegin),
            dml(
                "users",
                EventType::Insert,
                vec![after(vec![
                    col("id", "5", "int", true, false),
                    col("name", "Ann", "varchar(20)", false, false),
                ])],
            ),
            dml(
                "users",
                EventType::Update,
                vec![after(vec![
                    col("id", "5", "int", true, false),
                    col("name", "Anna", "varchar(20)", false, true),
                ])],
            ),
            marker(EntryType::TransactionEnd),
        ])
        .await?;

    assert_eq!(
        sink.ops(),
        vec![
            Op::Create {
                table: "users".to_string(),
                record: vec![
                    ("id".to_string(), text("5")),
                    ("name".to_string(), text("Ann")),
                ],
            },
            Op::Update {
                table: "users".to_string(),
                column: "id".to_string(),
                value: text("5"),
                record: vec![("name".to_string(), text("Anna"))],
            },
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_rows_of_one_event_applied_in_order() -> Result<()> {
    let sink = RecordingSink::new("dst_db");

    MirrorEngine::new(&sink)
        .apply(&[dml(
            "orders",
            EventType::Delete,
            vec![
                before(vec![col("id", "1", "int", true, false)]),
                before(vec![col("id", "2", "int", true, false)]),
            ],
        )])
        .await?;

    let deleted: Vec<ColumnValue> = sink
        .ops()
        .into_iter()
        .map(|op| match op {
            Op::Delete { value, .. } => value,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(deleted, vec![text("1"), text("2")]);
    Ok(())
}

#[tokio::test]
async fn test_undecodable_entry_is_skipped() -> Result<()> {
    let sink = RecordingSink::new("dst_db");
    let mut broken = dml("users", EventType::Insert, vec![]);
    broken.store_value = vec![0x12, 0x7f, 0x01];

    let stats = MirrorEngine::new(&sink)
        .apply(&[
            broken,
            dml(
                "users",
                EventType::Insert,
                vec![after(vec![col("id", "2", "int", true, false)])],
            ),
        ])
        .await?;

    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.rows_inserted, 1);
    assert_eq!(sink.ops().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_key_skipped_by_default() -> Result<()> {
    let sink = RecordingSink::new("dst_db");
    let keyless = vec![col("name", "Bob", "varchar(20)", false, true)];

    let stats = MirrorEngine::new(&sink)
        .apply(&[
            dml("users", EventType::Update, vec![after(keyless.clone())]),
            dml("users", EventType::Delete, vec![before(keyless)]),
        ])
        .await?;

    assert!(sink.ops().is_empty());
    assert_eq!(stats.rows_missing_key, 2);
    Ok(())
}

#[tokio::test]
async fn test_missing_key_aborts_when_configured() {
    let sink = RecordingSink::new("dst_db");
    let engine = MirrorEngine::new(&sink).with_missing_key_policy(MissingKeyPolicy::Abort);

    let result = engine
        .apply(&[
            dml(
                "users",
                EventType::Delete,
                vec![before(vec![col("name", "Bob", "varchar(20)", false, false)])],
            ),
            dml(
                "users",
                EventType::Insert,
                vec![after(vec![col("id", "2", "int", true, false)])],
            ),
        ])
        .await;

    assert!(result.is_err());
    assert!(sink.ops().is_empty());
}

#[tokio::test]
async fn test_destination_error_stops_batch() {
    let sink = RecordingSink::failing_on("dst_db", "orders");

    let result = MirrorEngine::new(&sink)
        .apply(&[
            dml(
                "users",
                EventType::Insert,
                vec![after(vec![col("id", "1", "int", true, false)])],
            ),
            dml(
                "orders",
                EventType::Insert,
                vec![after(vec![col("id", "1", "int", true, false)])],
            ),
            dml(
                "users",
                EventType::Insert,
                vec![after(vec![col("id", "2", "int", true, false)])],
            ),
        ])
        .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("orders"), "got: {err}");
    assert_eq!(sink.ops().len(), 1);
}

#[test]
fn test_engine_captures_destination_schema_once() {
    let sink = RecordingSink::new("mirror");
    let engine = MirrorEngine::new(&sink);
    assert_eq!(engine.dest_schema(), "mirror");
}
