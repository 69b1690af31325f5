//! `MirrorSink` implementation for MySQL.

use crate::connect::MySqlSink;
use crate::statement::{delete_statement, insert_statement, update_statement, Statement};
use anyhow::{Context, Result};
use mirror_sink::{ColumnRecord, ColumnValue, MirrorSink};
use mysql_async::{prelude::*, Params, Value};
use tracing::{debug, trace};

fn to_mysql_value(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::Text(s) => Value::Bytes(s.as_bytes().to_vec()),
        ColumnValue::Null => Value::NULL,
    }
}

fn to_params(values: &[ColumnValue]) -> Params {
    Params::Positional(values.iter().map(to_mysql_value).collect())
}

impl MySqlSink {
    async fn run(&self, stmt: Statement) -> Result<()> {
        trace!("MySQL: {} {:?}", stmt.sql, stmt.params);
        let mut conn = self.pool.get_conn().await?;
        conn.exec_drop(stmt.sql.as_str(), to_params(&stmt.params))
            .await
            .with_context(|| format!("Failed to execute: {}", stmt.sql))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MirrorSink for MySqlSink {
    fn schema_name(&self) -> &str {
        &self.schema_name
    }

    async fn execute(&self, statement: &str, params: &[ColumnValue]) -> Result<()> {
        let mut conn = self.pool.get_conn().await?;
        if params.is_empty() {
            // Text protocol: not every DDL statement can be prepared.
            conn.query_drop(statement)
                .await
                .with_context(|| format!("Failed to execute: {statement}"))?;
        } else {
            conn.exec_drop(statement, to_params(params))
                .await
                .with_context(|| format!("Failed to execute: {statement}"))?;
        }
        Ok(())
    }

    async fn create_row(&self, table: &str, record: &ColumnRecord) -> Result<()> {
        self.run(insert_statement(table, record)).await
    }

    async fn update_rows(
        &self,
        table: &str,
        where_column: &str,
        where_value: &ColumnValue,
        record: &ColumnRecord,
    ) -> Result<()> {
        match update_statement(table, where_column, where_value, record) {
            Some(stmt) => self.run(stmt).await,
            None => {
                debug!("No columns to update in {table} where {where_column} = {where_value}");
                Ok(())
            }
        }
    }

    async fn delete_rows(
        &self,
        table: &str,
        where_column: &str,
        where_value: &ColumnValue,
    ) -> Result<()> {
        self.run(delete_statement(table, where_column, where_value))
            .await
    }
}
