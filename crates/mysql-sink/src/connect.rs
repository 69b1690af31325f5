//! MySQL pool creation and destination schema resolution.

use anyhow::{anyhow, Context, Result};
use mysql_async::{prelude::*, Opts, Pool, Row};
use tracing::info;

/// Create a new MySQL connection pool
pub fn new_mysql_pool(connection_string: &str) -> Result<Pool> {
    let opts = Opts::from_url(connection_string)
        .with_context(|| "Invalid MySQL connection string".to_string())?;
    Ok(Pool::new(opts))
}

/// MySQL destination for mirrored changes.
///
/// Holds a connection pool and the destination schema name. Dropping the
/// sink does not close the pool; call [`MySqlSink::disconnect`] for that.
pub struct MySqlSink {
    pub(crate) pool: Pool,
    pub(crate) schema_name: String,
}

impl MySqlSink {
    /// Connect to the destination and resolve its schema name.
    ///
    /// The schema comes from the database part of the connection URL, or from
    /// `SELECT DATABASE()` when the URL names none. A connection with no
    /// current schema is rejected.
    pub async fn connect(connection_string: &str) -> Result<Self> {
        let pool = new_mysql_pool(connection_string)?;
        let from_url = Opts::from_url(connection_string)?
            .db_name()
            .map(str::to_string);

        let schema_name = match from_url {
            Some(name) => name,
            None => {
                let mut conn = pool
                    .get_conn()
                    .await
                    .context("Failed to connect to destination MySQL")?;
                let row: Option<Row> = conn.query_first("SELECT DATABASE()").await?;
                row.and_then(|r| r.get::<Option<String>, _>(0))
                    .flatten()
                    .ok_or_else(|| {
                        anyhow!("Destination MySQL connection has no current database")
                    })?
            }
        };

        info!("Connected to destination MySQL schema '{schema_name}'");
        Ok(Self::with_pool(pool, schema_name))
    }

    /// Wrap an existing pool whose schema is already known.
    pub fn with_pool(pool: Pool, schema_name: impl Into<String>) -> Self {
        Self {
            pool,
            schema_name: schema_name.into(),
        }
    }

    /// Close every pooled connection.
    pub async fn disconnect(self) -> Result<()> {
        self.pool.disconnect().await?;
        Ok(())
    }
}
