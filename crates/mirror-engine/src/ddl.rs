//! Schema statement replay.

use anyhow::Result;
use mirror_sink::MirrorSink;
use tracing::{debug, info};

/// Replace every occurrence of `source_schema` in `statement` with `dest_schema`.
///
/// This is a plain substring replacement: a table or column whose name
/// contains the source schema name is renamed as well. An empty source schema
/// leaves the statement untouched.
pub fn rewrite_schema(statement: &str, source_schema: &str, dest_schema: &str) -> String {
    if source_schema.is_empty() {
        return statement.to_string();
    }
    statement.replace(source_schema, dest_schema)
}

/// Rewrite a captured DDL statement for the destination schema and run it.
///
/// Returns `false` when there was no statement to run. Execution errors are
/// returned to the caller unchanged.
pub async fn apply_ddl<S: MirrorSink + ?Sized>(
    sink: &S,
    source_schema: &str,
    dest_schema: &str,
    statement: &str,
) -> Result<bool> {
    if statement.is_empty() {
        debug!("Skipping empty DDL statement from schema '{source_schema}'");
        return Ok(false);
    }
    let rewritten = rewrite_schema(statement, source_schema, dest_schema);
    info!("Applying DDL: {rewritten}");
    sink.execute(&rewritten, &[]).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_qualified_statement() {
        assert_eq!(
            rewrite_schema("CREATE TABLE src_db.t (id INT)", "src_db", "dst_db"),
            "CREATE TABLE dst_db.t (id INT)"
        );
    }

    #[test]
    fn test_rewrite_replaces_every_occurrence() {
        assert_eq!(
            rewrite_schema(
                "ALTER TABLE `src_db`.`a` ADD CONSTRAINT fk FOREIGN KEY (b) REFERENCES `src_db`.`b` (id)",
                "src_db",
                "dst_db"
            ),
            "ALTER TABLE `dst_db`.`a` ADD CONSTRAINT fk FOREIGN KEY (b) REFERENCES `dst_db`.`b` (id)"
        );
    }

    #[test]
    fn test_rewrite_same_name_is_identity() {
        let stmt = "DROP TABLE shop.orders";
        assert_eq!(rewrite_schema(stmt, "shop", "shop"), stmt);
    }

    #[test]
    fn test_rewrite_also_hits_matching_identifiers() {
        // Known limitation: a column named like the schema is renamed too.
        assert_eq!(
            rewrite_schema("ALTER TABLE shop.t ADD COLUMN shop_id INT", "shop", "mirror"),
            "ALTER TABLE mirror.t ADD COLUMN mirror_id INT"
        );
    }

    #[test]
    fn test_rewrite_empty_source_schema() {
        assert_eq!(rewrite_schema("CREATE TABLE t (id INT)", "", "dst"), "CREATE TABLE t (id INT)");
    }
}
