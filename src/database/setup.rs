use anyhow::{Context, Result};

use super::connection::DbConn;

/// Creates missing tables; existing data is left alone
pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    run_script(conn, include_str!("schema.sql"))?;
    log::debug!("Database schema ensured");
    Ok(())
}

/// Drops every table and recreates the schema
pub fn reset_database(conn: &mut DbConn) -> Result<()> {
    run_script(conn, include_str!("drop.sql"))?;
    run_script(conn, include_str!("schema.sql"))?;

    log::info!("Database schema reset successfully");
    Ok(())
}

fn run_script(conn: &mut DbConn, script: &str) -> Result<()> {
    let statements = split_sql_statements(script);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &mut DbConn, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection};

    fn table_count(conn: &DbConn) -> i64 {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_split_sql_statements_skips_blanks() {
        let statements = split_sql_statements("CREATE TABLE a (x);\n\n  ;CREATE TABLE b (y);\n");

        assert_eq!(statements, vec!["CREATE TABLE a (x)", "CREATE TABLE b (y)"]);
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();

        ensure_schema(&mut conn).unwrap();
        ensure_schema(&mut conn).unwrap();

        assert_eq!(table_count(&conn), 3);
    }

    #[test]
    fn test_reset_drops_rows() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();
        conn.execute("INSERT INTO profiles (profileId, name) VALUES (1, 'A')", [])
            .unwrap();

        reset_database(&mut conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(table_count(&conn), 3);
    }
}
