//! Key-value primitives over the `kv` and `hash` tables.
//!
//! These are synchronous and take a plain `rusqlite::Connection` (or a
//! `Transaction`, which derefs to one), so they compose inside a single
//! `tokio_rusqlite::Connection::call` closure.

use rusqlite::{params, Connection, OptionalExtension};

pub fn get(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
        row.get(0)
    })
    .optional()
}

pub fn set(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        r#"INSERT INTO kv (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value"#,
        params![key, value],
    )?;
    Ok(())
}

pub fn hget(conn: &Connection, key: &str, field: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM hash WHERE key = ?1 AND field = ?2",
        params![key, field],
        |row| row.get(0),
    )
    .optional()
}

pub fn hset(conn: &Connection, key: &str, field: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        r#"INSERT INTO hash (key, field, value) VALUES (?1, ?2, ?3)
           ON CONFLICT(key, field) DO UPDATE SET value = excluded.value"#,
        params![key, field, value],
    )?;
    Ok(())
}

/// All fields of a hash record, in insertion order.
#[allow(dead_code)]
pub fn hgetall(conn: &Connection, key: &str) -> rusqlite::Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT field, value FROM hash WHERE key = ?1 ORDER BY rowid")?;
    let fields = stmt
        .query_map(params![key], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(fields)
}
