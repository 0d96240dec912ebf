//! SQLite DDL for the contract store.

use rusqlite::Connection;

/// Current schema version stamped into `schema_meta`.
pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Uses `IF NOT EXISTS` throughout so `apply_schema` is idempotent.
pub(crate) const SCHEMA_SQL: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS schema_meta (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- One row per contract; ownership is a column, not a separate table.
CREATE TABLE IF NOT EXISTS contracts (
    id              TEXT PRIMARY KEY,
    owner           TEXT NOT NULL,
    owner_key       TEXT NOT NULL,      -- lowercase owner, for lookups
    name            TEXT NOT NULL,
    address         TEXT NOT NULL,
    email           TEXT NOT NULL DEFAULT 'N/A',
    contact         TEXT NOT NULL DEFAULT 'N/A',
    visits_per_year INTEGER NOT NULL DEFAULT 0,
    last_visit      TEXT,               -- dd/MM/yyyy as entered
    created_at      INTEGER NOT NULL DEFAULT 0,
    updated_at      INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_contracts_owner_key ON contracts(owner_key);
"#;

/// Apply the full schema to an open connection and seed the version stamp.
pub(crate) fn apply_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', ?1)",
        rusqlite::params![CURRENT_SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

/// Read the stamped schema version, if any.
pub(crate) fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<u32>> {
    let mut stmt = conn.prepare("SELECT value FROM schema_meta WHERE key = 'schema_version'")?;
    let mut rows = stmt.query([])?;
    match rows.next()? {
        Some(row) => {
            let value: String = row.get(0)?;
            Ok(value.parse().ok())
        }
        None => Ok(None),
    }
}
