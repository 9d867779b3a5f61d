//! Relational schema of the catalog store.

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::Result;

/// Schema revision written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 2;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS catalog (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT    NOT NULL UNIQUE,
    name        TEXT    NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS catalog_version (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    catalog_id     INTEGER NOT NULL REFERENCES catalog(id) ON DELETE CASCADE,
    version        TEXT    NOT NULL,
    -- Day number in the common era, see `store::day`.
    effective_date INTEGER NOT NULL,
    UNIQUE (catalog_id, version),
    UNIQUE (catalog_id, effective_date)
);

CREATE TABLE IF NOT EXISTS catalog_entry (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    version_id INTEGER NOT NULL REFERENCES catalog_version(id) ON DELETE CASCADE,
    code       TEXT    NOT NULL,
    value      TEXT    NOT NULL,
    UNIQUE (version_id, code)
);

-- (catalog_id, effective_date) is already indexed by its UNIQUE constraint.
CREATE INDEX IF NOT EXISTS idx_catalog_version_effective
    ON catalog_version (effective_date, catalog_id);
"#;

/// Revision 1 kept `effective_date` as `YYYY-MM-DD` text. Rebuild the table
/// with day numbers; `SCHEMA_SQL` recreates the dropped index afterwards.
const UPGRADE_V2_SQL: &str = r#"
CREATE TABLE catalog_version_v2 (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    catalog_id     INTEGER NOT NULL REFERENCES catalog(id) ON DELETE CASCADE,
    version        TEXT    NOT NULL,
    effective_date INTEGER NOT NULL,
    UNIQUE (catalog_id, version),
    UNIQUE (catalog_id, effective_date)
);

INSERT INTO catalog_version_v2 (id, catalog_id, version, effective_date)
    SELECT id, catalog_id, version,
           CAST(julianday(effective_date) - julianday('0001-01-01') AS INTEGER) + 1
    FROM catalog_version;

DROP TABLE catalog_version;
ALTER TABLE catalog_version_v2 RENAME TO catalog_version;
"#;

/// Create tables and indexes if they do not exist yet, upgrading older
/// revisions in place.
pub fn migrate(conn: &Connection) -> Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if current == 1 {
        upgrade_v2(conn)?;
    }
    conn.execute_batch(SCHEMA_SQL)?;
    if current < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        debug!(from = current, to = SCHEMA_VERSION, "migrated catalog schema");
    }
    Ok(())
}

fn upgrade_v2(conn: &Connection) -> Result<()> {
    // Dropping the old table must not cascade into catalog_entry.
    conn.pragma_update(None, "foreign_keys", false)?;
    let upgraded = conn.unchecked_transaction().and_then(|tx| {
        tx.execute_batch(UPGRADE_V2_SQL)?;
        tx.commit()
    });
    conn.pragma_update(None, "foreign_keys", true)?;
    upgraded?;
    info!("rewrote catalog version dates as day numbers");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    const V1_SCHEMA_SQL: &str = r#"
    CREATE TABLE catalog (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        description TEXT
    );
    CREATE TABLE catalog_version (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        catalog_id INTEGER NOT NULL REFERENCES catalog(id) ON DELETE CASCADE,
        version TEXT NOT NULL,
        effective_date TEXT NOT NULL,
        UNIQUE (catalog_id, version),
        UNIQUE (catalog_id, effective_date)
    );
    CREATE TABLE catalog_entry (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        version_id INTEGER NOT NULL REFERENCES catalog_version(id) ON DELETE CASCADE,
        code TEXT NOT NULL,
        value TEXT NOT NULL,
        UNIQUE (version_id, code)
    );
    INSERT INTO catalog (code, name) VALUES ('okved', 'OKVED');
    INSERT INTO catalog_version (catalog_id, version, effective_date) VALUES (1, '1.0', '2024-01-01');
    INSERT INTO catalog_version (catalog_id, version, effective_date) VALUES (1, '2.0', '2024-03-15');
    INSERT INTO catalog_entry (version_id, code, value) VALUES (2, '01', 'Agriculture');
    PRAGMA user_version = 1;
    "#;

    fn count(conn: &Connection, sql: &str) -> i64 {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();

        assert_eq!(count(&conn, "PRAGMA user_version"), SCHEMA_VERSION);
        assert_eq!(
            count(
                &conn,
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name LIKE 'catalog%'"
            ),
            3
        );
    }

    #[test]
    fn test_upgrade_rewrites_text_dates() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", true).unwrap();
        conn.execute_batch(V1_SCHEMA_SQL).unwrap();

        migrate(&conn).unwrap();

        assert_eq!(count(&conn, "PRAGMA user_version"), SCHEMA_VERSION);
        let mut stmt = conn
            .prepare("SELECT effective_date FROM catalog_version ORDER BY id")
            .unwrap();
        let days: Vec<i64> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|d| d.unwrap())
            .collect();
        let expected: Vec<i64> = [(2024, 1, 1), (2024, 3, 15)]
            .into_iter()
            .map(|(y, m, d)| {
                i64::from(NaiveDate::from_ymd_opt(y, m, d).unwrap().num_days_from_ce())
            })
            .collect();
        assert_eq!(days, expected);

        // Entries survive the rebuild and still reference their version.
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM catalog_entry"), 1);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM pragma_foreign_key_check"), 0);
        assert_eq!(count(&conn, "PRAGMA foreign_keys"), 1);
        assert_eq!(
            count(
                &conn,
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'idx_catalog_version_effective'"
            ),
            1
        );
    }
}
