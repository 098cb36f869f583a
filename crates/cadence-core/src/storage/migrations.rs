//! Database schema migrations for cadence.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if a migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// v1: initial schema.
///
/// The two UNIQUE indexes are the backstop the engine relies on: one
/// activity per user/program/day, one award per user/program/cycle.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            slack_id     TEXT NOT NULL UNIQUE,
            display_name TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS programs (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            slack_channel TEXT NOT NULL,
            start_date    TEXT NOT NULL,
            end_date      TEXT,
            created_at    TEXT NOT NULL,
            UNIQUE(name, slack_channel)
        );

        CREATE TABLE IF NOT EXISTS activities (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      INTEGER NOT NULL REFERENCES users(id),
            program_id   INTEGER NOT NULL REFERENCES programs(id),
            description  TEXT NOT NULL,
            evidence_url TEXT,
            performed_at TEXT NOT NULL,
            activity_day TEXT NOT NULL,
            created_at   TEXT NOT NULL,
            UNIQUE(user_id, program_id, activity_day)
        );

        CREATE TABLE IF NOT EXISTS achievements (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES users(id),
            program_id      INTEGER NOT NULL REFERENCES programs(id),
            cycle_reference TEXT NOT NULL,
            is_notified     INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            UNIQUE(user_id, program_id, cycle_reference)
        );

        CREATE INDEX IF NOT EXISTS idx_activities_program_day
            ON activities(program_id, activity_day);
        CREATE INDEX IF NOT EXISTS idx_activities_user_day
            ON activities(user_id, activity_day);
        CREATE INDEX IF NOT EXISTS idx_achievements_program_cycle
            ON achievements(program_id, cycle_reference);",
    )?;
    set_schema_version(conn, 1)
}
