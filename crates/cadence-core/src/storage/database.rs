//! SQLite persistence for users, programs, activities, and achievements.
//!
//! Timestamps are stored as text: RFC 3339 when zoned, plain local
//! datetimes when naive, so a record round-trips with its original
//! awareness. `activity_day` is derived from `performed_at` at write time
//! and carries the per-day uniqueness constraint.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{data_dir, migrations};
use crate::error::DatabaseError;
use crate::model::{Activity, EventTime, NewActivity, NewProgram, PendingAward, Program, User};
use crate::storage::store::{ActivityStore, AwardStore, Directory};

const ACTIVITY_COLUMNS: &str =
    "id, user_id, program_id, description, evidence_url, performed_at, created_at";

// SQLite's default host-parameter limit is 999; IN-list queries are chunked
// to stay under it.
const MAX_SQL_PARAMS: usize = 500;
const PROGRAM_COLUMNS: &str = "id, name, slack_channel, start_date, end_date, created_at";

// === Row helpers ===

fn parse_event_time(idx: usize, text: &str) -> rusqlite::Result<EventTime> {
    EventTime::parse(text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_utc(idx: usize, text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_activity(row: &Row) -> rusqlite::Result<Activity> {
    let performed_at: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    Ok(Activity {
        id: row.get(0)?,
        user_id: row.get(1)?,
        program_id: row.get(2)?,
        description: row.get(3)?,
        evidence_url: row.get(4)?,
        performed_at: parse_event_time(5, &performed_at)?,
        created_at: parse_utc(6, &created_at)?,
    })
}

fn row_to_program(row: &Row) -> rusqlite::Result<Program> {
    let start_date: String = row.get(3)?;
    let end_date: Option<String> = row.get(4)?;
    let created_at: String = row.get(5)?;
    Ok(Program {
        id: row.get(0)?,
        name: row.get(1)?,
        slack_channel: row.get(2)?,
        start_date: parse_event_time(3, &start_date)?,
        end_date: end_date.as_deref().map(|t| parse_event_time(4, t)).transpose()?,
        created_at: parse_utc(5, &created_at)?,
    })
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let created_at: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        slack_id: row.get(1)?,
        display_name: row.get(2)?,
        created_at: parse_utc(3, &created_at)?,
    })
}

/// "YYYY-MM" prefix used to match `activity_day` by calendar month.
fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// SQLite database implementing the store and directory traits.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/cadence/cadence.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()
            .map_err(|e| DatabaseError::QueryFailed(format!("data dir unavailable: {e}")))?
            .join("cadence.db");
        Self::open_at(path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }
}

impl ActivityStore for Database {
    fn insert_activity(&self, activity: &NewActivity) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO activities
                 (user_id, program_id, description, evidence_url, performed_at, activity_day, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                activity.user_id,
                activity.program_id,
                activity.description,
                activity.evidence_url,
                activity.performed_at.to_storage(),
                activity.performed_at.day().to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn find_by_id_for_user(
        &self,
        id: i64,
        slack_id: &str,
    ) -> Result<Option<Activity>, DatabaseError> {
        let activity = self
            .conn
            .query_row(
                &format!(
                    "SELECT a.{cols} FROM activities a
                     JOIN users u ON u.id = a.user_id
                     WHERE a.id = ?1 AND u.slack_id = ?2",
                    cols = ACTIVITY_COLUMNS.replace(", ", ", a.")
                ),
                params![id, slack_id],
                row_to_activity,
            )
            .optional()?;
        Ok(activity)
    }

    fn find_same_day(
        &self,
        program_id: i64,
        user_id: i64,
        day: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Option<Activity>, DatabaseError> {
        let activity = self
            .conn
            .query_row(
                &format!(
                    "SELECT {ACTIVITY_COLUMNS} FROM activities
                     WHERE program_id = ?1 AND user_id = ?2 AND activity_day = ?3
                       AND id != ?4"
                ),
                // -1 never matches a rowid, so "no exclusion" reuses the query
                params![program_id, user_id, day.to_string(), exclude_id.unwrap_or(-1)],
                row_to_activity,
            )
            .optional()?;
        Ok(activity)
    }

    fn count_for_user_in_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<i64, DatabaseError> {
        let count = self.conn.query_row(
            "SELECT COUNT(id) FROM activities
             WHERE user_id = ?1 AND substr(activity_day, 1, 7) = ?2",
            params![user_id, month_key(year, month)],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count)
    }

    fn find_for_user_in_month(
        &self,
        user_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Vec<Activity>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities
             WHERE user_id = ?1 AND substr(activity_day, 1, 7) = ?2
             ORDER BY activity_day"
        ))?;
        let rows = stmt.query_map(params![user_id, month_key(year, month)], row_to_activity)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn find_for_user_in_channel_month(
        &self,
        user_id: i64,
        slack_channel: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<Activity>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT a.{cols} FROM activities a
             JOIN programs p ON p.id = a.program_id
             WHERE a.user_id = ?1 AND p.slack_channel = ?2
               AND substr(a.activity_day, 1, 7) = ?3
             ORDER BY a.activity_day",
            cols = ACTIVITY_COLUMNS.replace(", ", ", a.")
        ))?;
        let rows = stmt.query_map(
            params![user_id, slack_channel, month_key(year, month)],
            row_to_activity,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn users_completed_in_month(
        &self,
        program_id: i64,
        year: i32,
        month: u32,
        goal: i64,
    ) -> Result<Vec<i64>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id FROM activities
             WHERE program_id = ?1 AND substr(activity_day, 1, 7) = ?2
             GROUP BY user_id
             HAVING COUNT(id) >= ?3
             ORDER BY user_id",
        )?;
        let rows = stmt.query_map(params![program_id, month_key(year, month), goal], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn update_activity(&self, activity: &Activity) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE activities
             SET description = ?1, evidence_url = ?2, performed_at = ?3, activity_day = ?4
             WHERE id = ?5",
            params![
                activity.description,
                activity.evidence_url,
                activity.performed_at.to_storage(),
                activity.performed_at.day().to_string(),
                activity.id,
            ],
        )?;
        Ok(())
    }

    fn delete_activity(&self, id: i64) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM activities WHERE id = ?1", params![id])?;
        Ok(())
    }
}

impl AwardStore for Database {
    fn existing_award_user_ids(
        &self,
        program_id: i64,
        cycle_reference: &str,
        user_ids: &[i64],
    ) -> Result<HashSet<i64>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id FROM achievements
             WHERE program_id = ?1 AND cycle_reference = ?2",
        )?;
        let rows = stmt.query_map(params![program_id, cycle_reference], |row| {
            row.get::<_, i64>(0)
        })?;
        let awarded = rows.collect::<rusqlite::Result<HashSet<_>>>()?;
        Ok(user_ids
            .iter()
            .copied()
            .filter(|id| awarded.contains(id))
            .collect())
    }

    fn insert_awards(
        &self,
        program_id: i64,
        cycle_reference: &str,
        user_ids: &[i64],
    ) -> Result<Vec<i64>, DatabaseError> {
        // One transaction around the whole batch: either every new award
        // commits or none does. OR IGNORE turns a uniqueness violation into
        // "already awarded" instead of aborting the batch.
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = Vec::new();
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO achievements
                     (user_id, program_id, cycle_reference, is_notified, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
            )?;
            let created_at = Utc::now().to_rfc3339();
            for &user_id in user_ids {
                let changed =
                    stmt.execute(params![user_id, program_id, cycle_reference, created_at])?;
                if changed == 1 {
                    inserted.push(user_id);
                }
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn pending_awards(
        &self,
        program_id: i64,
        cycle_reference: &str,
    ) -> Result<Vec<PendingAward>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.id, u.slack_id, u.display_name
             FROM achievements a
             JOIN users u ON u.id = a.user_id
             WHERE a.program_id = ?1 AND a.cycle_reference = ?2 AND a.is_notified = 0
             ORDER BY a.id",
        )?;
        let rows = stmt.query_map(params![program_id, cycle_reference], |row| {
            Ok(PendingAward {
                achievement_id: row.get(0)?,
                slack_id: row.get(1)?,
                display_name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn mark_notified(&self, achievement_ids: &[i64]) -> Result<(), DatabaseError> {
        for chunk in achievement_ids.chunks(MAX_SQL_PARAMS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            self.conn.execute(
                &format!("UPDATE achievements SET is_notified = 1 WHERE id IN ({placeholders})"),
                params_from_iter(chunk.iter()),
            )?;
        }
        Ok(())
    }
}

impl Directory for Database {
    fn find_program_by_id(&self, id: i64) -> Result<Option<Program>, DatabaseError> {
        let program = self
            .conn
            .query_row(
                &format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = ?1"),
                params![id],
                row_to_program,
            )
            .optional()?;
        Ok(program)
    }

    fn find_program_by_name(&self, name: &str) -> Result<Option<Program>, DatabaseError> {
        let program = self
            .conn
            .query_row(
                &format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE name = ?1 ORDER BY id"),
                params![name],
                row_to_program,
            )
            .optional()?;
        Ok(program)
    }

    fn find_program_by_name_and_channel(
        &self,
        name: &str,
        slack_channel: &str,
    ) -> Result<Option<Program>, DatabaseError> {
        let program = self
            .conn
            .query_row(
                &format!(
                    "SELECT {PROGRAM_COLUMNS} FROM programs
                     WHERE name = ?1 AND slack_channel = ?2"
                ),
                params![name, slack_channel],
                row_to_program,
            )
            .optional()?;
        Ok(program)
    }

    fn find_programs_by_channel(
        &self,
        slack_channel: &str,
    ) -> Result<Vec<Program>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROGRAM_COLUMNS} FROM programs WHERE slack_channel = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![slack_channel], row_to_program)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn all_programs(&self) -> Result<Vec<Program>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PROGRAM_COLUMNS} FROM programs ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_program)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_program(&self, program: &NewProgram) -> Result<Program, DatabaseError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO programs (name, slack_channel, start_date, end_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                program.name,
                program.slack_channel,
                program.start_date.to_storage(),
                program.end_date.as_ref().map(EventTime::to_storage),
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(Program {
            id: self.conn.last_insert_rowid(),
            name: program.name.clone(),
            slack_channel: program.slack_channel.clone(),
            start_date: program.start_date.clone(),
            end_date: program.end_date.clone(),
            created_at,
        })
    }

    fn update_program(&self, program: &Program) -> Result<(), DatabaseError> {
        self.conn.execute(
            "UPDATE programs
             SET name = ?1, slack_channel = ?2, start_date = ?3, end_date = ?4
             WHERE id = ?5",
            params![
                program.name,
                program.slack_channel,
                program.start_date.to_storage(),
                program.end_date.as_ref().map(EventTime::to_storage),
                program.id,
            ],
        )?;
        Ok(())
    }

    fn find_user_by_slack_id(&self, slack_id: &str) -> Result<Option<User>, DatabaseError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, slack_id, display_name, created_at FROM users WHERE slack_id = ?1",
                params![slack_id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn create_user(&self, slack_id: &str, display_name: &str) -> Result<User, DatabaseError> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO users (slack_id, display_name, created_at) VALUES (?1, ?2, ?3)",
            params![slack_id, display_name, created_at.to_rfc3339()],
        )?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            slack_id: slack_id.to_string(),
            display_name: display_name.to_string(),
            created_at,
        })
    }

    fn all_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, slack_id, display_name, created_at FROM users ORDER BY id")?;
        let rows = stmt.query_map([], row_to_user)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn display_names(&self, user_ids: &[i64]) -> Result<Vec<String>, DatabaseError> {
        // Chunks are queried in ascending id order so concatenation keeps
        // the overall id ordering.
        let mut ids = user_ids.to_vec();
        ids.sort_unstable();

        let mut names = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(MAX_SQL_PARAMS) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = self.conn.prepare(&format!(
                "SELECT display_name FROM users WHERE id IN ({placeholders}) ORDER BY id"
            ))?;
            let rows =
                stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?;
            for name in rows {
                names.push(name?);
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventTime;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn seed_program(db: &Database, name: &str, channel: &str) -> Program {
        db.insert_program(&NewProgram {
            name: name.into(),
            slack_channel: channel.into(),
            start_date: EventTime::parse("2025-01-01T00:00:00").unwrap(),
            end_date: None,
        })
        .unwrap()
    }

    fn seed_activity(db: &Database, user_id: i64, program_id: i64, day: &str) -> i64 {
        db.insert_activity(&NewActivity {
            user_id,
            program_id,
            description: "ride".into(),
            evidence_url: None,
            performed_at: EventTime::parse(&format!("{day}T10:00:00")).unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn same_day_lookup_respects_exclusion() {
        let db = test_db();
        let user = db.create_user("U1", "Ana").unwrap();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");
        let id = seed_activity(&db, user.id, program.id, "2025-01-10");

        let day = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(db.find_same_day(program.id, user.id, day, None).unwrap().is_some());
        assert!(db
            .find_same_day(program.id, user.id, day, Some(id))
            .unwrap()
            .is_none());
    }

    #[test]
    fn duplicate_day_insert_hits_unique_constraint() {
        let db = test_db();
        let user = db.create_user("U1", "Ana").unwrap();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");
        seed_activity(&db, user.id, program.id, "2025-01-10");

        let err = db
            .insert_activity(&NewActivity {
                user_id: user.id,
                program_id: program.id,
                description: "again".into(),
                evidence_url: None,
                performed_at: EventTime::parse("2025-01-10T22:00:00").unwrap(),
            })
            .unwrap_err();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }

    #[test]
    fn monthly_completion_aggregates_per_user() {
        let db = test_db();
        let done = db.create_user("U1", "Ana").unwrap();
        let short = db.create_user("U2", "Bruno").unwrap();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");

        for day in 1..=12 {
            seed_activity(&db, done.id, program.id, &format!("2025-01-{day:02}"));
        }
        for day in 1..=11 {
            seed_activity(&db, short.id, program.id, &format!("2025-01-{day:02}"));
        }

        let completed = db.users_completed_in_month(program.id, 2025, 1, 12).unwrap();
        assert_eq!(completed, vec![done.id]);
    }

    #[test]
    fn completion_is_scoped_to_the_program() {
        let db = test_db();
        let user = db.create_user("U1", "Ana").unwrap();
        let cycling = seed_program(&db, "Cycle Challenge", "#cycling");
        let running = seed_program(&db, "Run Challenge", "#running");

        for day in 1..=6 {
            seed_activity(&db, user.id, cycling.id, &format!("2025-01-{day:02}"));
        }
        for day in 7..=12 {
            seed_activity(&db, user.id, running.id, &format!("2025-01-{day:02}"));
        }

        // 12 across programs, but never 12 within one
        assert_eq!(db.count_for_user_in_month(user.id, 2025, 1).unwrap(), 12);
        assert!(db.users_completed_in_month(cycling.id, 2025, 1, 12).unwrap().is_empty());
        assert!(db.users_completed_in_month(running.id, 2025, 1, 12).unwrap().is_empty());
    }

    #[test]
    fn insert_awards_ignores_existing_rows() {
        let db = test_db();
        let a = db.create_user("U1", "Ana").unwrap();
        let b = db.create_user("U2", "Bruno").unwrap();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");

        let first = db.insert_awards(program.id, "2025-01", &[a.id, b.id]).unwrap();
        assert_eq!(first, vec![a.id, b.id]);

        // Second pass races into the uniqueness backstop and inserts nothing
        let second = db.insert_awards(program.id, "2025-01", &[a.id, b.id]).unwrap();
        assert!(second.is_empty());

        let existing = db
            .existing_award_user_ids(program.id, "2025-01", &[a.id, b.id])
            .unwrap();
        assert_eq!(existing.len(), 2);
    }

    #[test]
    fn mark_notified_clears_pending() {
        let db = test_db();
        let user = db.create_user("U1", "Ana").unwrap();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");
        db.insert_awards(program.id, "2025-01", &[user.id]).unwrap();

        let pending = db.pending_awards(program.id, "2025-01").unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].slack_id, "U1");

        let ids: Vec<i64> = pending.iter().map(|p| p.achievement_id).collect();
        db.mark_notified(&ids).unwrap();
        assert!(db.pending_awards(program.id, "2025-01").unwrap().is_empty());
    }

    #[test]
    fn failed_batch_insert_commits_nothing() {
        let db = test_db();
        // Foreign keys are not exempt from OR IGNORE, so a dangling user id
        // aborts the batch mid-way once enforcement is on.
        db.conn().execute_batch("PRAGMA foreign_keys = ON").unwrap();
        let user = db.create_user("U1", "Ana").unwrap();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");

        let err = db
            .insert_awards(program.id, "2025-01", &[user.id, 9999])
            .unwrap_err();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));

        // The valid row preceding the failure rolled back with the batch
        assert!(db.pending_awards(program.id, "2025-01").unwrap().is_empty());
        assert!(db
            .existing_award_user_ids(program.id, "2025-01", &[user.id])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn id_lists_larger_than_one_chunk_are_handled() {
        let db = test_db();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");

        let count = MAX_SQL_PARAMS + 1;
        let mut user_ids = Vec::with_capacity(count);
        for n in 0..count {
            let user = db.create_user(&format!("U{n:04}"), &format!("Member {n:04}")).unwrap();
            user_ids.push(user.id);
        }

        db.insert_awards(program.id, "2025-01", &user_ids).unwrap();
        let pending = db.pending_awards(program.id, "2025-01").unwrap();
        assert_eq!(pending.len(), count);

        let names = db.display_names(&user_ids).unwrap();
        assert_eq!(names.len(), count);
        assert_eq!(names.first().map(String::as_str), Some("Member 0000"));
        assert_eq!(names.last().map(String::as_str), Some(format!("Member {:04}", count - 1).as_str()));

        let ids: Vec<i64> = pending.iter().map(|p| p.achievement_id).collect();
        db.mark_notified(&ids).unwrap();
        assert!(db.pending_awards(program.id, "2025-01").unwrap().is_empty());
    }

    #[test]
    fn reopening_a_database_file_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cadence.db");

        {
            let db = Database::open_at(&path).unwrap();
            let user = db.create_user("U1", "Ana").unwrap();
            let program = seed_program(&db, "Cycle Challenge", "#cycling");
            seed_activity(&db, user.id, program.id, "2025-01-10");
        }

        let db = Database::open_at(&path).unwrap();
        let user = db.find_user_by_slack_id("U1").unwrap().unwrap();
        assert_eq!(db.count_for_user_in_month(user.id, 2025, 1).unwrap(), 1);
    }

    #[test]
    fn activity_round_trips_awareness() {
        let db = test_db();
        let user = db.create_user("U1", "Ana").unwrap();
        let program = seed_program(&db, "Cycle Challenge", "#cycling");
        let id = db
            .insert_activity(&NewActivity {
                user_id: user.id,
                program_id: program.id,
                description: "ride".into(),
                evidence_url: Some("https://example.com/ride".into()),
                performed_at: EventTime::parse("2025-01-10T08:00:00-03:00").unwrap(),
            })
            .unwrap();

        let activity = db.find_by_id_for_user(id, "U1").unwrap().unwrap();
        assert_eq!(
            activity.performed_at,
            EventTime::parse("2025-01-10T08:00:00-03:00").unwrap()
        );
        assert_eq!(activity.evidence_url.as_deref(), Some("https://example.com/ride"));
        assert!(db.find_by_id_for_user(id, "U2").unwrap().is_none());
    }
}
