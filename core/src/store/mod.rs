//! Record store: the read-query contract the scoring components depend on,
//! plus its SQLite and in-memory implementations.
//!
//! RULE: Only the store talks to the database.
//! Components take a `&impl RecordStore` — they never execute SQL directly.

use crate::{
    error::StaffResult,
    interval::DateWindow,
    model::{Activity, Assignment, ProjectRequirement, TimeEntry, TimeEntryStatus, UserProfile},
    types::{EntityId, DATE_FORMAT},
};
use chrono::NaiveDate;
use rusqlite::{types::Type, Connection, Row};

mod activities;
mod memory;
mod time;
mod users;

pub use memory::MemoryStore;

/// Which users a query should return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub exclude_ids: Vec<EntityId>,
}

impl UserFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn excluding(ids: &[EntityId]) -> Self {
        Self {
            exclude_ids: ids.to_vec(),
        }
    }

    pub fn admits(&self, user_id: &str) -> bool {
        !self.exclude_ids.iter().any(|id| id == user_id)
    }
}

/// Read queries answered by the persistence layer.
///
/// Results come back in a stable fetch order (insertion order); the
/// rankers rely on that order to break score ties.
pub trait RecordStore {
    /// Users with their current team role and skills.
    fn find_users(&self, filter: &UserFilter) -> StaffResult<Vec<UserProfile>>;

    fn find_user_by_id(&self, user_id: &str) -> StaffResult<Option<UserProfile>>;

    /// Assignments of one user whose date range intersects `window`.
    /// `None` returns every assignment of the user. All statuses are returned.
    fn find_assignments_overlapping(
        &self,
        user_id: &str,
        window: Option<&DateWindow>,
    ) -> StaffResult<Vec<Assignment>>;

    /// Time entries dated inside `window` (inclusive), for one user or all.
    /// An empty `statuses` slice means any status.
    fn find_time_entries_in_window(
        &self,
        user_id: Option<&str>,
        window: Option<&DateWindow>,
        statuses: &[TimeEntryStatus],
    ) -> StaffResult<Vec<TimeEntry>>;

    /// Activity with its scopes.
    fn find_activity_by_id(&self, activity_id: &str) -> StaffResult<Option<Activity>>;

    fn find_activities(&self) -> StaffResult<Vec<Activity>>;

    fn find_project_requirements(&self, activity_id: &str)
        -> StaffResult<Vec<ProjectRequirement>>;

    fn find_all_users(&self) -> StaffResult<Vec<UserProfile>> {
        self.find_users(&UserFilter::all())
    }
}

// ── SQLite implementation ────────────────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> StaffResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StaffResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order. Idempotent.
    pub fn migrate(&self) -> StaffResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_activities.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_time.sql"))?;
        log::debug!("schema migrations applied");
        Ok(())
    }

    pub fn user_count(&self) -> StaffResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM app_user", [], |row| row.get(0))?)
    }
}

impl RecordStore for SqliteStore {
    fn find_users(&self, filter: &UserFilter) -> StaffResult<Vec<UserProfile>> {
        self.load_users(filter)
    }

    fn find_user_by_id(&self, user_id: &str) -> StaffResult<Option<UserProfile>> {
        self.load_user(user_id)
    }

    fn find_assignments_overlapping(
        &self,
        user_id: &str,
        window: Option<&DateWindow>,
    ) -> StaffResult<Vec<Assignment>> {
        self.load_assignments(user_id, window)
    }

    fn find_time_entries_in_window(
        &self,
        user_id: Option<&str>,
        window: Option<&DateWindow>,
        statuses: &[TimeEntryStatus],
    ) -> StaffResult<Vec<TimeEntry>> {
        self.load_time_entries(user_id, window, statuses)
    }

    fn find_activity_by_id(&self, activity_id: &str) -> StaffResult<Option<Activity>> {
        self.load_activity(activity_id)
    }

    fn find_activities(&self) -> StaffResult<Vec<Activity>> {
        self.load_activities()
    }

    fn find_project_requirements(
        &self,
        activity_id: &str,
    ) -> StaffResult<Vec<ProjectRequirement>> {
        self.load_requirements(activity_id)
    }
}

// ── Column helpers ───────────────────────────────────────────────────────────

fn conversion_error(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, msg)),
    )
}

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn opt_date_to_sql(date: Option<NaiveDate>) -> Option<String> {
    date.map(date_to_sql)
}

fn parse_date(raw: &str, idx: usize) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        log::warn!("store: column {idx} holds an invalid date '{raw}'");
        conversion_error(idx, format!("invalid date: {raw}"))
    })
}

fn date_col(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_date(&raw, idx)
}

fn opt_date_col(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| parse_date(&s, idx)).transpose()
}

/// Unknown values fail the whole query; the row is never half-read.
fn enum_col<T>(row: &Row, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        log::warn!("store: column {idx} holds an unknown enum value '{raw}'");
        conversion_error(idx, format!("unknown enum value: {raw}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;

    fn decode<T>(sql: &str, f: fn(&Row) -> rusqlite::Result<T>) -> rusqlite::Result<T> {
        let store = SqliteStore::in_memory().unwrap();
        store.conn.query_row(sql, [], f)
    }

    #[test]
    fn known_values_decode() {
        let role = decode("SELECT 'MANAGER'", |r| enum_col(r, 0, UserRole::from_db_str)).unwrap();
        assert_eq!(role, UserRole::Manager);
        let day = decode("SELECT NULL", |r| opt_date_col(r, 0)).unwrap();
        assert_eq!(day, None);
    }

    #[test]
    fn unknown_enum_is_a_conversion_error() {
        let err = decode("SELECT 'OWNER'", |r| enum_col(r, 0, UserRole::from_db_str)).unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)), "got {err:?}");
    }

    #[test]
    fn malformed_date_is_a_conversion_error() {
        let err = decode("SELECT '2024/05/01'", |r| date_col(r, 0)).unwrap_err();
        assert!(matches!(err, rusqlite::Error::FromSqlConversionFailure(0, _, _)), "got {err:?}");
    }
}
