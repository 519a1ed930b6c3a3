use super::{date_col, date_to_sql, enum_col, opt_date_col, opt_date_to_sql, SqliteStore};
use crate::{
    error::StaffResult,
    interval::DateWindow,
    model::{Assignment, AssignmentStatus, TimeEntry, TimeEntryStatus},
};
use rusqlite::{params, Row};

fn map_assignment(row: &Row) -> rusqlite::Result<Assignment> {
    Ok(Assignment {
        id:                    row.get(0)?,
        user_id:               row.get(1)?,
        activity_id:           row.get(2)?,
        allocated_hours:       row.get(3)?,
        start_date:            opt_date_col(row, 4)?,
        end_date:              opt_date_col(row, 5)?,
        status:                enum_col(row, 6, AssignmentStatus::from_db_str)?,
        billing_rate_override: row.get(7)?,
        cost_rate_override:    row.get(8)?,
    })
}

fn map_time_entry(row: &Row) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id:              row.get(0)?,
        user_id:         row.get(1)?,
        activity_id:     row.get(2)?,
        date:            date_col(row, 3)?,
        hours:           row.get(4)?,
        status:          enum_col(row, 5, TimeEntryStatus::from_db_str)?,
        billable_amount: row.get(6)?,
        cost_amount:     row.get(7)?,
    })
}

impl SqliteStore {
    // ── Assignments ───────────────────────────────────────────────

    pub fn insert_assignment(&self, a: &Assignment) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO assignment (
                id, user_id, activity_id, allocated_hours, start_date, end_date,
                status, billing_rate_override, cost_rate_override
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                a.id,
                a.user_id,
                a.activity_id,
                a.allocated_hours,
                opt_date_to_sql(a.start_date),
                opt_date_to_sql(a.end_date),
                a.status.as_db_str(),
                a.billing_rate_override,
                a.cost_rate_override,
            ],
        )?;
        Ok(())
    }

    pub(super) fn load_assignments(
        &self,
        user_id: &str,
        window: Option<&DateWindow>,
    ) -> StaffResult<Vec<Assignment>> {
        const COLUMNS: &str = "id, user_id, activity_id, allocated_hours, start_date, end_date,
                               status, billing_rate_override, cost_rate_override";
        let rows = match window {
            Some(w) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM assignment
                     WHERE user_id = ?1
                       AND (start_date IS NULL OR start_date <= ?3)
                       AND (end_date IS NULL OR end_date >= ?2)
                     ORDER BY rowid"
                ))?;
                let rows = stmt
                    .query_map(
                        params![user_id, date_to_sql(w.start), date_to_sql(w.end)],
                        map_assignment,
                    )?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM assignment WHERE user_id = ?1 ORDER BY rowid"
                ))?;
                let rows = stmt
                    .query_map(params![user_id], map_assignment)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(rows)
    }

    // ── Time entries ──────────────────────────────────────────────

    pub fn insert_time_entry(&self, e: &TimeEntry) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO time_entry (
                id, user_id, activity_id, entry_date, hours, status,
                billable_amount, cost_amount
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                e.id,
                e.user_id,
                e.activity_id,
                date_to_sql(e.date),
                e.hours,
                e.status.as_db_str(),
                e.billable_amount,
                e.cost_amount,
            ],
        )?;
        Ok(())
    }

    pub(super) fn load_time_entries(
        &self,
        user_id: Option<&str>,
        window: Option<&DateWindow>,
        statuses: &[TimeEntryStatus],
    ) -> StaffResult<Vec<TimeEntry>> {
        // NULL parameters disable the corresponding predicate.
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, activity_id, entry_date, hours, status,
                    billable_amount, cost_amount
             FROM time_entry
             WHERE (?1 IS NULL OR user_id = ?1)
               AND (?2 IS NULL OR entry_date >= ?2)
               AND (?3 IS NULL OR entry_date <= ?3)
             ORDER BY entry_date, rowid",
        )?;
        let entries = stmt
            .query_map(
                params![
                    user_id,
                    window.map(|w| date_to_sql(w.start)),
                    window.map(|w| date_to_sql(w.end)),
                ],
                map_time_entry,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries
            .into_iter()
            .filter(|e| statuses.is_empty() || statuses.contains(&e.status))
            .collect())
    }
}
