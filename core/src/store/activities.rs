use super::{date_col, date_to_sql, enum_col, opt_date_col, opt_date_to_sql, SqliteStore};
use crate::{
    error::StaffResult,
    model::{Activity, ActivityStatus, ActivityType, ProficiencyLevel, ProjectRequirement, Scope},
};
use rusqlite::{params, OptionalExtension, Row};

const ACTIVITY_COLUMNS: &str = "id, name, activity_type, status, start_date, end_date,
                                budget_hours, budget_cost, created_on";

fn map_activity(row: &Row) -> rusqlite::Result<Activity> {
    Ok(Activity {
        id:            row.get(0)?,
        name:          row.get(1)?,
        activity_type: enum_col(row, 2, ActivityType::from_db_str)?,
        status:        enum_col(row, 3, ActivityStatus::from_db_str)?,
        start_date:    opt_date_col(row, 4)?,
        end_date:      opt_date_col(row, 5)?,
        budget_hours:  row.get(6)?,
        budget_cost:   row.get(7)?,
        created_on:    date_col(row, 8)?,
        scopes:        Vec::new(),
    })
}

impl SqliteStore {
    // ── Writes ────────────────────────────────────────────────────

    /// Insert the activity row and every scope it carries.
    pub fn insert_activity(&self, a: &Activity) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO activity (
                id, name, activity_type, status, start_date, end_date,
                budget_hours, budget_cost, created_on
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                a.id,
                a.name,
                a.activity_type.as_db_str(),
                a.status.as_db_str(),
                opt_date_to_sql(a.start_date),
                opt_date_to_sql(a.end_date),
                a.budget_hours,
                a.budget_cost,
                date_to_sql(a.created_on),
            ],
        )?;
        for scope in &a.scopes {
            self.insert_scope(&a.id, scope)?;
        }
        Ok(())
    }

    pub fn insert_scope(&self, activity_id: &str, scope: &Scope) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO activity_scope (
                activity_id, team_role_id, allocated_hours,
                billing_rate_override, cost_rate_override
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                activity_id,
                scope.team_role_id,
                scope.allocated_hours,
                scope.billing_rate_override,
                scope.cost_rate_override,
            ],
        )?;
        Ok(())
    }

    pub fn insert_requirement(&self, req: &ProjectRequirement) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO project_requirement (id, activity_id, skill_name, required_level, priority)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                req.id,
                req.activity_id,
                req.skill_name,
                req.required_level.as_db_str(),
                req.priority,
            ],
        )?;
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────

    pub(super) fn load_activity(&self, activity_id: &str) -> StaffResult<Option<Activity>> {
        let activity = self
            .conn
            .query_row(
                &format!("SELECT {ACTIVITY_COLUMNS} FROM activity WHERE id = ?1"),
                params![activity_id],
                map_activity,
            )
            .optional()?;
        match activity {
            Some(mut a) => {
                a.scopes = self.load_scopes(&a.id)?;
                Ok(Some(a))
            }
            None => Ok(None),
        }
    }

    pub(super) fn load_activities(&self) -> StaffResult<Vec<Activity>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ACTIVITY_COLUMNS} FROM activity ORDER BY rowid"))?;
        let mut activities = stmt
            .query_map([], map_activity)?
            .collect::<Result<Vec<_>, _>>()?;
        for a in &mut activities {
            a.scopes = self.load_scopes(&a.id)?;
        }
        Ok(activities)
    }

    fn load_scopes(&self, activity_id: &str) -> StaffResult<Vec<Scope>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.team_role_id, r.name, s.allocated_hours,
                    s.billing_rate_override, s.cost_rate_override
             FROM activity_scope s
             JOIN team_role r ON r.id = s.team_role_id
             WHERE s.activity_id = ?1
             ORDER BY s.rowid",
        )?;
        let rows = stmt.query_map(params![activity_id], |row| {
            Ok(Scope {
                team_role_id:          row.get(0)?,
                team_role_name:        row.get(1)?,
                allocated_hours:       row.get(2)?,
                billing_rate_override: row.get(3)?,
                cost_rate_override:    row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub(super) fn load_requirements(
        &self,
        activity_id: &str,
    ) -> StaffResult<Vec<ProjectRequirement>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, activity_id, skill_name, required_level, priority
             FROM project_requirement
             WHERE activity_id = ?1
             ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![activity_id], |row| {
            Ok(ProjectRequirement {
                id:             row.get(0)?,
                activity_id:    row.get(1)?,
                skill_name:     row.get(2)?,
                required_level: enum_col(row, 3, ProficiencyLevel::from_db_str)?,
                priority:       row.get(4)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
