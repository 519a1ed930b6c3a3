use super::{enum_col, SqliteStore, UserFilter};
use crate::{
    error::StaffResult,
    model::{ProficiencyLevel, TeamRole, User, UserProfile, UserRole, UserSkill},
};
use rusqlite::{params, OptionalExtension};

impl SqliteStore {
    // ── Writes ────────────────────────────────────────────────────

    pub fn insert_user(&self, user: &User) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO app_user (id, name, email, role) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.name, user.email, user.role.as_db_str()],
        )?;
        Ok(())
    }

    pub fn insert_team_role(&self, role: &TeamRole) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO team_role (id, name, billing_rate, cost_rate) VALUES (?1, ?2, ?3, ?4)",
            params![role.id, role.name, role.billing_rate, role.cost_rate],
        )?;
        Ok(())
    }

    /// Make `team_role_id` the user's current role, retiring any previous one.
    pub fn assign_team_role(&self, user_id: &str, team_role_id: &str) -> StaffResult<()> {
        self.conn.execute(
            "UPDATE user_team_role SET is_current = 0 WHERE user_id = ?1",
            params![user_id],
        )?;
        self.conn.execute(
            "INSERT INTO user_team_role (user_id, team_role_id, is_current)
             VALUES (?1, ?2, 1)
             ON CONFLICT(user_id, team_role_id) DO UPDATE SET is_current = 1",
            params![user_id, team_role_id],
        )?;
        Ok(())
    }

    pub fn insert_skill(&self, skill_id: &str, name: &str) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO skill (id, name) VALUES (?1, ?2)",
            params![skill_id, name],
        )?;
        Ok(())
    }

    pub fn insert_user_skill(
        &self,
        user_id: &str,
        skill_id: &str,
        proficiency: ProficiencyLevel,
        certified: bool,
    ) -> StaffResult<()> {
        self.conn.execute(
            "INSERT INTO user_skill (user_id, skill_id, proficiency, certified)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id, skill_id) DO UPDATE SET
                proficiency = excluded.proficiency,
                certified   = excluded.certified",
            params![
                user_id,
                skill_id,
                proficiency.as_db_str(),
                if certified { 1 } else { 0 }
            ],
        )?;
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────

    pub(super) fn load_users(&self, filter: &UserFilter) -> StaffResult<Vec<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, role FROM app_user ORDER BY rowid")?;
        let users = stmt
            .query_map([], |row| {
                Ok(User {
                    id:    row.get(0)?,
                    name:  row.get(1)?,
                    email: row.get(2)?,
                    role:  enum_col(row, 3, UserRole::from_db_str)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        users
            .into_iter()
            .filter(|u| filter.admits(&u.id))
            .map(|u| self.build_profile(u))
            .collect()
    }

    pub(super) fn load_user(&self, user_id: &str) -> StaffResult<Option<UserProfile>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email, role FROM app_user WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok(User {
                        id:    row.get(0)?,
                        name:  row.get(1)?,
                        email: row.get(2)?,
                        role:  enum_col(row, 3, UserRole::from_db_str)?,
                    })
                },
            )
            .optional()?;
        user.map(|u| self.build_profile(u)).transpose()
    }

    fn build_profile(&self, user: User) -> StaffResult<UserProfile> {
        let team_role = self
            .conn
            .query_row(
                "SELECT r.id, r.name, r.billing_rate, r.cost_rate
                 FROM user_team_role ur
                 JOIN team_role r ON r.id = ur.team_role_id
                 WHERE ur.user_id = ?1 AND ur.is_current = 1
                 LIMIT 1",
                params![user.id],
                |row| {
                    Ok(TeamRole {
                        id:           row.get(0)?,
                        name:         row.get(1)?,
                        billing_rate: row.get(2)?,
                        cost_rate:    row.get(3)?,
                    })
                },
            )
            .optional()?;

        let mut stmt = self.conn.prepare(
            "SELECT s.name, us.proficiency, us.certified
             FROM user_skill us
             JOIN skill s ON s.id = us.skill_id
             WHERE us.user_id = ?1
             ORDER BY s.name",
        )?;
        let skills = stmt
            .query_map(params![user.id], |row| {
                Ok(UserSkill {
                    skill_name:  row.get(0)?,
                    proficiency: enum_col(row, 1, ProficiencyLevel::from_db_str)?,
                    certified:   row.get::<_, i32>(2)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(UserProfile {
            user,
            team_role,
            skills,
        })
    }
}
