//! In-memory record store. Same contract as `SqliteStore`, no database.
//! Used by the component unit tests and by anything that already holds
//! its records in memory.

use super::{RecordStore, UserFilter};
use crate::{
    error::StaffResult,
    interval::{overlaps_window, DateWindow},
    model::{Activity, Assignment, ProjectRequirement, TimeEntry, TimeEntryStatus, UserProfile},
};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub users:        Vec<UserProfile>,
    pub activities:   Vec<Activity>,
    pub assignments:  Vec<Assignment>,
    pub time_entries: Vec<TimeEntry>,
    pub requirements: Vec<ProjectRequirement>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    pub fn with_time_entry(mut self, entry: TimeEntry) -> Self {
        self.time_entries.push(entry);
        self
    }

    pub fn with_requirement(mut self, requirement: ProjectRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }
}

impl RecordStore for MemoryStore {
    fn find_users(&self, filter: &UserFilter) -> StaffResult<Vec<UserProfile>> {
        Ok(self
            .users
            .iter()
            .filter(|u| filter.admits(u.id()))
            .cloned()
            .collect())
    }

    fn find_user_by_id(&self, user_id: &str) -> StaffResult<Option<UserProfile>> {
        Ok(self.users.iter().find(|u| u.id() == user_id).cloned())
    }

    fn find_assignments_overlapping(
        &self,
        user_id: &str,
        window: Option<&DateWindow>,
    ) -> StaffResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| window.map_or(true, |w| overlaps_window(a.start_date, a.end_date, w)))
            .cloned()
            .collect())
    }

    fn find_time_entries_in_window(
        &self,
        user_id: Option<&str>,
        window: Option<&DateWindow>,
        statuses: &[TimeEntryStatus],
    ) -> StaffResult<Vec<TimeEntry>> {
        Ok(self
            .time_entries
            .iter()
            .filter(|e| user_id.map_or(true, |id| e.user_id == id))
            .filter(|e| window.map_or(true, |w| w.contains(e.date)))
            .filter(|e| statuses.is_empty() || statuses.contains(&e.status))
            .cloned()
            .collect())
    }

    fn find_activity_by_id(&self, activity_id: &str) -> StaffResult<Option<Activity>> {
        Ok(self.activities.iter().find(|a| a.id == activity_id).cloned())
    }

    fn find_activities(&self) -> StaffResult<Vec<Activity>> {
        Ok(self.activities.clone())
    }

    fn find_project_requirements(
        &self,
        activity_id: &str,
    ) -> StaffResult<Vec<ProjectRequirement>> {
        Ok(self
            .requirements
            .iter()
            .filter(|r| r.activity_id == activity_id)
            .cloned()
            .collect())
    }
}
