//! Utilization calculator — allocated vs. logged hours against a standard
//! weekly capacity.
//!
//! For a window `[start, end]`:
//!   1. allocated = Σ clipped_weeks(assignment) × weekly hours
//!   2. actual    = Σ logged hours dated inside the window
//!   3. capacity  = ceil(days / 7) × standard hours per week
//!   4. percent   = actual / capacity × 100 (0 when capacity is 0)
//!
//! No clamp is applied to the stored percentage. Display code picks
//! `raw_utilization()` or `clamped_utilization()` explicitly.

use crate::{
    config::EngineConfig,
    error::{StaffError, StaffResult},
    interval::{add_days, clipped_weeks, overlaps_window, week_start, DateWindow},
    model::{ActivityStatus, ActivityType, UserProfile},
    store::RecordStore,
    types::{EntityId, Hours},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UtilizationResult {
    pub user_id:             EntityId,
    pub user_name:           String,
    pub period:              String,
    pub allocated_hours:     Hours,
    pub actual_hours:        Hours,
    pub utilization_percent: f64,
    pub capacity_hours:      Hours,
}

impl UtilizationResult {
    /// Unbounded percentage; over-logged users exceed 100.
    pub fn raw_utilization(&self) -> f64 {
        self.utilization_percent
    }

    /// Percentage limited to `[0, 100]` for dashboards and KPI tiles.
    pub fn clamped_utilization(&self) -> f64 {
        self.utilization_percent.clamp(0.0, 100.0)
    }
}

/// Planned load for one ISO week (keyed by its Monday).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyCapacity {
    pub user_id:             EntityId,
    pub user_name:           String,
    pub week:                NaiveDate,
    pub allocated_hours:     Hours,
    pub available_hours:     Hours,
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActivitySummary {
    pub total_projects:     usize,
    pub active_projects:    usize,
    pub total_tasks:        usize,
    pub total_time_entries: usize,
    pub total_hours:        Hours,
    pub unique_users:       usize,
}

// ── Calculator ───────────────────────────────────────────────────────────────

pub struct UtilizationCalculator<'a, S: RecordStore + ?Sized> {
    store:  &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: RecordStore + ?Sized> UtilizationCalculator<'a, S> {
    pub fn new(store: &'a S, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    fn standard_week(&self, standard_hours_per_week: Option<f64>) -> StaffResult<f64> {
        let hours = standard_hours_per_week.unwrap_or(self.config.standard_hours_per_week);
        if !(hours > 0.0) {
            return Err(StaffError::invalid(format!(
                "standard hours per week must be positive, got {hours}"
            )));
        }
        Ok(hours)
    }

    pub fn calculate_user_utilization(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        standard_hours_per_week: Option<f64>,
    ) -> StaffResult<UtilizationResult> {
        let window = DateWindow::new(start, end)?;
        let standard = self.standard_week(standard_hours_per_week)?;
        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or_else(|| StaffError::not_found("user", user_id))?;
        self.utilization_for(&user, &window, standard)
    }

    /// One result per known user, in store order.
    pub fn calculate_team_utilization(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        standard_hours_per_week: Option<f64>,
    ) -> StaffResult<Vec<UtilizationResult>> {
        let window = DateWindow::new(start, end)?;
        let standard = self.standard_week(standard_hours_per_week)?;
        let users = self.store.find_all_users()?;

        let results = users
            .iter()
            .map(|u| self.utilization_for(u, &window, standard))
            .collect::<StaffResult<Vec<_>>>()?;

        log::info!(
            "team utilization {}: {} users, standard week {standard}h",
            window.label(),
            results.len()
        );
        Ok(results)
    }

    fn utilization_for(
        &self,
        user: &UserProfile,
        window: &DateWindow,
        standard: f64,
    ) -> StaffResult<UtilizationResult> {
        let assignments = self
            .store
            .find_assignments_overlapping(user.id(), Some(window))?;

        let allocated_hours: Hours = assignments
            .iter()
            .filter(|a| self.config.counts_assignment(a.status))
            .map(|a| clipped_weeks(a.start_date, a.end_date, window) as f64 * a.allocated_hours)
            .sum();

        let actual_hours: Hours = self
            .store
            .find_time_entries_in_window(
                Some(user.id()),
                Some(window),
                &self.config.utilization_entry_statuses,
            )?
            .iter()
            .map(|e| e.hours)
            .sum();

        let capacity_hours = window.weeks() as f64 * standard;
        let utilization_percent = if capacity_hours > 0.0 {
            actual_hours / capacity_hours * 100.0
        } else {
            0.0
        };

        log::debug!(
            "utilization user={} allocated={allocated_hours:.1} actual={actual_hours:.1} capacity={capacity_hours:.1}",
            user.id()
        );

        Ok(UtilizationResult {
            user_id: user.user.id.clone(),
            user_name: user.user.name.clone(),
            period: window.label(),
            allocated_hours,
            actual_hours,
            utilization_percent,
            capacity_hours,
        })
    }

    /// Planned hours bucketed by ISO week. Every week touched by the window
    /// gets a bucket; an assignment adds its weekly hours once to each
    /// bucket it is active in.
    pub fn user_capacity(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        standard_hours_per_week: Option<f64>,
    ) -> StaffResult<Vec<WeeklyCapacity>> {
        let window = DateWindow::new(start, end)?;
        let standard = self.standard_week(standard_hours_per_week)?;
        let user = self
            .store
            .find_user_by_id(user_id)?
            .ok_or_else(|| StaffError::not_found("user", user_id))?;
        let assignments: Vec<_> = self
            .store
            .find_assignments_overlapping(user_id, Some(&window))?
            .into_iter()
            .filter(|a| self.config.counts_assignment(a.status))
            .collect();

        let mut buckets = Vec::new();
        let mut monday = week_start(window.start);
        while monday <= window.end {
            // The part of this week that lies inside the query window.
            let week = DateWindow {
                start: monday.max(window.start),
                end:   add_days(monday, 6).min(window.end),
            };
            let allocated_hours: Hours = assignments
                .iter()
                .filter(|a| overlaps_window(a.start_date, a.end_date, &week))
                .map(|a| a.allocated_hours)
                .sum();

            buckets.push(WeeklyCapacity {
                user_id:             user.user.id.clone(),
                user_name:           user.user.name.clone(),
                week:                monday,
                allocated_hours,
                available_hours:     standard,
                utilization_percent: allocated_hours / standard * 100.0,
            });
            monday = add_days(monday, 7);
        }
        Ok(buckets)
    }

    /// Portfolio-wide counters for the window.
    pub fn activity_summary(&self, start: NaiveDate, end: NaiveDate) -> StaffResult<ActivitySummary> {
        let window = DateWindow::new(start, end)?;
        let activities = self.store.find_activities()?;
        let entries = self
            .store
            .find_time_entries_in_window(None, Some(&window), &[])?;

        let created_by_end = |created: NaiveDate| created <= window.end;

        let total_projects = activities
            .iter()
            .filter(|a| a.activity_type == ActivityType::Project && created_by_end(a.created_on))
            .count();

        // An activity without a start date has not been scheduled yet.
        let active_projects = activities
            .iter()
            .filter(|a| {
                a.activity_type == ActivityType::Project
                    && a.status == ActivityStatus::Active
                    && a.start_date.is_some()
                    && overlaps_window(a.start_date, a.end_date, &window)
            })
            .count();

        let total_tasks = activities
            .iter()
            .filter(|a| {
                matches!(a.activity_type, ActivityType::Project | ActivityType::Internal)
                    && created_by_end(a.created_on)
            })
            .count();

        let unique_users: HashSet<&str> = entries.iter().map(|e| e.user_id.as_str()).collect();

        Ok(ActivitySummary {
            total_projects,
            active_projects,
            total_tasks,
            total_time_entries: entries.len(),
            total_hours: entries.iter().map(|e| e.hours).sum(),
            unique_users: unique_users.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::model::{AssignmentStatus, TimeEntryStatus};
    use crate::store::MemoryStore;

    fn calc_for(store: &MemoryStore) -> StaffResult<UtilizationResult> {
        let cfg = EngineConfig::default();
        UtilizationCalculator::new(store, &cfg).calculate_user_utilization(
            "u1",
            d("2024-01-01"),
            d("2024-01-29"),
            None,
        )
    }

    #[test]
    fn idle_user_over_four_weeks_is_zeroed() {
        let store = MemoryStore::new().with_user(user("u1"));
        let r = calc_for(&store).unwrap();
        assert_eq!(r.allocated_hours, 0.0);
        assert_eq!(r.actual_hours, 0.0);
        assert_eq!(r.utilization_percent, 0.0);
        assert_eq!(r.capacity_hours, 160.0);
        assert_eq!(r.period, "2024-01-01 to 2024-01-29");
    }

    #[test]
    fn open_ended_assignment_runs_to_window_end() {
        let store = MemoryStore::new()
            .with_user(user("u1"))
            .with_assignment(assignment("a1", "u1", 10.0, Some("2023-12-01"), None));
        let r = calc_for(&store).unwrap();
        // Clipped to the full 28-day window: 4 weeks × 10h.
        assert_eq!(r.allocated_hours, 40.0);
    }

    #[test]
    fn assignment_is_clipped_to_window() {
        let store = MemoryStore::new()
            .with_user(user("u1"))
            .with_assignment(assignment("a1", "u1", 20.0, Some("2024-01-15"), Some("2024-03-01")));
        let r = calc_for(&store).unwrap();
        // 2024-01-15 .. 2024-01-29 = 14 days = 2 weeks.
        assert_eq!(r.allocated_hours, 40.0);
    }

    #[test]
    fn cancelled_assignment_counts_unless_excluded() {
        let mut a = assignment("a1", "u1", 20.0, Some("2024-01-01"), None);
        a.status = AssignmentStatus::Cancelled;
        let store = MemoryStore::new().with_user(user("u1")).with_assignment(a);
        assert_eq!(calc_for(&store).unwrap().allocated_hours, 80.0);

        let cfg = EngineConfig {
            counted_assignment_statuses: vec![
                AssignmentStatus::Pending,
                AssignmentStatus::Confirmed,
                AssignmentStatus::Completed,
            ],
            ..EngineConfig::default()
        };
        let r = UtilizationCalculator::new(&store, &cfg)
            .calculate_user_utilization("u1", d("2024-01-01"), d("2024-01-29"), None)
            .unwrap();
        assert_eq!(r.allocated_hours, 0.0);
    }

    #[test]
    fn logged_hours_drive_percentage_without_clamp() {
        let mut store = MemoryStore::new().with_user(user("u1"));
        for (i, day) in ["2024-01-02", "2024-01-03", "2024-01-29", "2024-01-30"].iter().enumerate() {
            store = store.with_time_entry(entry(&format!("e{i}"), "u1", day, 60.0));
        }
        let r = calc_for(&store).unwrap();
        // 2024-01-30 falls outside the window.
        assert_eq!(r.actual_hours, 180.0);
        assert!((r.raw_utilization() - 112.5).abs() < 1e-9);
        assert_eq!(r.clamped_utilization(), 100.0);
    }

    #[test]
    fn entry_status_filter_comes_from_config() {
        let mut rejected = entry("e2", "u1", "2024-01-05", 8.0);
        rejected.status = TimeEntryStatus::Rejected;
        let store = MemoryStore::new()
            .with_user(user("u1"))
            .with_time_entry(entry("e1", "u1", "2024-01-04", 8.0))
            .with_time_entry(rejected);

        assert_eq!(calc_for(&store).unwrap().actual_hours, 16.0);

        let cfg = EngineConfig {
            utilization_entry_statuses: vec![TimeEntryStatus::Approved],
            ..EngineConfig::default()
        };
        let r = UtilizationCalculator::new(&store, &cfg)
            .calculate_user_utilization("u1", d("2024-01-01"), d("2024-01-29"), None)
            .unwrap();
        assert_eq!(r.actual_hours, 8.0);
    }

    #[test]
    fn unknown_user_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(calc_for(&store), Err(StaffError::NotFound { .. })));
    }

    #[test]
    fn reversed_window_is_invalid() {
        let store = MemoryStore::new().with_user(user("u1"));
        let cfg = EngineConfig::default();
        let err = UtilizationCalculator::new(&store, &cfg)
            .calculate_user_utilization("u1", d("2024-02-01"), d("2024-01-01"), None)
            .unwrap_err();
        assert!(matches!(err, StaffError::InvalidInput(_)));
    }

    #[test]
    fn same_day_window_has_zero_capacity() {
        let store = MemoryStore::new()
            .with_user(user("u1"))
            .with_time_entry(entry("e1", "u1", "2024-01-01", 8.0));
        let cfg = EngineConfig::default();
        let r = UtilizationCalculator::new(&store, &cfg)
            .calculate_user_utilization("u1", d("2024-01-01"), d("2024-01-01"), None)
            .unwrap();
        assert_eq!(r.capacity_hours, 0.0);
        assert_eq!(r.utilization_percent, 0.0);
        assert_eq!(r.actual_hours, 8.0);
    }

    #[test]
    fn team_utilization_covers_every_user() {
        let store = MemoryStore::new()
            .with_user(user("u1"))
            .with_user(user("u2"))
            .with_time_entry(entry("e1", "u2", "2024-01-10", 16.0));
        let cfg = EngineConfig::default();
        let results = UtilizationCalculator::new(&store, &cfg)
            .calculate_team_utilization(d("2024-01-01"), d("2024-01-29"), Some(32.0))
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].user_id, "u1");
        assert_eq!(results[1].capacity_hours, 128.0);
        assert!((results[1].utilization_percent - 12.5).abs() < 1e-9);
    }

    #[test]
    fn weekly_buckets_start_on_monday() {
        let store = MemoryStore::new()
            .with_user(user("u1"))
            .with_assignment(assignment("a1", "u1", 20.0, Some("2024-05-06"), Some("2024-05-10")))
            .with_assignment(assignment("a2", "u1", 10.0, Some("2024-04-01"), None));
        let cfg = EngineConfig::default();
        // 2024-05-01 is a Wednesday; the window touches three ISO weeks.
        let weeks = UtilizationCalculator::new(&store, &cfg)
            .user_capacity("u1", d("2024-05-01"), d("2024-05-14"), None)
            .unwrap();
        assert_eq!(weeks.len(), 3);
        assert_eq!(weeks[0].week, d("2024-04-29"));
        assert_eq!(weeks[0].allocated_hours, 10.0);
        assert_eq!(weeks[1].allocated_hours, 30.0);
        assert_eq!(weeks[2].allocated_hours, 10.0);
        assert_eq!(weeks[1].utilization_percent, 75.0);
    }

    #[test]
    fn summary_counts_projects_and_hours() {
        let mut internal = project("i1");
        internal.activity_type = ActivityType::Internal;
        let mut scheduled = project("p2");
        scheduled.start_date = Some(d("2024-01-10"));
        let store = MemoryStore::new()
            .with_activity(project("p1"))
            .with_activity(scheduled)
            .with_activity(internal)
            .with_time_entry(entry("e1", "u1", "2024-01-05", 6.0))
            .with_time_entry(entry("e2", "u1", "2024-01-06", 2.0))
            .with_time_entry(entry("e3", "u2", "2024-01-07", 4.0));
        let cfg = EngineConfig::default();
        let s = UtilizationCalculator::new(&store, &cfg)
            .activity_summary(d("2024-01-01"), d("2024-01-31"))
            .unwrap();
        assert_eq!(s.total_projects, 2);
        assert_eq!(s.active_projects, 1);
        assert_eq!(s.total_tasks, 3);
        assert_eq!(s.total_time_entries, 3);
        assert_eq!(s.total_hours, 12.0);
        assert_eq!(s.unique_users, 2);
    }
}
