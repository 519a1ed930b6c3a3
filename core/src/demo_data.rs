//! Deterministic demo dataset.
//!
//! Fills an empty `SqliteStore` with team roles, skills, users, projects,
//! requirements, assignments and recent time entries, all dated relative
//! to `today`. The same `(seed, user_count, today)` always produces the
//! same rows, ids included.

use crate::{
    error::{StaffError, StaffResult},
    interval::{add_days, sub_days},
    model::{
        Activity, ActivityStatus, ActivityType, Assignment, AssignmentStatus, ProficiencyLevel,
        ProjectRequirement, Scope, TeamRole, TimeEntry, TimeEntryStatus, User, UserRole,
    },
    name_generator::NameGenerator,
    rng::{DataSlot, RngBank, SeededRng},
    store::SqliteStore,
};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// (name, billing rate, cost rate)
const TEAM_ROLES: &[(&str, f64, f64)] = &[
    ("Engineer", 150.0, 90.0),
    ("Senior Engineer", 190.0, 120.0),
    ("Designer", 130.0, 80.0),
    ("Project Manager", 170.0, 100.0),
];

const SKILLS: &[&str] = &[
    "Rust", "SQL", "React", "Python", "AWS", "Kubernetes", "UX Design", "Testing",
];

const WEEKLY_HOURS: &[f64] = &[8.0, 16.0, 20.0, 24.0, 32.0, 40.0];

/// Days of time entries written before `today`.
const TIMESHEET_DAYS: u64 = 14;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoSummary {
    pub seed:         u64,
    pub users:        usize,
    pub activities:   usize,
    pub requirements: usize,
    pub assignments:  usize,
    pub time_entries: usize,
}

pub fn seed_demo_data(
    store: &SqliteStore,
    seed: u64,
    user_count: usize,
    today: NaiveDate,
) -> StaffResult<DemoSummary> {
    if store.user_count()? > 0 {
        return Err(StaffError::invalid("demo data needs an empty store"));
    }
    let bank = RngBank::new(seed);
    let mut summary = DemoSummary { seed, ..Default::default() };

    let roles = seed_reference_data(store)?;

    let mut users_rng = bank.for_slot(DataSlot::Users);
    let mut skills_rng = bank.for_slot(DataSlot::Skills);
    let mut user_ids = Vec::with_capacity(user_count);
    for n in 0..user_count {
        let name = NameGenerator::full_name(&mut users_rng);
        let user = User {
            id:    users_rng.uuid().to_string(),
            email: NameGenerator::email(&name, n),
            name,
            role:  if n == 0 { UserRole::Manager } else { UserRole::TeamMember },
        };
        store.insert_user(&user)?;
        if let Some(role) = users_rng.pick(&roles) {
            store.assign_team_role(&user.id, &role.id)?;
        }
        for skill in distinct(&mut skills_rng, SKILLS, 2, 4) {
            let level = *skills_rng
                .pick(&ProficiencyLevel::ALL)
                .unwrap_or(&ProficiencyLevel::Beginner);
            store.insert_user_skill(&user.id, &skill_id(skill), level, skills_rng.chance(0.2))?;
        }
        user_ids.push(user.id);
    }
    summary.users = user_ids.len();

    let mut activity_rng = bank.for_slot(DataSlot::Activities);
    let project_count = (user_count / 2).max(3);
    let mut projects = Vec::with_capacity(project_count);
    for _ in 0..project_count {
        let project = demo_project(&mut activity_rng, &roles, today);
        store.insert_activity(&project)?;
        for skill in distinct(&mut activity_rng, SKILLS, 1, 3) {
            let priority = activity_rng.range_inclusive(0, 5) as u32;
            let level = *activity_rng
                .pick(&ProficiencyLevel::ALL[..3])
                .unwrap_or(&ProficiencyLevel::Beginner);
            store.insert_requirement(&ProjectRequirement {
                id:             activity_rng.uuid().to_string(),
                activity_id:    project.id.clone(),
                skill_name:     skill.to_string(),
                required_level: level,
                priority:       (priority > 0).then_some(priority),
            })?;
            summary.requirements += 1;
        }
        projects.push(project);
    }
    summary.activities = projects.len();

    let mut assign_rng = bank.for_slot(DataSlot::Assignments);
    let mut time_rng = bank.for_slot(DataSlot::TimeEntries);
    for user_id in &user_ids {
        let count = assign_rng.range_inclusive(0, 2);
        for _ in 0..count {
            let Some(project) = assign_rng.pick(&projects) else { continue };
            let assignment = demo_assignment(&mut assign_rng, user_id, project);
            store.insert_assignment(&assignment)?;
            summary.assignments += 1;
            if assignment.status.is_active() {
                summary.time_entries += write_timesheet(store, &mut time_rng, &assignment, today)?;
            }
        }
    }

    log::info!(
        "demo data seed={seed}: {} users, {} activities, {} assignments, {} time entries",
        summary.users,
        summary.activities,
        summary.assignments,
        summary.time_entries
    );
    Ok(summary)
}

fn seed_reference_data(store: &SqliteStore) -> StaffResult<Vec<TeamRole>> {
    let roles: Vec<TeamRole> = TEAM_ROLES
        .iter()
        .map(|(name, billing, cost)| TeamRole {
            id:           format!("role-{}", slug(name)),
            name:         name.to_string(),
            billing_rate: *billing,
            cost_rate:    *cost,
        })
        .collect();
    for role in &roles {
        store.insert_team_role(role)?;
    }
    for skill in SKILLS {
        store.insert_skill(&skill_id(skill), skill)?;
    }
    Ok(roles)
}

fn demo_project(rng: &mut SeededRng, roles: &[TeamRole], today: NaiveDate) -> Activity {
    let start = if rng.chance(0.5) {
        sub_days(today, rng.range_inclusive(0, 30))
    } else {
        add_days(today, rng.range_inclusive(1, 30))
    };
    let end = add_days(start, rng.range_inclusive(60, 180));
    let status = if start <= today { ActivityStatus::Active } else { ActivityStatus::Planning };
    let budget_hours = rng.range_inclusive(200, 2000) as f64;

    let scopes = distinct(rng, roles, 1, 2)
        .into_iter()
        .map(|role| Scope {
            team_role_id:          role.id.clone(),
            team_role_name:        role.name.clone(),
            allocated_hours:       (budget_hours / 2.0).round(),
            billing_rate_override: None,
            cost_rate_override:    None,
        })
        .collect();

    Activity {
        id: rng.uuid().to_string(),
        name: NameGenerator::project_name(rng),
        activity_type: ActivityType::Project,
        status,
        start_date: Some(start),
        end_date: Some(end),
        budget_hours: Some(budget_hours),
        budget_cost: Some(budget_hours * 150.0),
        created_on: sub_days(start, 14),
        scopes,
    }
}

fn demo_assignment(rng: &mut SeededRng, user_id: &str, project: &Activity) -> Assignment {
    let status = if rng.chance(0.05) {
        AssignmentStatus::Cancelled
    } else if rng.chance(0.25) {
        AssignmentStatus::Pending
    } else {
        AssignmentStatus::Confirmed
    };
    let end_date = if rng.chance(0.15) { None } else { project.end_date };
    Assignment {
        id: rng.uuid().to_string(),
        user_id: user_id.to_string(),
        activity_id: project.id.clone(),
        allocated_hours: *rng.pick(WEEKLY_HOURS).unwrap_or(&20.0),
        start_date: project.start_date,
        end_date,
        status,
        billing_rate_override: None,
        cost_rate_override: None,
    }
}

/// Weekday entries for the last `TIMESHEET_DAYS` the assignment covers.
fn write_timesheet(
    store: &SqliteStore,
    rng: &mut SeededRng,
    assignment: &Assignment,
    today: NaiveDate,
) -> StaffResult<usize> {
    let mut day = sub_days(today, TIMESHEET_DAYS);
    if let Some(start) = assignment.start_date {
        day = day.max(start);
    }
    let last = assignment.end_date.map_or(sub_days(today, 1), |e| e.min(sub_days(today, 1)));

    let daily = assignment.allocated_hours / 5.0;
    let mut written = 0;
    while day <= last {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            let status = match rng.below(10) {
                0 => TimeEntryStatus::Draft,
                1..=3 => TimeEntryStatus::Submitted,
                4 => TimeEntryStatus::Rejected,
                _ => TimeEntryStatus::Approved,
            };
            store.insert_time_entry(&TimeEntry {
                id: rng.uuid().to_string(),
                user_id: assignment.user_id.clone(),
                activity_id: assignment.activity_id.clone(),
                date: day,
                hours: daily,
                status,
                billable_amount: Some(daily * 150.0),
                cost_amount: Some(daily * 90.0),
            })?;
            written += 1;
        }
        day = add_days(day, 1);
    }
    Ok(written)
}

/// Between `min` and `max` distinct items, in draw order.
fn distinct<'a, T>(rng: &mut SeededRng, items: &'a [T], min: u64, max: u64) -> Vec<&'a T> {
    let want = (rng.range_inclusive(min, max) as usize).min(items.len());
    let mut picked: Vec<usize> = Vec::with_capacity(want);
    while picked.len() < want {
        let idx = rng.below(items.len() as u64) as usize;
        if !picked.contains(&idx) {
            picked.push(idx);
        }
    }
    picked.into_iter().map(|i| &items[i]).collect()
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

fn skill_id(name: &str) -> String {
    format!("skill-{}", slug(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RecordStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn seeded(seed: u64, users: usize) -> (SqliteStore, DemoSummary) {
        let store = SqliteStore::in_memory().unwrap();
        store.migrate().unwrap();
        let summary = seed_demo_data(&store, seed, users, today()).unwrap();
        (store, summary)
    }

    #[test]
    fn populates_every_table() {
        let (store, summary) = seeded(42, 12);
        assert_eq!(summary.users, 12);
        assert_eq!(store.user_count().unwrap(), 12);
        assert_eq!(summary.activities, 6);
        assert!(summary.requirements >= summary.activities);

        let users = store.find_all_users().unwrap();
        assert!(users.iter().all(|u| u.team_role.is_some()));
        assert!(users.iter().all(|u| (2..=4).contains(&u.skills.len())));
    }

    #[test]
    fn same_seed_same_rows() {
        let (a, _) = seeded(7, 8);
        let (b, _) = seeded(7, 8);
        assert_eq!(a.find_all_users().unwrap(), b.find_all_users().unwrap());
        assert_eq!(a.find_activities().unwrap(), b.find_activities().unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let (a, _) = seeded(1, 8);
        let (b, _) = seeded(2, 8);
        assert_ne!(a.find_all_users().unwrap(), b.find_all_users().unwrap());
    }

    #[test]
    fn refuses_a_populated_store() {
        let (store, _) = seeded(3, 2);
        assert!(matches!(
            seed_demo_data(&store, 3, 2, today()),
            Err(StaffError::InvalidInput(_))
        ));
    }

    #[test]
    fn distinct_never_repeats() {
        let mut rng = RngBank::new(5).for_slot(DataSlot::Skills);
        for _ in 0..50 {
            let picked = distinct(&mut rng, SKILLS, 2, 4);
            let mut names: Vec<_> = picked.iter().map(|s| s.to_string()).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), picked.len());
        }
    }
}
