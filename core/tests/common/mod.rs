//! Shared setup for the integration tests: a migrated in-memory store
//! with two team roles and a fixed skill catalogue.
#![allow(dead_code)]

use chrono::NaiveDate;
use staffing_core::{
    model::{
        Activity, ActivityStatus, ActivityType, Assignment, AssignmentStatus, ProficiencyLevel,
        ProjectRequirement, Scope, TeamRole, TimeEntry, TimeEntryStatus, User, UserRole,
    },
    store::SqliteStore,
    types::DATE_FORMAT,
};

pub const ROLES: &[&str] = &["Engineer", "Analyst"];
pub const SKILLS: &[&str] = &["Rust", "SQL", "React", "Risk Assessment"];

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).expect("test date")
}

pub fn role_id(name: &str) -> String {
    format!("role-{}", name.to_lowercase())
}

pub fn skill_id(name: &str) -> String {
    format!("skill-{}", name.to_lowercase().replace(' ', "-"))
}

pub fn store() -> SqliteStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = SqliteStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    for name in ROLES {
        store
            .insert_team_role(&TeamRole {
                id:           role_id(name),
                name:         name.to_string(),
                billing_rate: 150.0,
                cost_rate:    90.0,
            })
            .expect("insert role");
    }
    for name in SKILLS {
        store.insert_skill(&skill_id(name), name).expect("insert skill");
    }
    store
}

pub fn add_user(
    store: &SqliteStore,
    id: &str,
    role: Option<&str>,
    skills: &[(&str, ProficiencyLevel)],
) {
    store
        .insert_user(&User {
            id:    id.to_string(),
            name:  format!("User {id}"),
            email: format!("{id}@example.com"),
            role:  UserRole::TeamMember,
        })
        .expect("insert user");
    if let Some(role) = role {
        store.assign_team_role(id, &role_id(role)).expect("assign role");
    }
    for (skill, level) in skills {
        store
            .insert_user_skill(id, &skill_id(skill), *level, false)
            .expect("insert user skill");
    }
}

pub fn add_activity(
    store: &SqliteStore,
    id: &str,
    activity_type: ActivityType,
    status: ActivityStatus,
    start: Option<&str>,
    end: Option<&str>,
) {
    store
        .insert_activity(&Activity {
            id:            id.to_string(),
            name:          format!("Activity {id}"),
            activity_type,
            status,
            start_date:    start.map(d),
            end_date:      end.map(d),
            budget_hours:  None,
            budget_cost:   None,
            created_on:    d("2024-01-01"),
            scopes:        vec![Scope {
                team_role_id:          role_id("Engineer"),
                team_role_name:        "Engineer".into(),
                allocated_hours:       400.0,
                billing_rate_override: None,
                cost_rate_override:    None,
            }],
        })
        .expect("insert activity");
}

pub fn add_project(store: &SqliteStore, id: &str) {
    add_activity(store, id, ActivityType::Project, ActivityStatus::Active, Some("2024-01-01"), None);
}

#[allow(clippy::too_many_arguments)]
pub fn add_assignment(
    store: &SqliteStore,
    id: &str,
    user_id: &str,
    activity_id: &str,
    hours: f64,
    start: Option<&str>,
    end: Option<&str>,
    status: AssignmentStatus,
) {
    store
        .insert_assignment(&Assignment {
            id:                    id.to_string(),
            user_id:               user_id.to_string(),
            activity_id:           activity_id.to_string(),
            allocated_hours:       hours,
            start_date:            start.map(d),
            end_date:              end.map(d),
            status,
            billing_rate_override: None,
            cost_rate_override:    None,
        })
        .expect("insert assignment");
}

pub fn add_entry(
    store: &SqliteStore,
    id: &str,
    user_id: &str,
    activity_id: &str,
    date: &str,
    hours: f64,
    status: TimeEntryStatus,
) {
    store
        .insert_time_entry(&TimeEntry {
            id:              id.to_string(),
            user_id:         user_id.to_string(),
            activity_id:     activity_id.to_string(),
            date:            d(date),
            hours,
            status,
            billable_amount: None,
            cost_amount:     None,
        })
        .expect("insert time entry");
}

pub fn add_requirement(
    store: &SqliteStore,
    activity_id: &str,
    skill: &str,
    level: ProficiencyLevel,
    priority: Option<u32>,
) {
    store
        .insert_requirement(&ProjectRequirement {
            id:             format!("req-{activity_id}-{skill}"),
            activity_id:    activity_id.to_string(),
            skill_name:     skill.to_string(),
            required_level: level,
            priority,
        })
        .expect("insert requirement");
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
