//! Record builders shared by the unit tests.

use crate::model::*;
use crate::types::DATE_FORMAT;
use chrono::NaiveDate;

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
}

pub fn team_role(name: &str) -> TeamRole {
    TeamRole {
        id:           format!("role-{}", name.to_lowercase().replace(' ', "-")),
        name:         name.to_string(),
        billing_rate: 150.0,
        cost_rate:    90.0,
    }
}

pub fn user(id: &str) -> UserProfile {
    UserProfile {
        user: User {
            id:    id.to_string(),
            name:  format!("User {id}"),
            email: format!("{id}@example.com"),
            role:  UserRole::TeamMember,
        },
        team_role: None,
        skills:    Vec::new(),
    }
}

pub fn user_with(id: &str, role: Option<&str>, skills: &[(&str, ProficiencyLevel)]) -> UserProfile {
    let mut u = user(id);
    u.team_role = role.map(team_role);
    u.skills = skills
        .iter()
        .map(|(name, level)| UserSkill {
            skill_name:  name.to_string(),
            proficiency: *level,
            certified:   false,
        })
        .collect();
    u
}

pub fn project(id: &str) -> Activity {
    Activity {
        id:            id.to_string(),
        name:          format!("Project {id}"),
        activity_type: ActivityType::Project,
        status:        ActivityStatus::Active,
        start_date:    None,
        end_date:      None,
        budget_hours:  None,
        budget_cost:   None,
        created_on:    d("2024-01-01"),
        scopes:        Vec::new(),
    }
}

pub fn assignment(
    id: &str,
    user_id: &str,
    hours: f64,
    start: Option<&str>,
    end: Option<&str>,
) -> Assignment {
    Assignment {
        id:                    id.to_string(),
        user_id:               user_id.to_string(),
        activity_id:           "p1".to_string(),
        allocated_hours:       hours,
        start_date:            start.map(d),
        end_date:              end.map(d),
        status:                AssignmentStatus::Confirmed,
        billing_rate_override: None,
        cost_rate_override:    None,
    }
}

pub fn entry(id: &str, user_id: &str, date: &str, hours: f64) -> TimeEntry {
    TimeEntry {
        id:              id.to_string(),
        user_id:         user_id.to_string(),
        activity_id:     "p1".to_string(),
        date:            d(date),
        hours,
        status:          TimeEntryStatus::Approved,
        billable_amount: None,
        cost_amount:     None,
    }
}

pub fn requirement(
    activity_id: &str,
    skill: &str,
    level: ProficiencyLevel,
    priority: Option<u32>,
) -> ProjectRequirement {
    ProjectRequirement {
        id:             format!("req-{activity_id}-{skill}"),
        activity_id:    activity_id.to_string(),
        skill_name:     skill.to_string(),
        required_level: level,
        priority,
    }
}
