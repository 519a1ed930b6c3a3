//! Entities read from the record store.
//!
//! RULE: the scoring components treat every value here as a read-only
//! snapshot. Nothing in the crate mutates a record after it is fetched.
//!
//! Enum columns are stored as SCREAMING_SNAKE strings; `as_db_str` and
//! `from_db_str` are the only conversion points.

use crate::types::{EntityId, Hours};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── Users ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    TeamMember,
}

impl UserRole {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            UserRole::Admin      => "ADMIN",
            UserRole::Manager    => "MANAGER",
            UserRole::TeamMember => "TEAM_MEMBER",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN"       => Some(UserRole::Admin),
            "MANAGER"     => Some(UserRole::Manager),
            "TEAM_MEMBER" => Some(UserRole::TeamMember),
            _ => None,
        }
    }
}

/// A billing tier a user can hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamRole {
    pub id:           EntityId,
    pub name:         String,
    pub billing_rate: f64,
    pub cost_rate:    f64,
}

/// Ordinal skill scale. Declaration order is the comparison order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 4] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
        ProficiencyLevel::Expert,
    ];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::Beginner     => "BEGINNER",
            ProficiencyLevel::Intermediate => "INTERMEDIATE",
            ProficiencyLevel::Advanced     => "ADVANCED",
            ProficiencyLevel::Expert       => "EXPERT",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "BEGINNER"     => Some(ProficiencyLevel::Beginner),
            "INTERMEDIATE" => Some(ProficiencyLevel::Intermediate),
            "ADVANCED"     => Some(ProficiencyLevel::Advanced),
            "EXPERT"       => Some(ProficiencyLevel::Expert),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSkill {
    pub skill_name:  String,
    pub proficiency: ProficiencyLevel,
    pub certified:   bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id:    EntityId,
    pub name:  String,
    pub email: String,
    pub role:  UserRole,
}

/// A user joined with their current team role and skills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user:      User,
    pub team_role: Option<TeamRole>,
    pub skills:    Vec<UserSkill>,
}

impl UserProfile {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn team_role_name(&self) -> Option<&str> {
        self.team_role.as_ref().map(|r| r.name.as_str())
    }
}

// ── Activities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Project,
    Internal,
    Pto,
    NonBillable,
}

impl ActivityType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ActivityType::Project     => "PROJECT",
            ActivityType::Internal    => "INTERNAL",
            ActivityType::Pto         => "PTO",
            ActivityType::NonBillable => "NON_BILLABLE",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "PROJECT"      => Some(ActivityType::Project),
            "INTERNAL"     => Some(ActivityType::Internal),
            "PTO"          => Some(ActivityType::Pto),
            "NON_BILLABLE" => Some(ActivityType::NonBillable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

impl ActivityStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            ActivityStatus::Planning  => "PLANNING",
            ActivityStatus::Active    => "ACTIVE",
            ActivityStatus::OnHold    => "ON_HOLD",
            ActivityStatus::Completed => "COMPLETED",
            ActivityStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "PLANNING"  => Some(ActivityStatus::Planning),
            "ACTIVE"    => Some(ActivityStatus::Active),
            "ON_HOLD"   => Some(ActivityStatus::OnHold),
            "COMPLETED" => Some(ActivityStatus::Completed),
            "CANCELLED" => Some(ActivityStatus::Cancelled),
            _ => None,
        }
    }
}

/// An activity's declared need for a team role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scope {
    pub team_role_id:          EntityId,
    pub team_role_name:        String,
    pub allocated_hours:       Hours,
    pub billing_rate_override: Option<f64>,
    pub cost_rate_override:    Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    pub id:            EntityId,
    pub name:          String,
    pub activity_type: ActivityType,
    pub status:        ActivityStatus,
    pub start_date:    Option<NaiveDate>,
    pub end_date:      Option<NaiveDate>,
    pub budget_hours:  Option<Hours>,
    pub budget_cost:   Option<f64>,
    pub created_on:    NaiveDate,
    pub scopes:        Vec<Scope>,
}

/// One skill line of a project's staffing requirements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectRequirement {
    pub id:             EntityId,
    pub activity_id:    EntityId,
    pub skill_name:     String,
    pub required_level: ProficiencyLevel,
    /// Relative weight. Missing or zero counts as 1.
    pub priority:       Option<u32>,
}

impl ProjectRequirement {
    pub fn weight(&self) -> u32 {
        match self.priority {
            Some(p) if p > 0 => p,
            _ => 1,
        }
    }
}

// ── Assignments ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending   => "PENDING",
            AssignmentStatus::Confirmed => "CONFIRMED",
            AssignmentStatus::Completed => "COMPLETED",
            AssignmentStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "PENDING"   => Some(AssignmentStatus::Pending),
            "CONFIRMED" => Some(AssignmentStatus::Confirmed),
            "COMPLETED" => Some(AssignmentStatus::Completed),
            "CANCELLED" => Some(AssignmentStatus::Cancelled),
            _ => None,
        }
    }

    /// Pending and confirmed assignments still claim a user's time.
    pub fn is_active(&self) -> bool {
        matches!(self, AssignmentStatus::Pending | AssignmentStatus::Confirmed)
    }
}

/// A weekly-hours commitment of a user to an activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub id:                    EntityId,
    pub user_id:               EntityId,
    pub activity_id:           EntityId,
    /// Hours per week, not a total.
    pub allocated_hours:       Hours,
    pub start_date:            Option<NaiveDate>,
    /// `None` is open-ended.
    pub end_date:              Option<NaiveDate>,
    pub status:                AssignmentStatus,
    pub billing_rate_override: Option<f64>,
    pub cost_rate_override:    Option<f64>,
}

// ── Time entries ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeEntryStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl TimeEntryStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            TimeEntryStatus::Draft     => "DRAFT",
            TimeEntryStatus::Submitted => "SUBMITTED",
            TimeEntryStatus::Approved  => "APPROVED",
            TimeEntryStatus::Rejected  => "REJECTED",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "DRAFT"     => Some(TimeEntryStatus::Draft),
            "SUBMITTED" => Some(TimeEntryStatus::Submitted),
            "APPROVED"  => Some(TimeEntryStatus::Approved),
            "REJECTED"  => Some(TimeEntryStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeEntry {
    pub id:              EntityId,
    pub user_id:         EntityId,
    pub activity_id:     EntityId,
    pub date:            NaiveDate,
    pub hours:           Hours,
    pub status:          TimeEntryStatus,
    pub billable_amount: Option<f64>,
    pub cost_amount:     Option<f64>,
}
