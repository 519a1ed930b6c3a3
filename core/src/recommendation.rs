//! Resource recommender — ranks users for an activity.
//!
//! Per candidate:
//!   1. Hard filter on exact current team-role name (when requested)
//!   2. Skill match ∈ [0,1], case-insensitive substring either way
//!   3. Utilization = (allocated + logged) / (weeks × standard week)
//!   4. Hard filter when remaining capacity < requested weekly hours
//!   5. score = 0.4·skills + 0.3·availability + 0.3·(1 − min(util, 1))
//!
//! Survivors are sorted by score, descending. The sort is stable, so
//! equal scores keep store fetch order.

use crate::{
    config::{AllocationBasis, EngineConfig},
    error::{StaffError, StaffResult},
    interval::{clipped_weeks, DateWindow},
    model::{Assignment, UserProfile},
    store::{RecordStore, UserFilter},
    types::{EntityId, Hours},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const SKILLS_WEIGHT: f64 = 0.4;
pub const AVAILABILITY_WEIGHT: f64 = 0.3;
pub const UTILIZATION_WEIGHT: f64 = 0.3;

/// Skill score used when the request names no skills.
pub const NEUTRAL_SKILLS_MATCH: f64 = 0.5;

pub const REASON_STRONG_SKILLS: &str = "Strong skills match";
pub const REASON_PARTIAL_SKILLS: &str = "Partial skills match";
pub const REASON_HIGH_AVAILABILITY: &str = "High availability";
pub const REASON_MODERATE_AVAILABILITY: &str = "Moderate availability";
pub const REASON_GOOD_UTILIZATION: &str = "Good utilization level";

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendationCriteria {
    pub activity_id:        EntityId,
    pub required_skills:    Vec<String>,
    pub required_team_role: Option<String>,
    pub start_date:         Option<NaiveDate>,
    pub end_date:           Option<NaiveDate>,
    /// Requested weekly hours. Zero or `None` disables the capacity gate.
    pub allocated_hours:    Option<Hours>,
    pub exclude_user_ids:   Vec<EntityId>,
}

impl RecommendationCriteria {
    pub fn for_activity(activity_id: impl Into<EntityId>) -> Self {
        Self {
            activity_id: activity_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecommendation {
    pub user_id:             EntityId,
    pub user_name:           String,
    pub user_email:          String,
    pub score:               f64,
    pub reasons:             Vec<String>,
    /// Capped at 1.0.
    pub current_utilization: f64,
    pub skills_match:        f64,
    pub availability:        f64,
    pub remaining_capacity:  Hours,
    pub team_role:           Option<String>,
    pub billing_rate:        Option<f64>,
    pub cost_rate:           Option<f64>,
}

// ── Scoring primitives ───────────────────────────────────────────────────────

/// Fraction of `required` matched by any of `user_skills`. A required
/// name matches when it contains, or is contained by, a user skill name,
/// ignoring case.
pub fn skills_match(required: &[String], user_skills: &[&str]) -> f64 {
    if required.is_empty() {
        return NEUTRAL_SKILLS_MATCH;
    }
    let owned: Vec<String> = user_skills.iter().map(|s| s.to_lowercase()).collect();
    let matched = required
        .iter()
        .map(|r| r.to_lowercase())
        .filter(|r| owned.iter().any(|u| u.contains(r.as_str()) || r.contains(u.as_str())))
        .count();
    matched as f64 / required.len() as f64
}

pub fn composite_score(skills_match: f64, current_utilization: f64) -> f64 {
    let availability = (1.0 - current_utilization).max(0.0);
    SKILLS_WEIGHT * skills_match
        + AVAILABILITY_WEIGHT * availability
        + UTILIZATION_WEIGHT * (1.0 - current_utilization.min(1.0))
}

pub fn reasons_for(skills_match: f64, availability: f64, current_utilization: f64) -> Vec<String> {
    let mut reasons = Vec::new();
    if skills_match >= 0.8 {
        reasons.push(REASON_STRONG_SKILLS.to_string());
    } else if skills_match >= 0.5 {
        reasons.push(REASON_PARTIAL_SKILLS.to_string());
    }
    if availability >= 0.7 {
        reasons.push(REASON_HIGH_AVAILABILITY.to_string());
    } else if availability >= 0.4 {
        reasons.push(REASON_MODERATE_AVAILABILITY.to_string());
    }
    if current_utilization < 0.7 {
        reasons.push(REASON_GOOD_UTILIZATION.to_string());
    }
    reasons
}

// ── Recommender ──────────────────────────────────────────────────────────────

pub struct ResourceRecommender<'a, S: RecordStore + ?Sized> {
    store:  &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: RecordStore + ?Sized> ResourceRecommender<'a, S> {
    pub fn new(store: &'a S, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn recommend_resources(
        &self,
        criteria: &RecommendationCriteria,
    ) -> StaffResult<Vec<UserRecommendation>> {
        let window = DateWindow::from_bounds(criteria.start_date, criteria.end_date)?;

        let activity = self
            .store
            .find_activity_by_id(&criteria.activity_id)?
            .ok_or_else(|| StaffError::not_found("activity", &criteria.activity_id))?;

        let candidates = self
            .store
            .find_users(&UserFilter::excluding(&criteria.exclude_user_ids))?;

        // Without a window the request covers a single standard week.
        let weeks = window.map_or(1, |w| w.weeks());
        let available_hours = weeks as f64 * self.config.standard_hours_per_week;
        let requested = criteria.allocated_hours.unwrap_or(0.0);

        let mut recommendations = Vec::new();
        for user in &candidates {
            // Guard the contract even if a store ignores the filter.
            if criteria.exclude_user_ids.iter().any(|id| id == user.id()) {
                continue;
            }
            if let Some(role) = &criteria.required_team_role {
                if user.team_role_name() != Some(role.as_str()) {
                    log::debug!("recommend: {} dropped, role mismatch", user.id());
                    continue;
                }
            }

            let assignments: Vec<Assignment> = self
                .store
                .find_assignments_overlapping(user.id(), window.as_ref())?
                .into_iter()
                .filter(|a| a.status.is_active())
                .collect();
            let total_allocated = self.allocated_load(&assignments, window.as_ref());

            let total_logged: Hours = self
                .store
                .find_time_entries_in_window(
                    Some(user.id()),
                    window.as_ref(),
                    &self.config.recommendation_entry_statuses,
                )?
                .iter()
                .map(|e| e.hours)
                .sum();

            let current_utilization = if available_hours > 0.0 {
                (total_allocated + total_logged) / available_hours
            } else {
                0.0
            };
            let remaining_capacity = (available_hours - total_allocated - total_logged).max(0.0);

            if requested > 0.0 && remaining_capacity < requested {
                log::debug!(
                    "recommend: {} dropped, remaining {remaining_capacity:.1}h < requested {requested:.1}h",
                    user.id()
                );
                continue;
            }

            recommendations.push(self.build(
                user,
                &criteria.required_skills,
                current_utilization,
                remaining_capacity,
            ));
        }

        recommendations.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        log::info!(
            "recommend for activity '{}': {} of {} candidates ranked",
            activity.name,
            recommendations.len(),
            candidates.len()
        );
        Ok(recommendations)
    }

    fn allocated_load(&self, assignments: &[Assignment], window: Option<&DateWindow>) -> Hours {
        match (self.config.recommendation_allocation_basis, window) {
            (AllocationBasis::ClippedWeeks, Some(w)) => assignments
                .iter()
                .map(|a| clipped_weeks(a.start_date, a.end_date, w) as f64 * a.allocated_hours)
                .sum(),
            _ => assignments.iter().map(|a| a.allocated_hours).sum(),
        }
    }

    fn build(
        &self,
        user: &UserProfile,
        required_skills: &[String],
        current_utilization: f64,
        remaining_capacity: Hours,
    ) -> UserRecommendation {
        let names: Vec<&str> = user.skills.iter().map(|s| s.skill_name.as_str()).collect();
        let skills = skills_match(required_skills, &names);
        let availability = (1.0 - current_utilization).max(0.0);

        UserRecommendation {
            user_id:             user.user.id.clone(),
            user_name:           user.user.name.clone(),
            user_email:          user.user.email.clone(),
            score:               composite_score(skills, current_utilization),
            reasons:             reasons_for(skills, availability, current_utilization),
            current_utilization: current_utilization.min(1.0),
            skills_match:        skills,
            availability,
            remaining_capacity,
            team_role:           user.team_role.as_ref().map(|r| r.name.clone()),
            billing_rate:        user.team_role.as_ref().map(|r| r.billing_rate),
            cost_rate:           user.team_role.as_ref().map(|r| r.cost_rate),
        }
    }
}
