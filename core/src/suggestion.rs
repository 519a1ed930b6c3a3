//! Resource suggester — requirement-driven candidate scoring and start-date
//! estimation.
//!
//! Confidence score, 0..=100:
//!   skills        0.4 × priority-weighted match percentage
//!   availability  +50 when free for the whole window,
//!                 +30 when free from a day inside the window
//!   utilization   +10 below 80%, −20 above 100%
//!
//! Only candidates with a positive score are returned.

use crate::{
    clock::Clock,
    config::EngineConfig,
    error::{StaffError, StaffResult},
    interval::{clipped_weeks, next_day, DateWindow},
    model::{Assignment, ProficiencyLevel, ProjectRequirement, UserProfile},
    store::RecordStore,
    types::{EntityId, Hours, DATE_FORMAT},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

const SKILLS_WEIGHT: f64 = 0.4;
const FULL_AVAILABILITY_POINTS: f64 = 50.0;
const PARTIAL_AVAILABILITY_POINTS: f64 = 30.0;
const LOW_UTILIZATION_PERCENT: f64 = 80.0;
const LOW_UTILIZATION_BONUS: f64 = 10.0;
const OVER_ALLOCATION_PERCENT: f64 = 100.0;
const OVER_ALLOCATION_PENALTY: f64 = 20.0;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceSuggestion {
    pub user_id:             EntityId,
    pub user_name:           String,
    pub confidence_score:    f64,
    pub reasons:             Vec<String>,
    pub available_from:      Option<NaiveDate>,
    /// Priority-weighted percentage of requirements met.
    pub skills_match:        f64,
    /// Planned hours over capacity, as a percentage.
    pub current_utilization: f64,
    /// Whether the average free week still fits the requested hours.
    pub has_weekly_capacity: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StartDateEstimate {
    pub start_date:            Option<NaiveDate>,
    pub can_start_immediately: bool,
}

/// `true` when `user_level` meets or exceeds `required`.
pub fn meets_level(user_level: ProficiencyLevel, required: ProficiencyLevel) -> bool {
    user_level >= required
}

/// When every conflict has a known end, the day after the latest one.
/// An open-ended conflict means there is no such day.
pub fn available_after(conflicts: &[Assignment]) -> Option<NaiveDate> {
    if conflicts.iter().any(|a| a.end_date.is_none()) {
        return None;
    }
    conflicts.iter().filter_map(|a| a.end_date).max().map(next_day)
}

// ── Suggester ────────────────────────────────────────────────────────────────

pub struct ResourceSuggester<'a, S: RecordStore + ?Sized, C: Clock + ?Sized> {
    store:  &'a S,
    config: &'a EngineConfig,
    clock:  &'a C,
}

impl<'a, S: RecordStore + ?Sized, C: Clock + ?Sized> ResourceSuggester<'a, S, C> {
    pub fn new(store: &'a S, config: &'a EngineConfig, clock: &'a C) -> Self {
        Self { store, config, clock }
    }

    /// Whether any counted assignment of the user touches `[start, end]`.
    pub fn check_allocation_conflict(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StaffResult<bool> {
        let window = DateWindow::new(start, end)?;
        Ok(self
            .store
            .find_assignments_overlapping(user_id, Some(&window))?
            .iter()
            .any(|a| self.config.counts_assignment(a.status)))
    }

    pub fn suggest_resources(
        &self,
        activity_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        required_hours_per_week: Hours,
    ) -> StaffResult<Vec<ResourceSuggestion>> {
        let window = DateWindow::new(start, end)?;
        let activity = self
            .store
            .find_activity_by_id(activity_id)?
            .ok_or_else(|| StaffError::not_found("activity", activity_id))?;
        let requirements = self.store.find_project_requirements(activity_id)?;
        let users = self.store.find_all_users()?;

        let mut suggestions = Vec::new();
        for user in &users {
            let conflicts: Vec<Assignment> = self
                .store
                .find_assignments_overlapping(user.id(), Some(&window))?
                .into_iter()
                .filter(|a| self.config.counts_assignment(a.status))
                .collect();

            let suggestion =
                self.evaluate(user, &requirements, &conflicts, &window, required_hours_per_week);
            if suggestion.confidence_score > 0.0 {
                suggestions.push(suggestion);
            } else {
                log::debug!("suggest: {} scored 0, skipped", user.id());
            }
        }

        suggestions.sort_by(|a, b| {
            b.confidence_score
                .partial_cmp(&a.confidence_score)
                .unwrap_or(Ordering::Equal)
        });

        log::info!(
            "suggest for '{}' {}: {} requirements, {} of {} users suggested",
            activity.name,
            window.label(),
            requirements.len(),
            suggestions.len(),
            users.len()
        );
        Ok(suggestions)
    }

    fn evaluate(
        &self,
        user: &UserProfile,
        requirements: &[ProjectRequirement],
        conflicts: &[Assignment],
        window: &DateWindow,
        required_hours_per_week: Hours,
    ) -> ResourceSuggestion {
        let mut reasons = Vec::new();
        let mut score = 0.0;

        // Skills, weighted by requirement priority.
        let mut matched_weight = 0u64;
        let mut total_weight = 0u64;
        for req in requirements {
            total_weight += u64::from(req.weight());
            let owned = user
                .skills
                .iter()
                .find(|s| s.skill_name.eq_ignore_ascii_case(&req.skill_name));
            match owned {
                Some(skill) if meets_level(skill.proficiency, req.required_level) => {
                    matched_weight += u64::from(req.weight());
                    reasons.push(format!(
                        "Has {} at {} level",
                        req.skill_name,
                        skill.proficiency.as_db_str()
                    ));
                }
                Some(skill) => reasons.push(format!(
                    "Missing {} (has {}, needs {})",
                    req.skill_name,
                    skill.proficiency.as_db_str(),
                    req.required_level.as_db_str()
                )),
                None => reasons.push(format!("Missing skill: {}", req.skill_name)),
            }
        }
        let skills_match = if total_weight > 0 {
            matched_weight as f64 / total_weight as f64 * 100.0
        } else {
            0.0
        };
        score += skills_match * SKILLS_WEIGHT;

        // Availability.
        let available_from = if conflicts.is_empty() {
            score += FULL_AVAILABILITY_POINTS;
            reasons.push("Available for the entire period".to_string());
            Some(window.start)
        } else {
            let from = available_after(conflicts);
            match from {
                Some(day) if day <= window.end => {
                    score += PARTIAL_AVAILABILITY_POINTS;
                    reasons.push(format!("Available from {}", day.format(DATE_FORMAT)));
                }
                _ => reasons.push("Not available during this period".to_string()),
            }
            from
        };

        // Utilization band.
        let allocated: Hours = conflicts
            .iter()
            .map(|a| clipped_weeks(a.start_date, a.end_date, window) as f64 * a.allocated_hours)
            .sum();
        let weeks = window.weeks();
        let capacity = weeks as f64 * self.config.standard_hours_per_week;
        let current_utilization = if capacity > 0.0 {
            allocated / capacity * 100.0
        } else {
            0.0
        };
        if current_utilization < LOW_UTILIZATION_PERCENT {
            score += LOW_UTILIZATION_BONUS;
            reasons.push(format!("Low utilization ({current_utilization:.1}%)"));
        } else if current_utilization > OVER_ALLOCATION_PERCENT {
            score -= OVER_ALLOCATION_PENALTY;
            reasons.push(format!("Over-allocated ({current_utilization:.1}%)"));
        }

        let weekly_load = if weeks > 0 { allocated / weeks as f64 } else { 0.0 };
        let has_weekly_capacity =
            self.config.standard_hours_per_week - weekly_load >= required_hours_per_week;

        ResourceSuggestion {
            user_id: user.user.id.clone(),
            user_name: user.user.name.clone(),
            confidence_score: score.clamp(0.0, 100.0),
            reasons,
            available_from,
            skills_match,
            current_utilization,
            has_weekly_capacity,
        }
    }

    /// Earliest day on which `team_size` suggested users are free, looking
    /// `estimate_lookahead_days` ahead of today. `None` when the window
    /// never holds enough of them.
    pub fn estimate_start_date(
        &self,
        activity_id: &str,
        required_hours_per_week: Hours,
        team_size: usize,
    ) -> StaffResult<Option<NaiveDate>> {
        if team_size == 0 {
            return Err(StaffError::invalid("team_size must be at least 1"));
        }
        let today = self.clock.today();
        let window = DateWindow::lookahead(today, self.config.estimate_lookahead_days);
        let suggestions =
            self.suggest_resources(activity_id, window.start, window.end, required_hours_per_week)?;

        let free_now = suggestions
            .iter()
            .filter(|s| s.available_from.is_some_and(|d| d <= today))
            .count();
        if free_now >= team_size {
            return Ok(Some(today));
        }

        let mut dates: Vec<NaiveDate> = suggestions
            .iter()
            .filter_map(|s| s.available_from)
            .filter(|d| *d <= window.end)
            .collect();
        dates.sort();

        let estimate = dates.get(team_size - 1).copied();
        log::info!(
            "estimate for {activity_id}: team of {team_size}, {free_now} free now, start {:?}",
            estimate
        );
        Ok(estimate)
    }

    pub fn estimate_start(
        &self,
        activity_id: &str,
        required_hours_per_week: Hours,
        team_size: usize,
    ) -> StaffResult<StartDateEstimate> {
        let start_date = self.estimate_start_date(activity_id, required_hours_per_week, team_size)?;
        let today = self.clock.today();
        Ok(StartDateEstimate {
            start_date,
            can_start_immediately: start_date.is_some_and(|d| d <= today),
        })
    }
}
