//! Engine configuration, loaded from a JSON file or defaulted.

use crate::{
    error::{StaffError, StaffResult},
    model::{AssignmentStatus, TimeEntryStatus},
};
use serde::{Deserialize, Serialize};

/// How `recommend_resources` turns overlapping assignments into load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllocationBasis {
    /// Each overlapping assignment counts its weekly hours once,
    /// regardless of how long it overlaps the window.
    #[default]
    FlatWeekly,
    /// Weekly hours times the clipped weeks in window, as utilization does.
    ClippedWeeks,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub standard_hours_per_week:         f64,
    pub estimate_lookahead_days:         u64,
    pub recommendation_allocation_basis: AllocationBasis,
    /// Empty means every status counts.
    pub utilization_entry_statuses:      Vec<TimeEntryStatus>,
    pub recommendation_entry_statuses:   Vec<TimeEntryStatus>,
    /// Assignment statuses that count as load and as conflicts in
    /// utilization, weekly capacity and suggestions. Empty means all.
    pub counted_assignment_statuses:     Vec<AssignmentStatus>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_hours_per_week:         40.0,
            estimate_lookahead_days:         90,
            recommendation_allocation_basis: AllocationBasis::FlatWeekly,
            utilization_entry_statuses:      Vec::new(),
            recommendation_entry_statuses:   vec![
                TimeEntryStatus::Draft,
                TimeEntryStatus::Submitted,
                TimeEntryStatus::Approved,
            ],
            counted_assignment_statuses:     Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &str) -> StaffResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("config loaded from {path}: {config:?}");
        Ok(config)
    }

    pub fn counts_assignment(&self, status: AssignmentStatus) -> bool {
        self.counted_assignment_statuses.is_empty()
            || self.counted_assignment_statuses.contains(&status)
    }

    pub fn validate(&self) -> StaffResult<()> {
        if !(self.standard_hours_per_week > 0.0) {
            return Err(StaffError::invalid(format!(
                "standard_hours_per_week must be positive, got {}",
                self.standard_hours_per_week
            )));
        }
        if self.estimate_lookahead_days == 0 {
            return Err(StaffError::invalid("estimate_lookahead_days must be positive"));
        }
        Ok(())
    }
}
