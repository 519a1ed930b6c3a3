//! Shared primitive types used across the entire crate.

/// A stable, unique identifier for any stored entity (users, activities, ...).
pub type EntityId = String;

/// Hours as stored by the record store. Assignment hours are per week,
/// time entry hours are per day.
pub type Hours = f64;

/// ISO date format used for storage and reporting.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
