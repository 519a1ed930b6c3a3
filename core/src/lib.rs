//! staffing-core: resource utilization and staffing recommendations over a
//! record store of users, activities, assignments and time entries.

pub mod clock;
pub mod config;
pub mod demo_data;
pub mod error;
pub mod interval;
pub mod model;
pub mod name_generator;
pub mod recommendation;
pub mod rng;
pub mod store;
pub mod suggestion;
pub mod types;
pub mod utilization;

#[cfg(test)]
mod fixtures;

pub use error::{StaffError, StaffResult};
