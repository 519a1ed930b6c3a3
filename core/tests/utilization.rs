mod common;

use common::*;
use staffing_core::{
    config::EngineConfig,
    model::{ActivityStatus, ActivityType, AssignmentStatus, TimeEntryStatus},
    utilization::UtilizationCalculator,
    StaffError,
};

/// u1: 20h/week from 2024-01-08 onward, 20 logged hours in January
/// (one of them rejected) and one entry just past the window.
fn january_store() -> staffing_core::store::SqliteStore {
    let store = store();
    add_user(&store, "u1", Some("Engineer"), &[]);
    add_project(&store, "p1");
    add_assignment(&store, "a1", "u1", "p1", 20.0, Some("2024-01-08"), None, AssignmentStatus::Confirmed);
    add_entry(&store, "e1", "u1", "p1", "2024-01-02", 8.0, TimeEntryStatus::Approved);
    add_entry(&store, "e2", "u1", "p1", "2024-01-03", 8.0, TimeEntryStatus::Submitted);
    add_entry(&store, "e3", "u1", "p1", "2024-01-04", 4.0, TimeEntryStatus::Rejected);
    add_entry(&store, "e4", "u1", "p1", "2024-01-31", 8.0, TimeEntryStatus::Approved);
    store
}

#[test]
fn user_utilization_over_four_weeks() {
    let store = january_store();
    let cfg = EngineConfig::default();
    let r = UtilizationCalculator::new(&store, &cfg)
        .calculate_user_utilization("u1", d("2024-01-01"), d("2024-01-29"), None)
        .unwrap();

    assert_eq!(r.capacity_hours, 160.0, "28 days is four standard weeks");
    assert_eq!(r.allocated_hours, 60.0, "open end clips to the window: 3 weeks x 20h");
    assert_eq!(r.actual_hours, 20.0, "every status counts by default");
    assert!(approx(r.utilization_percent, 12.5));
    assert_eq!(r.period, "2024-01-01 to 2024-01-29");
    assert_eq!(r.user_name, "User u1");
}

#[test]
fn configured_statuses_narrow_actual_hours() {
    let store = january_store();
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
fn custom_standard_week_scales_capacity() {
    let store = january_store();
    let cfg = EngineConfig::default();
    let r = UtilizationCalculator::new(&store, &cfg)
        .calculate_user_utilization("u1", d("2024-01-01"), d("2024-01-29"), Some(20.0))
        .unwrap();
    assert_eq!(r.capacity_hours, 80.0);
    assert!(approx(r.utilization_percent, 25.0));
}

#[test]
fn over_logged_user_exceeds_one_hundred_unless_clamped() {
    let store = store();
    add_user(&store, "u1", None, &[]);
    add_project(&store, "p1");
    for (i, day) in ["2024-01-02", "2024-01-09", "2024-01-16", "2024-01-23"].iter().enumerate() {
        add_entry(&store, &format!("e{i}"), "u1", "p1", day, 50.0, TimeEntryStatus::Approved);
    }
    let cfg = EngineConfig::default();
    let r = UtilizationCalculator::new(&store, &cfg)
        .calculate_user_utilization("u1", d("2024-01-01"), d("2024-01-29"), None)
        .unwrap();
    assert!(approx(r.raw_utilization(), 125.0));
    assert_eq!(r.clamped_utilization(), 100.0);
}

#[test]
fn unknown_user_and_bad_windows_are_errors() {
    let store = january_store();
    let cfg = EngineConfig::default();
    let calc = UtilizationCalculator::new(&store, &cfg);

    let err = calc
        .calculate_user_utilization("ghost", d("2024-01-01"), d("2024-01-29"), None)
        .unwrap_err();
    assert!(matches!(err, StaffError::NotFound { .. }), "got {err:?}");

    let err = calc
        .calculate_user_utilization("u1", d("2024-02-01"), d("2024-01-01"), None)
        .unwrap_err();
    assert!(matches!(err, StaffError::InvalidInput(_)), "got {err:?}");

    let err = calc
        .calculate_user_utilization("u1", d("2024-01-01"), d("2024-01-29"), Some(0.0))
        .unwrap_err();
    assert!(matches!(err, StaffError::InvalidInput(_)), "got {err:?}");
}

#[test]
fn team_utilization_covers_every_user_in_order() {
    let store = january_store();
    add_user(&store, "u2", None, &[]);
    let cfg = EngineConfig::default();
    let team = UtilizationCalculator::new(&store, &cfg)
        .calculate_team_utilization(d("2024-01-01"), d("2024-01-29"), None)
        .unwrap();
    let ids: Vec<_> = team.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u2"]);
    assert_eq!(team[1].actual_hours, 0.0);
    assert_eq!(team[1].utilization_percent, 0.0);
}

#[test]
fn weekly_capacity_adds_each_assignment_once_per_week() {
    let store = store();
    add_user(&store, "u1", None, &[]);
    add_project(&store, "p1");
    add_assignment(&store, "short", "u1", "p1", 20.0, Some("2024-05-08"), Some("2024-05-10"), AssignmentStatus::Confirmed);
    add_assignment(&store, "always", "u1", "p1", 10.0, None, None, AssignmentStatus::Pending);
    add_assignment(&store, "cancelled", "u1", "p1", 40.0, None, None, AssignmentStatus::Cancelled);

    // Wednesday to Sunday two weeks later: three Monday buckets.
    let cfg = EngineConfig::default();
    let weeks = UtilizationCalculator::new(&store, &cfg)
        .user_capacity("u1", d("2024-05-01"), d("2024-05-19"), None)
        .unwrap();
    let mondays: Vec<_> = weeks.iter().map(|w| w.week).collect();
    assert_eq!(mondays, vec![d("2024-04-29"), d("2024-05-06"), d("2024-05-13")]);
    let hours: Vec<_> = weeks.iter().map(|w| w.allocated_hours).collect();
    assert_eq!(hours, vec![50.0, 70.0, 50.0], "cancelled work counts by default");

    let cfg = EngineConfig {
        counted_assignment_statuses: vec![AssignmentStatus::Pending, AssignmentStatus::Confirmed],
        ..EngineConfig::default()
    };
    let weeks = UtilizationCalculator::new(&store, &cfg)
        .user_capacity("u1", d("2024-05-01"), d("2024-05-19"), None)
        .unwrap();
    let hours: Vec<_> = weeks.iter().map(|w| w.allocated_hours).collect();
    assert_eq!(hours, vec![10.0, 30.0, 10.0]);
    assert!(approx(weeks[1].utilization_percent, 75.0));
    assert_eq!(weeks[0].available_hours, 40.0);
}

#[test]
fn activity_summary_counts_portfolio() {
    let store = store();
    add_user(&store, "u1", None, &[]);
    add_user(&store, "u2", None, &[]);
    add_activity(&store, "live", ActivityType::Project, ActivityStatus::Active, Some("2024-01-01"), None);
    add_activity(&store, "unscheduled", ActivityType::Project, ActivityStatus::Active, None, None);
    add_activity(&store, "planned", ActivityType::Project, ActivityStatus::Planning, Some("2024-03-01"), None);
    add_activity(&store, "internal", ActivityType::Internal, ActivityStatus::Active, None, None);
    add_activity(&store, "leave", ActivityType::Pto, ActivityStatus::Active, None, None);
    add_entry(&store, "e1", "u1", "live", "2024-03-05", 8.0, TimeEntryStatus::Approved);
    add_entry(&store, "e2", "u2", "internal", "2024-03-06", 4.5, TimeEntryStatus::Draft);
    add_entry(&store, "e3", "u1", "live", "2024-04-01", 8.0, TimeEntryStatus::Approved);

    let cfg = EngineConfig::default();
    let summary = UtilizationCalculator::new(&store, &cfg)
        .activity_summary(d("2024-03-01"), d("2024-03-31"))
        .unwrap();
    assert_eq!(summary.total_projects, 3);
    assert_eq!(summary.active_projects, 1, "planning and unscheduled projects are not active");
    assert_eq!(summary.total_tasks, 4, "projects plus internal work, no leave");
    assert_eq!(summary.total_time_entries, 2);
    assert_eq!(summary.total_hours, 12.5);
    assert_eq!(summary.unique_users, 2);
}
