//! staff-runner: headless command runner for the staffing engine.
//!
//! Usage:
//!   staff-runner seed --db staff.db --seed 42 --users 20
//!   staff-runner utilization --db staff.db --start 2024-05-01 --end 2024-05-31 [--user ID] [--clamped]
//!   staff-runner capacity --db staff.db --user ID --start 2024-05-01 --end 2024-05-31
//!   staff-runner summary --db staff.db --start 2024-05-01 --end 2024-05-31
//!   staff-runner recommend --db staff.db --activity ID [--skills rust,sql] [--role NAME]
//!                          [--start D --end D] [--hours H] [--exclude a,b]
//!   staff-runner suggest --db staff.db --activity ID --start D --end D --hours H
//!   staff-runner estimate --db staff.db --activity ID --hours H --team-size N
//!   staff-runner conflict --db staff.db --user ID --start D --end D
//!
//! Global flags: --config PATH (JSON engine config), --today YYYY-MM-DD.
//! A `:memory:` database (the default) is seeded with demo data first.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use staffing_core::{
    clock::{Clock, FixedClock, SystemClock},
    config::EngineConfig,
    demo_data::seed_demo_data,
    recommendation::{RecommendationCriteria, ResourceRecommender},
    store::SqliteStore,
    suggestion::ResourceSuggester,
    types::DATE_FORMAT,
    utilization::{UtilizationCalculator, UtilizationResult},
};
use std::env;

const DEFAULT_SEED: u64 = 42;
const DEFAULT_USERS: usize = 20;

#[derive(Serialize)]
struct UtilizationRow {
    #[serde(flatten)]
    result:      UtilizationResult,
    /// The figure a dashboard should show: clamped with `--clamped`, raw otherwise.
    utilization: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).ok_or_else(|| {
        anyhow!("missing command: seed, utilization, capacity, summary, recommend, suggest, estimate or conflict")
    })?;

    let db = flag(&args, "--db").unwrap_or(":memory:");
    let config = match flag(&args, "--config") {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let today = match flag(&args, "--today") {
        Some(raw) => parse_date(raw)?,
        None => SystemClock.today(),
    };
    let clock = FixedClock::new(today);

    let store = SqliteStore::open(db)?;
    store.migrate()?;

    let seed = parse_arg(&args, "--seed", DEFAULT_SEED);
    let users = parse_arg(&args, "--users", DEFAULT_USERS);
    if command == "seed" {
        let summary = seed_demo_data(&store, seed, users, today)?;
        return print_json(&summary);
    }
    if db == ":memory:" && store.user_count()? == 0 {
        log::info!("empty in-memory store, seeding demo data (seed {seed}, {users} users)");
        seed_demo_data(&store, seed, users, today)?;
    }

    match command {
        "utilization" => {
            let (start, end) = window_args(&args)?;
            let clamped = args.iter().any(|a| a == "--clamped");
            let calc = UtilizationCalculator::new(&store, &config);
            let results = match flag(&args, "--user") {
                Some(user_id) => vec![calc.calculate_user_utilization(user_id, start, end, None)?],
                None => calc.calculate_team_utilization(start, end, None)?,
            };
            let rows: Vec<UtilizationRow> = results
                .into_iter()
                .map(|result| UtilizationRow {
                    utilization: if clamped {
                        result.clamped_utilization()
                    } else {
                        result.raw_utilization()
                    },
                    result,
                })
                .collect();
            print_json(&rows)
        }
        "capacity" => {
            let user_id = required(&args, "--user")?;
            let (start, end) = window_args(&args)?;
            let weeks = UtilizationCalculator::new(&store, &config)
                .user_capacity(user_id, start, end, None)?;
            print_json(&weeks)
        }
        "summary" => {
            let (start, end) = window_args(&args)?;
            let summary = UtilizationCalculator::new(&store, &config).activity_summary(start, end)?;
            print_json(&summary)
        }
        "recommend" => {
            let mut criteria = RecommendationCriteria::for_activity(required(&args, "--activity")?);
            criteria.required_skills = list_arg(&args, "--skills");
            criteria.required_team_role = flag(&args, "--role").map(str::to_string);
            criteria.start_date = flag(&args, "--start").map(parse_date).transpose()?;
            criteria.end_date = flag(&args, "--end").map(parse_date).transpose()?;
            criteria.allocated_hours = flag(&args, "--hours").map(parse_hours).transpose()?;
            criteria.exclude_user_ids = list_arg(&args, "--exclude");
            let recs = ResourceRecommender::new(&store, &config).recommend_resources(&criteria)?;
            print_json(&recs)
        }
        "suggest" => {
            let activity_id = required(&args, "--activity")?;
            let (start, end) = window_args(&args)?;
            let hours = parse_hours(required(&args, "--hours")?)?;
            let suggestions = ResourceSuggester::new(&store, &config, &clock)
                .suggest_resources(activity_id, start, end, hours)?;
            print_json(&suggestions)
        }
        "estimate" => {
            let activity_id = required(&args, "--activity")?;
            let hours = parse_hours(required(&args, "--hours")?)?;
            let team_size = parse_arg(&args, "--team-size", 1usize);
            let estimate = ResourceSuggester::new(&store, &config, &clock)
                .estimate_start(activity_id, hours, team_size)?;
            print_json(&estimate)
        }
        "conflict" => {
            let user_id = required(&args, "--user")?;
            let (start, end) = window_args(&args)?;
            let has_conflict = ResourceSuggester::new(&store, &config, &clock)
                .check_allocation_conflict(user_id, start, end)?;
            print_json(&serde_json::json!({ "user_id": user_id, "has_conflict": has_conflict }))
        }
        other => bail!("unknown command: {other}"),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn required<'a>(args: &'a [String], name: &str) -> Result<&'a str> {
    flag(args, name).ok_or_else(|| anyhow!("missing required flag {name}"))
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], name: &str, default: T) -> T {
    flag(args, name)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn list_arg(args: &[String], name: &str) -> Vec<String> {
    flag(args, name)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .with_context(|| format!("invalid date '{raw}', expected YYYY-MM-DD"))
}

fn parse_hours(raw: &str) -> Result<f64> {
    raw.parse()
        .with_context(|| format!("invalid hours '{raw}'"))
}

fn window_args(args: &[String]) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_date(required(args, "--start")?)?;
    let end = parse_date(required(args, "--end")?)?;
    Ok((start, end))
}
