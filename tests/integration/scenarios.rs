//! Recorded walk scenarios
//!
//! Each `.toml` file in `tests/integration/scenarios/` is a replayable walk
//! trace plus an `[expect]` table:
//!
//! ```toml
//! destination = "-6.2088, 106.8456"
//!
//! [[positions]]
//! latitude = -6.2000
//! longitude = 106.8000
//!
//! [expect]
//! final_status = "arrived"
//! arrivals = 1
//! spoken = ["destination reached"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use disha_nav::WalkTrace;

use crate::harness::TestHarness;

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    expect: Expectations,
}

#[derive(Debug, Deserialize)]
struct Expectations {
    /// Status badge after the last sample
    final_status: String,
    /// Times "destination reached" is spoken
    #[serde(default)]
    arrivals: usize,
    /// Messages that must each be spoken at least once
    #[serde(default)]
    spoken: Vec<String>,
}

fn scenario_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/integration/scenarios")
        .join(format!("{}.toml", name))
}

fn run_scenario(path: &Path) {
    println!("\n--- Running scenario: {:?} ---", path.file_stem().unwrap());

    let trace = WalkTrace::load(path).unwrap();
    let content = std::fs::read_to_string(path).unwrap();
    let expect = toml::from_str::<ScenarioFile>(&content).unwrap().expect;

    let harness = TestHarness::new();
    harness.go_to(&trace.destination).unwrap();
    for position in &trace.positions {
        harness.walk(*position);
    }

    let spoken = harness.spoken();
    for line in &spoken {
        println!("  {}", line);
    }

    let state = harness.coordinator.snapshot();
    let status = serde_json::to_value(state.status).unwrap();
    assert_eq!(status, expect.final_status.as_str(), "final status");

    let arrivals = spoken
        .iter()
        .filter(|s| s.as_str() == "destination reached")
        .count();
    assert_eq!(arrivals, expect.arrivals, "arrival announcements");

    for message in &expect.spoken {
        assert!(spoken.contains(message), "missing spoken message {:?}", message);
    }
}

#[test]
fn test_walk_to_monas() {
    run_scenario(&scenario_path("walk_to_monas"));
}

#[test]
fn test_jitter_at_destination() {
    run_scenario(&scenario_path("jitter_at_destination"));
}

#[test]
fn test_leave_and_return() {
    run_scenario(&scenario_path("leave_and_return"));
}

#[test]
fn test_bad_samples() {
    run_scenario(&scenario_path("bad_samples"));
}

#[test]
fn test_all_scenarios_parse() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/integration/scenarios");
    let mut count = 0;
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "toml") {
            WalkTrace::load(&path).unwrap();
            count += 1;
        }
    }
    assert!(count >= 4);
}
