//! Raw test-result ingestion.
//!
//! Parses the JSON report emitted by Playwright-style runners: an aggregate
//! `stats` block plus a tree of suites/specs/tests/attempts. Only the fields
//! the manifest needs are modeled; everything else in the report is ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::manifest::RunStats;

/// Top-level JSON report produced by one test run.
#[derive(Debug, Default, Deserialize)]
pub struct RawResults {
    #[serde(default)]
    pub stats: RawStats,
    #[serde(default)]
    pub suites: Vec<SuiteNode>,
}

/// Aggregate counters from the reporter.
///
/// `expected` is the active pool: tests that were supposed to pass. Skipped
/// tests sit outside it, which is why `passed + failed + flaky == total`.
#[derive(Debug, Default, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub expected: u32,
    #[serde(default)]
    pub unexpected: u32,
    #[serde(default)]
    pub flaky: u32,
    #[serde(default)]
    pub skipped: u32,
    /// Pre-aggregated wall-clock duration in milliseconds, when the reporter
    /// provides one.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// A suite node: holds specs and arbitrarily nested child suites.
#[derive(Debug, Default, Deserialize)]
pub struct SuiteNode {
    #[serde(default)]
    pub specs: Vec<SpecNode>,
    #[serde(default)]
    pub suites: Vec<SuiteNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpecNode {
    #[serde(default)]
    pub tests: Vec<TestNode>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TestNode {
    #[serde(default)]
    pub results: Vec<AttemptNode>,
}

/// One attempt of one test; retries show up as extra attempts.
#[derive(Debug, Default, Deserialize)]
pub struct AttemptNode {
    #[serde(default)]
    pub duration: f64,
}

/// Normalize a raw report into the fixed stats shape the manifest stores.
pub fn extract_stats(raw: &RawResults) -> RunStats {
    let total = raw.stats.expected;
    let failed = raw.stats.unexpected;
    let flaky = raw.stats.flaky;
    // A reporter claiming more failures than expected tests would otherwise
    // underflow; clamp at zero instead.
    let passed = total.saturating_sub(failed).saturating_sub(flaky);

    let duration_ms = match raw.stats.duration {
        Some(ms) => ms,
        None => sum_durations(&raw.suites),
    };

    let pass_rate = if total > 0 {
        (f64::from(passed) * 100.0 / f64::from(total)).round() as u32
    } else {
        0
    };

    RunStats {
        total,
        passed,
        failed,
        flaky,
        skipped: raw.stats.skipped,
        duration_secs: (duration_ms / 1000.0).round() as u64,
        pass_rate,
    }
}

/// Sum every attempt duration in the suite tree, in milliseconds.
fn sum_durations(suites: &[SuiteNode]) -> f64 {
    let mut total_ms = 0.0;
    for suite in suites {
        for spec in &suite.specs {
            for test in &spec.tests {
                for attempt in &test.results {
                    total_ms += attempt.duration;
                }
            }
        }
        total_ms += sum_durations(&suite.suites);
    }
    total_ms
}

/// Read and parse the results file at `path`.
///
/// Absence or corruption is recoverable: a CI run that died before writing
/// results still gets a zeroed history entry, so the run sequence stays
/// visible on the dashboard. The degradation is logged, never propagated.
pub fn load_results(path: &Path) -> RawResults {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "no results file, recording a zeroed run");
            return RawResults::default();
        }
    };

    match serde_json::from_str(&text) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "results file is not valid JSON, recording a zeroed run");
            RawResults::default()
        }
    }
}
