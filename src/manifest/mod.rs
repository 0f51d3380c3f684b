//! Run manifest -- the bounded rolling history of test runs.
//!
//! The manifest stores entries newest-first; insertion order is the display
//! order, and the cap is enforced by evicting from the tail on every append.

pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CiContext;

/// Maximum number of runs kept in the manifest. Anything older falls off the
/// tail when a new run is appended.
pub const MAX_REPORTS: usize = 15;

/// Normalized statistics for one test run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub flaky: u32,
    pub skipped: u32,
    /// Whole seconds, rounded from the reporter's milliseconds.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    /// Integer percent of `total` that passed; 0 when there were no tests.
    pub pass_rate: u32,
}

/// One run's entry in the manifest. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    /// CI run number: monotonic across runs but not necessarily contiguous.
    pub run_number: u64,
    pub run_id: String,
    /// Short commit hash, `"unknown"` outside CI.
    #[serde(alias = "sha")]
    pub commit_sha: String,
    pub timestamp: DateTime<Utc>,
    /// Display date derived from `timestamp`, e.g. "Aug 23, 2026".
    pub date: String,
    /// Display time derived from `timestamp`, e.g. "08:12 PM".
    pub time: String,
    /// Relative link to the full report for this run.
    pub url: String,
    pub stats: RunStats,
}

impl ReportEntry {
    /// Stamp a new entry for `stats` at the current wall-clock time.
    pub fn new(stats: RunStats, ctx: &CiContext) -> Self {
        Self::at(stats, ctx, Utc::now())
    }

    /// Entry stamped at an explicit instant. Tests pin the clock here.
    pub fn at(stats: RunStats, ctx: &CiContext, now: DateTime<Utc>) -> Self {
        Self {
            run_number: ctx.run_number,
            run_id: ctx.run_id.clone(),
            commit_sha: ctx.commit_sha.clone(),
            timestamp: now,
            date: now.format("%b %-d, %Y").to_string(),
            time: now.format("%I:%M %p").to_string(),
            url: format!("reports/run-{}/", ctx.run_number),
            stats,
        }
    }
}

/// Run-over-run deltas between the newest entry and the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub pass_rate: i64,
    pub total: i64,
}

/// The rolling history plus its derived summary fields.
///
/// Serialized field names stay camelCase so manifests written by the older
/// JS tooling load unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub reports: Vec<ReportEntry>,
    /// Always the same entry as `reports[0]` once a run has been recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<ReportEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trends: Option<Trends>,
}

impl Manifest {
    /// Prepend `entry` as the newest run, evict anything beyond
    /// [`MAX_REPORTS`], and refresh `latest`, `updated_at` and `trends`.
    ///
    /// Returns the evicted entries (oldest last) so the caller can log them
    /// and clean up their report directories.
    pub fn append(&mut self, entry: ReportEntry) -> Vec<ReportEntry> {
        self.reports.insert(0, entry.clone());

        let evicted = if self.reports.len() > MAX_REPORTS {
            self.reports.split_off(MAX_REPORTS)
        } else {
            Vec::new()
        };

        self.latest = Some(entry);
        self.updated_at = Some(Utc::now());
        self.trends = self.compute_trends();

        evicted
    }

    /// Deltas between the two newest runs; `None` until two runs exist.
    fn compute_trends(&self) -> Option<Trends> {
        let newest = self.reports.first()?;
        let previous = self.reports.get(1)?;
        Some(Trends {
            pass_rate: i64::from(newest.stats.pass_rate) - i64::from(previous.stats.pass_rate),
            total: i64::from(newest.stats.total) - i64::from(previous.stats.total),
        })
    }
}
