//! Header cards and the recent-report list.

use serde::Serialize;

use crate::manifest::ReportEntry;

/// Styling of the status card: green for a clean run, red for failures,
/// uncolored before the first run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusTone {
    Passing,
    Failing,
    Neutral,
}

impl StatusTone {
    /// CSS class added to the status card; empty for the neutral state.
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusTone::Passing => "passing",
            StatusTone::Failing => "failing",
            StatusTone::Neutral => "",
        }
    }
}

/// The three stat cards at the top of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderStats {
    pub total_tests: String,
    pub last_run_label: String,
    pub status_label: String,
    pub tone: StatusTone,
}

/// Derive the header cards from the newest run, or the placeholder state
/// when no run has been recorded yet.
pub fn header_stats(latest: Option<&ReportEntry>) -> HeaderStats {
    let Some(latest) = latest else {
        return HeaderStats {
            total_tests: "--".to_string(),
            last_run_label: "Not yet run".to_string(),
            status_label: "Pending".to_string(),
            tone: StatusTone::Neutral,
        };
    };

    let passing = latest.stats.failed == 0;
    HeaderStats {
        total_tests: latest.stats.total.to_string(),
        last_run_label: format!("{} {}", latest.date, latest.time),
        status_label: if passing {
            "✓ Passing".to_string()
        } else {
            format!("✗ {} Failed", latest.stats.failed)
        },
        tone: if passing {
            StatusTone::Passing
        } else {
            StatusTone::Failing
        },
    }
}

/// One row of the recent-report list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub run_number: u64,
    pub date: String,
    pub time: String,
    pub url: String,
    pub passed: u32,
    pub total: u32,
    /// Shown in the row meta only when nonzero.
    pub flaky: u32,
    pub status_label: String,
    pub passed_all: bool,
}

/// The first `limit` entries as list rows. Reports are stored newest-first
/// and the list keeps that order; nothing is re-sorted.
///
/// `base_url` prefixes the per-run report links when the page is hosted
/// somewhere other than the deploy root; `None` keeps them relative.
pub fn report_list(reports: &[ReportEntry], limit: usize, base_url: Option<&str>) -> Vec<ReportRow> {
    reports
        .iter()
        .take(limit)
        .map(|report| {
            let passed_all = report.stats.failed == 0;
            ReportRow {
                run_number: report.run_number,
                date: report.date.clone(),
                time: report.time.clone(),
                url: report_url(&report.url, base_url),
                passed: report.stats.passed,
                total: report.stats.total,
                flaky: report.stats.flaky,
                status_label: if passed_all { "Passed" } else { "Failed" }.to_string(),
                passed_all,
            }
        })
        .collect()
}

fn report_url(relative: &str, base_url: Option<&str>) -> String {
    match base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), relative),
        None => relative.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CiContext;
    use crate::manifest::RunStats;

    fn entry(run_number: u64, total: u32, failed: u32, flaky: u32) -> ReportEntry {
        let ctx = CiContext {
            run_number,
            run_id: "local".to_string(),
            commit_sha: "unknown".to_string(),
        };
        let passed = total - failed - flaky;
        ReportEntry::new(
            RunStats {
                total,
                passed,
                failed,
                flaky,
                skipped: 0,
                duration_secs: 30,
                pass_rate: if total > 0 { passed * 100 / total } else { 0 },
            },
            &ctx,
        )
    }

    #[test]
    fn test_header_placeholder_when_no_runs() {
        let header = header_stats(None);

        assert_eq!(header.total_tests, "--");
        assert_eq!(header.last_run_label, "Not yet run");
        assert_eq!(header.status_label, "Pending");
        // Pending is neither passing nor failing; the card stays uncolored.
        assert_eq!(header.tone, StatusTone::Neutral);
        assert_eq!(header.tone.css_class(), "");
    }

    #[test]
    fn test_header_passing_run() {
        let latest = entry(12, 100, 0, 2);
        let header = header_stats(Some(&latest));

        assert_eq!(header.total_tests, "100");
        assert_eq!(header.status_label, "✓ Passing");
        assert_eq!(header.tone, StatusTone::Passing);
        assert_eq!(
            header.last_run_label,
            format!("{} {}", latest.date, latest.time)
        );
    }

    #[test]
    fn test_header_failing_run_counts_failures() {
        let latest = entry(13, 100, 4, 0);
        let header = header_stats(Some(&latest));

        assert_eq!(header.status_label, "✗ 4 Failed");
        assert_eq!(header.tone, StatusTone::Failing);
    }

    #[test]
    fn test_report_list_takes_first_entries_in_order() {
        let reports: Vec<_> = (1..=8).rev().map(|n| entry(n, 10, 0, 0)).collect();
        let rows = report_list(&reports, 5, None);

        assert_eq!(rows.len(), 5);
        let run_numbers: Vec<_> = rows.iter().map(|r| r.run_number).collect();
        assert_eq!(run_numbers, vec![8, 7, 6, 5, 4]);
    }

    #[test]
    fn test_report_list_shorter_than_limit() {
        let reports = vec![entry(2, 10, 1, 0), entry(1, 10, 0, 0)];
        let rows = report_list(&reports, 5, None);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].status_label, "Failed");
        assert!(!rows[0].passed_all);
        assert_eq!(rows[1].status_label, "Passed");
    }

    #[test]
    fn test_report_row_carries_flaky_count() {
        let reports = vec![entry(5, 50, 0, 3)];
        let rows = report_list(&reports, 5, None);

        assert_eq!(rows[0].flaky, 3);
        assert_eq!(rows[0].passed, 47);
        assert_eq!(rows[0].total, 50);
        assert_eq!(rows[0].url, "reports/run-5/");
    }

    #[test]
    fn test_report_links_prefixed_with_base_url() {
        let reports = vec![entry(5, 50, 0, 0)];

        let rows = report_list(&reports, 5, Some("https://ci.example.com/toolshop"));
        assert_eq!(rows[0].url, "https://ci.example.com/toolshop/reports/run-5/");

        // A trailing slash on the base must not double up.
        let rows = report_list(&reports, 5, Some("https://ci.example.com/toolshop/"));
        assert_eq!(rows[0].url, "https://ci.example.com/toolshop/reports/run-5/");
    }
}
