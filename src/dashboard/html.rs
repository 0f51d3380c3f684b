//! Static page assembly.
//!
//! Flattens the view models into one template context and renders the full
//! dashboard HTML. A missing manifest renders the same page in its
//! placeholder state.

use anyhow::{Context, Result};
use askama::Template;

use crate::config::Config;
use crate::manifest::Manifest;

use super::chart::{self, PassRateTrend, VolumeBar, VolumeTrend};
use super::view::{self, HeaderStats, ReportRow};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardPage {
    title: String,
    header: HeaderStats,
    rows: Vec<ReportRow>,
    /// Bars to draw; empty when the chart is suppressed.
    volume_bars: Vec<VolumeBar>,
    /// Placeholder text shown instead of bars when the window has no volume.
    volume_placeholder: Option<String>,
    rate: Option<PassRateTrend>,
    updated_at: Option<String>,
}

/// Render the dashboard page for `manifest`; `None` renders the placeholder
/// state shown before the first run or when the fetch failed.
pub fn render_page(config: &Config, manifest: Option<&Manifest>) -> Result<String> {
    let empty = Manifest::default();
    let manifest = manifest.unwrap_or(&empty);

    let header = view::header_stats(manifest.latest.as_ref());
    let rows = view::report_list(
        &manifest.reports,
        config.dashboard.list_limit,
        config.site.report_base_url.as_deref(),
    );

    let (volume_bars, volume_placeholder) =
        match chart::volume_trend(&manifest.reports, config.dashboard.trend_window) {
            Some(VolumeTrend::Bars { bars }) => (bars, None),
            Some(VolumeTrend::NoData) => (Vec::new(), Some("No test volume data yet".to_string())),
            None => (Vec::new(), None),
        };

    let rate = chart::pass_rate_trend(&manifest.reports, config.dashboard.trend_window);

    let page = DashboardPage {
        title: config.site.title.clone(),
        header,
        rows,
        volume_bars,
        volume_placeholder,
        rate,
        updated_at: manifest.updated_at.map(|t| t.format("%b %-d, %Y %H:%M UTC").to_string()),
    };

    page.render().context("failed to render dashboard template")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CiContext;
    use crate::manifest::{ReportEntry, RunStats};

    fn manifest_with_runs(rates: &[(u64, u32, u32)]) -> Manifest {
        let mut manifest = Manifest::default();
        for &(run_number, total, failed) in rates {
            let ctx = CiContext {
                run_number,
                run_id: "local".to_string(),
                commit_sha: "unknown".to_string(),
            };
            let passed = total - failed;
            manifest.append(ReportEntry::new(
                RunStats {
                    total,
                    passed,
                    failed,
                    flaky: 0,
                    skipped: 0,
                    duration_secs: 45,
                    pass_rate: if total > 0 { passed * 100 / total } else { 0 },
                },
                &ctx,
            ));
        }
        manifest
    }

    #[test]
    fn test_placeholder_page_without_manifest() {
        let html = render_page(&Config::default(), None).unwrap();

        assert!(html.contains("Not yet run"));
        assert!(html.contains("Pending"));
        assert!(html.contains("No reports yet"));
        assert!(!html.contains("class=\"rate-point"));
        assert!(!html.contains("<svg"));
        // The Pending card is uncolored, not styled as a failure.
        assert!(!html.contains("stat-value failing"));
        assert!(!html.contains("stat-value passing"));
    }

    #[test]
    fn test_report_base_url_prefixes_links() {
        let mut config = Config::default();
        config.site.report_base_url = Some("https://ci.example.com/toolshop".to_string());

        let manifest = manifest_with_runs(&[(7, 10, 0)]);
        let html = render_page(&config, Some(&manifest)).unwrap();

        assert!(html.contains("href=\"https://ci.example.com/toolshop/reports/run-7/\""));
    }

    #[test]
    fn test_page_with_history_renders_all_widgets() {
        let manifest = manifest_with_runs(&[(1, 100, 0), (2, 100, 5)]);
        let html = render_page(&Config::default(), Some(&manifest)).unwrap();

        assert!(html.contains("Run #2"));
        assert!(html.contains("✗ 5 Failed"));
        assert!(html.contains("stat-value failing"));
        assert!(html.contains("class=\"bar-segment bar-passed\""));
        assert!(html.contains("<svg class=\"pass-rate-svg\""));
        assert!(html.contains("95/100 passed"));
    }

    #[test]
    fn test_single_run_suppresses_charts() {
        let manifest = manifest_with_runs(&[(1, 100, 0)]);
        let html = render_page(&Config::default(), Some(&manifest)).unwrap();

        assert!(html.contains("Run #1"));
        assert!(!html.contains("class=\"trend-bar\""));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_zero_volume_window_shows_placeholder() {
        let manifest = manifest_with_runs(&[(1, 0, 0), (2, 0, 0)]);
        let html = render_page(&Config::default(), Some(&manifest)).unwrap();

        assert!(html.contains("No test volume data yet"));
        assert!(!html.contains("class=\"bar-segment"));
    }

    #[test]
    fn test_low_pass_rate_gets_warning_class() {
        let manifest = manifest_with_runs(&[(1, 100, 0), (2, 100, 30)]);
        let html = render_page(&Config::default(), Some(&manifest)).unwrap();

        assert!(html.contains("rate-point low"));
    }
}
