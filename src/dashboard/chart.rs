//! Chart geometry for the trend widgets.
//!
//! Both charts window the newest `window` runs and reverse them so time flows
//! left to right. Reports are stored newest-first; reversal happens here and
//! nowhere else.

use serde::Serialize;

use crate::manifest::ReportEntry;

/// Pass rates below this percentage get the warning styling on the line chart.
pub const LOW_PASS_RATE: u32 = 80;

/// SVG viewBox width of the pass-rate chart (percentage-based).
const CHART_WIDTH: f64 = 100.0;
/// SVG viewBox height of the pass-rate chart, in pixels.
const CHART_HEIGHT: f64 = 160.0;
/// Horizontal padding so endpoints don't collide with the axis labels.
const H_PADDING: f64 = 7.0;
/// Vertical padding so dots don't sit on the 0%/100% gridlines.
const V_PADDING: f64 = 4.0;

// ---------------------------------------------------------------------------
// Volume trend (stacked bars)
// ---------------------------------------------------------------------------

/// Test-volume chart data, or the explicit no-data state when every run in
/// the window reported zero tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum VolumeTrend {
    NoData,
    Bars { bars: Vec<VolumeBar> },
}

/// One stacked bar: segment heights are percentages of the window's largest
/// run, so the tallest bar fills the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeBar {
    pub run_number: u64,
    pub passed_pct: f64,
    pub failed_pct: f64,
    pub flaky_pct: f64,
    pub tooltip: String,
}

/// Stacked-bar data over the newest `window` runs, oldest first.
///
/// Returns `None` when the window holds fewer than 2 runs: a single bar is
/// not a trend. The guard applies to the windowed slice, so an undersized
/// `window` suppresses the chart too.
pub fn volume_trend(reports: &[ReportEntry], window: usize) -> Option<VolumeTrend> {
    let recent: Vec<&ReportEntry> = reports.iter().take(window).rev().collect();
    if recent.len() < 2 {
        return None;
    }

    let max_total = recent.iter().map(|r| r.stats.total).max().unwrap_or(0);

    if max_total == 0 {
        return Some(VolumeTrend::NoData);
    }

    let bars = recent
        .iter()
        .map(|report| {
            let scale = |count: u32| f64::from(count) / f64::from(max_total) * 100.0;
            VolumeBar {
                run_number: report.run_number,
                passed_pct: scale(report.stats.passed),
                failed_pct: scale(report.stats.failed),
                flaky_pct: scale(report.stats.flaky),
                tooltip: bar_tooltip(report),
            }
        })
        .collect();

    Some(VolumeTrend::Bars { bars })
}

/// "93 passed, 5 failed, 2 flaky" with zero counts elided; "0 tests" when
/// nothing ran.
fn bar_tooltip(report: &ReportEntry) -> String {
    let stats = &report.stats;
    let mut parts = Vec::new();
    if stats.passed > 0 {
        parts.push(format!("{} passed", stats.passed));
    }
    if stats.failed > 0 {
        parts.push(format!("{} failed", stats.failed));
    }
    if stats.flaky > 0 {
        parts.push(format!("{} flaky", stats.flaky));
    }
    if parts.is_empty() {
        "0 tests".to_string()
    } else {
        parts.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Pass-rate trend (line chart)
// ---------------------------------------------------------------------------

/// Line-chart data: one SVG path through all the points plus per-point
/// overlay positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassRateTrend {
    /// `M x y L x y ...` path for a `viewBox="0 0 100 160"` SVG.
    pub path: String,
    pub points: Vec<RatePoint>,
}

/// One dot on the line, positioned in percentages of the chart box so the
/// HTML overlay scales with the SVG underneath it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePoint {
    pub run_number: u64,
    pub x_pct: f64,
    pub y_pct: f64,
    /// Below the fixed alerting threshold of [`LOW_PASS_RATE`].
    pub low: bool,
    pub tooltip: String,
}

/// Line-chart data over the newest `window` runs, oldest first.
///
/// Pass rate 0-100 maps linearly onto the padded chart height, inverted
/// because screen y grows downward. `None` when the window holds fewer than
/// 2 runs, so the point-spacing division below always has a nonzero divisor.
pub fn pass_rate_trend(reports: &[ReportEntry], window: usize) -> Option<PassRateTrend> {
    let recent: Vec<&ReportEntry> = reports.iter().take(window).rev().collect();
    if recent.len() < 2 {
        return None;
    }

    let usable_width = CHART_WIDTH - 2.0 * H_PADDING;
    let usable_height = CHART_HEIGHT - 2.0 * V_PADDING;
    let spacing = usable_width / (recent.len() - 1) as f64;

    let mut path = String::new();
    let mut points = Vec::with_capacity(recent.len());

    for (index, report) in recent.iter().enumerate() {
        let rate = report.stats.pass_rate;
        let x = H_PADDING + index as f64 * spacing;
        let y = V_PADDING + usable_height - f64::from(rate) * usable_height / 100.0;

        let command = if index == 0 { "M" } else { " L" };
        path.push_str(&format!("{command} {} {}", coord(x), coord(y)));

        points.push(RatePoint {
            run_number: report.run_number,
            x_pct: x,
            y_pct: y / CHART_HEIGHT * 100.0,
            low: rate < LOW_PASS_RATE,
            tooltip: format!(
                "Run #{}: {}% ({}/{})",
                report.run_number, rate, report.stats.passed, report.stats.total
            ),
        });
    }

    Some(PassRateTrend { path, points })
}

/// Round a coordinate to 2 decimals and drop the trailing zeros, keeping the
/// path string diff-friendly.
fn coord(value: f64) -> String {
    let mut s = format!("{value:.2}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
