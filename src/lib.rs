//! runboard -- CI test-run history dashboard.
//!
//! This crate provides the core library for turning raw JSON test-run
//! results into a bounded rolling history manifest and rendering that
//! history as a static dashboard page.

pub mod config;
pub mod dashboard;
pub mod ingest;
pub mod manifest;
pub mod server;

use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::{CiContext, Config};
use crate::dashboard::source::ManifestSource;
use crate::manifest::{Manifest, ReportEntry, RunStats};

/// Outcome of one ingest, for the caller's console summary.
pub struct IngestSummary {
    pub run_number: u64,
    pub stats: RunStats,
    pub report_count: usize,
    /// Run number and date of each entry dropped past the cap.
    pub evicted: Vec<(u64, String)>,
}

/// Ingest one run: read the raw results at `results_path`, merge a new entry
/// into the manifest under `out_dir`, and persist it.
///
/// Missing or corrupt results degrade to a zeroed entry so the history stays
/// contiguous; only the final write can fail.
pub fn ingest_run(results_path: &Path, out_dir: &Path, ctx: &CiContext) -> Result<IngestSummary> {
    let raw = ingest::load_results(results_path);
    let stats = ingest::extract_stats(&raw);

    let manifest_path = out_dir.join("reports").join("manifest.json");
    let mut manifest = Manifest::load(&manifest_path);

    let entry = ReportEntry::new(stats.clone(), ctx);
    let evicted = manifest.append(entry);

    if !evicted.is_empty() {
        info!(count = evicted.len(), "evicted old reports from manifest");
    }

    manifest.save(&manifest_path)?;

    Ok(IngestSummary {
        run_number: ctx.run_number,
        stats,
        report_count: manifest.reports.len(),
        evicted: evicted
            .into_iter()
            .map(|e| (e.run_number, e.date))
            .collect(),
    })
}

/// Render the dashboard page from `source` into `out_dir/index.html`.
///
/// A failed fetch is the pre-first-run state: the placeholder page is
/// written and the failure is logged, never propagated.
pub async fn render_dashboard(
    source: &dyn ManifestSource,
    config: &Config,
    out_dir: &Path,
) -> Result<()> {
    let manifest = match source.fetch().await {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!(error = %e, "no manifest available yet, rendering placeholder page");
            None
        }
    };

    let html = dashboard::html::render_page(config, manifest.as_ref())?;

    std::fs::create_dir_all(out_dir)?;
    let index_path = out_dir.join("index.html");
    std::fs::write(&index_path, html)?;

    info!(path = %index_path.display(), "dashboard written");
    Ok(())
}
