//! Manifest persistence -- tolerant load, atomic pretty-printed save.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::Manifest;

impl Manifest {
    /// Load the manifest at `path`.
    ///
    /// A missing file is the normal first-run case and yields an empty
    /// history silently; a corrupt or unreadable file does the same with a
    /// warning. The builder never aborts over old state -- the next save
    /// overwrites whatever was there.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "could not read manifest, starting fresh");
                }
                return Self::default();
            }
        };

        match serde_json::from_str(&text) {
            Ok(manifest) => manifest,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "manifest is corrupt, starting fresh");
                Self::default()
            }
        }
    }

    /// Write the manifest to `path` as pretty-printed JSON, creating parent
    /// directories as needed.
    ///
    /// The write goes through a temp file and rename so a reader never sees
    /// a partial manifest. Failure here is fatal to the caller: persisting
    /// history is the whole point of the builder.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }

        let json = serde_json::to_string_pretty(self).context("failed to serialize manifest")?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes())
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("failed to move manifest into place at {}", path.display()))?;

        info!(path = %path.display(), reports = self.reports.len(), "manifest written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Manifest, ReportEntry, RunStats};
    use crate::config::CiContext;

    fn sample_entry(run_number: u64) -> ReportEntry {
        let ctx = CiContext {
            run_number,
            run_id: "local".to_string(),
            commit_sha: "unknown".to_string(),
        };
        ReportEntry::new(
            RunStats {
                total: 10,
                passed: 10,
                failed: 0,
                flaky: 0,
                skipped: 0,
                duration_secs: 5,
                pass_rate: 100,
            },
            &ctx,
        )
    }

    #[test]
    fn test_load_missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::load(&dir.path().join("reports/manifest.json"));
        assert!(manifest.reports.is_empty());
        assert!(manifest.latest.is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let manifest = Manifest::load(&path);
        assert!(manifest.reports.is_empty());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deploy/reports/manifest.json");

        let mut manifest = Manifest::default();
        manifest.append(sample_entry(4));
        manifest.save(&path).unwrap();

        // Temp file must not be left behind.
        assert!(!dir.path().join("deploy/reports/manifest.json.tmp").exists());

        let reloaded = Manifest::load(&path);
        assert_eq!(reloaded.reports.len(), 1);
        assert_eq!(reloaded.reports[0].run_number, 4);
        assert_eq!(reloaded.latest.unwrap().run_number, 4);
    }

    #[test]
    fn test_save_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");

        let mut manifest = Manifest::default();
        manifest.append(sample_entry(1));
        manifest.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"reports\""), "expected indented JSON, got: {text}");
    }
}
