use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, Utc};

use crate::core::errors::{BackupError, Result};

/// Removes aged backup archives from a local directory.
///
/// Meant to run on the receiving host, where uploaded copies pile up.
pub struct SweepService {
    extensions: Vec<String>,
    threshold: DateTime<Local>,
    dry_run: bool,
}

/// Files matched (and, unless dry-running, deleted) by a sweep.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub dry_run: bool,
}

impl SweepService {
    /// Sweep files older than `days_old` days from now.
    ///
    /// Extensions are compared case-insensitively and may be given with
    /// or without the leading dot. An empty list matches every file.
    pub fn new(extensions: &[String], days_old: u32, dry_run: bool) -> Self {
        let threshold = Local::now()
            .checked_sub_signed(Duration::days(i64::from(days_old)))
            .unwrap_or_else(|| DateTime::<Utc>::MIN_UTC.with_timezone(&Local));
        Self::with_threshold(extensions, threshold, dry_run)
    }

    /// Sweep files created before `threshold`.
    pub fn with_threshold(extensions: &[String], threshold: DateTime<Local>, dry_run: bool) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            extensions,
            threshold,
            dry_run,
        }
    }

    /// Whether `path` is a regular file that matches the filter and is
    /// older than the threshold.
    pub fn should_delete(&self, path: &Path) -> bool {
        let Ok(meta) = std::fs::metadata(path) else {
            return false;
        };
        if !meta.is_file() {
            return false;
        }

        if !self.extensions.is_empty() {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            if !self.extensions.contains(&ext) {
                return false;
            }
        }

        // Creation time is not available on every filesystem.
        let Some(created) = meta.created().or_else(|_| meta.modified()).ok() else {
            return false;
        };
        DateTime::<Local>::from(created) < self.threshold
    }

    /// Sweep the top level of `dir`. Subdirectories are not entered.
    pub fn sweep(&self, dir: &Path) -> Result<SweepReport> {
        if !dir.is_dir() {
            return Err(BackupError::DirectoryNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| self.should_delete(p))
            .collect();
        candidates.sort();

        let mut report = SweepReport {
            dry_run: self.dry_run,
            ..Default::default()
        };
        for path in candidates {
            if self.dry_run {
                report.deleted.push(path);
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => report.deleted.push(path),
                Err(e) => report.failed.push((path, e.to_string())),
            }
        }
        Ok(report)
    }
}
