use std::path::Path;

use chrono::{Local, NaiveDateTime};

use crate::core::models::backup_target::BackupTarget;
use crate::core::models::outcome::{UploadOutcome, UploadStatus};
use crate::core::services::remote_path::derive_remote_path;
use crate::core::traits::channel::SecureChannel;

/// Options that change how targets are processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip targets whose derived remote path already exists.
    pub skip_existing: bool,
}

/// Uploads every configured target through one shared channel.
///
/// Per-target problems never abort the batch: they become the target's
/// outcome and processing moves on to the next target.
pub struct BackupService {
    options: RunOptions,
    clock: fn() -> NaiveDateTime,
}

impl BackupService {
    /// Service using local wall-clock time for remote file names.
    pub fn new(options: RunOptions) -> Self {
        Self::with_clock(options, local_now)
    }

    /// Service with an injected clock.
    pub fn with_clock(options: RunOptions, clock: fn() -> NaiveDateTime) -> Self {
        Self { options, clock }
    }

    /// Process all targets in declaration order.
    ///
    /// Returns exactly one outcome per target, in the same order.
    #[cfg(test)]
    pub fn run(
        &self,
        channel: &mut dyn SecureChannel,
        targets: &[BackupTarget],
    ) -> Vec<UploadOutcome> {
        self.run_with(channel, targets, |_| {})
    }

    /// Process all targets in declaration order, calling `observe` with
    /// each outcome as soon as it is known.
    ///
    /// Returns exactly one outcome per target, in the same order.
    pub fn run_with<F>(
        &self,
        channel: &mut dyn SecureChannel,
        targets: &[BackupTarget],
        mut observe: F,
    ) -> Vec<UploadOutcome>
    where
        F: FnMut(&UploadOutcome),
    {
        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            let outcome = self.process(channel, target);
            observe(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    fn process(&self, channel: &mut dyn SecureChannel, target: &BackupTarget) -> UploadOutcome {
        let outcome = |remote_path: Option<String>, status: UploadStatus| UploadOutcome {
            target: target.name.clone(),
            local_path: target.local_path.clone(),
            remote_path,
            status,
        };

        if !is_regular_file(&target.local_path) {
            return outcome(None, UploadStatus::SkippedMissingLocal);
        }

        // Each target reads the clock itself; no batch-wide timestamp.
        let remote_path = derive_remote_path(&target.remote_path, (self.clock)());

        if self.options.skip_existing && channel.exists(&remote_path) {
            return outcome(Some(remote_path), UploadStatus::SkippedRemoteExists);
        }

        let status = match channel.upload(&target.local_path, &remote_path) {
            Ok(receipt) => UploadStatus::Succeeded(receipt),
            Err(e) => UploadStatus::Failed(e.to_string()),
        };
        outcome(Some(remote_path), status)
    }
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::{BackupError, Result};
    use crate::core::models::outcome::TransferReceipt;
    use chrono::NaiveDate;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Stub channel recording every upload; fails uploads whose local
    /// file name is listed in `fail_on`.
    #[derive(Default)]
    struct StubChannel {
        uploads: Vec<(PathBuf, String)>,
        fail_on: HashSet<String>,
        existing: HashSet<String>,
    }

    impl SecureChannel for StubChannel {
        fn exists(&self, remote_path: &str) -> bool {
            self.existing.contains(remote_path)
        }

        fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<TransferReceipt> {
            self.uploads
                .push((local_path.to_path_buf(), remote_path.to_string()));
            let name = local_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if self.fail_on.contains(&name) {
                return Err(BackupError::Transfer {
                    remote_path: remote_path.to_string(),
                    reason: "permission denied".into(),
                });
            }
            Ok(TransferReceipt {
                bytes: 3,
                sha256: "stub".into(),
            })
        }

        fn close(&mut self) {}
    }

    fn fixed_clock() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 22)
            .unwrap()
            .and_hms_opt(10, 15, 30)
            .unwrap()
    }

    fn service() -> BackupService {
        BackupService::with_clock(RunOptions::default(), fixed_clock)
    }

    fn target(name: &str, remote: &str, local: PathBuf) -> BackupTarget {
        BackupTarget {
            name: name.into(),
            remote_path: remote.into(),
            local_path: local,
        }
    }

    fn local_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"abc").unwrap();
        path
    }

    #[test]
    fn uploads_present_file_to_derived_path() {
        let dir = TempDir::new().unwrap();
        let local = local_file(&dir, "db.sql");
        let mut channel = StubChannel::default();

        let outcomes = service().run(&mut channel, &[target("db", "/backups/db", local.clone())]);

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].status.is_success());
        assert_eq!(
            outcomes[0].remote_path.as_deref(),
            Some("/backups/db_20250322_101530.zip")
        );
        assert_eq!(
            channel.uploads,
            vec![(local, "/backups/db_20250322_101530.zip".to_string())]
        );
    }

    #[test]
    fn missing_local_is_skipped_without_upload() {
        let dir = TempDir::new().unwrap();
        let present = local_file(&dir, "www.tar");
        let missing = dir.path().join("gone.sql");
        let mut channel = StubChannel::default();

        let outcomes = service().run(
            &mut channel,
            &[
                target("db", "/backups/db", missing),
                target("www", "/backups/www", present),
            ],
        );

        assert_eq!(outcomes[0].status, UploadStatus::SkippedMissingLocal);
        assert!(outcomes[0].remote_path.is_none());
        assert!(outcomes[1].status.is_success());
        assert_eq!(channel.uploads.len(), 1);
    }

    #[test]
    fn directory_is_not_a_regular_file() {
        let dir = TempDir::new().unwrap();
        let mut channel = StubChannel::default();

        let outcomes = service().run(
            &mut channel,
            &[target("dir", "/backups/dir", dir.path().to_path_buf())],
        );

        assert_eq!(outcomes[0].status, UploadStatus::SkippedMissingLocal);
        assert!(channel.uploads.is_empty());
    }

    #[test]
    fn failed_upload_does_not_stop_later_targets() {
        let dir = TempDir::new().unwrap();
        let first = local_file(&dir, "first.sql");
        let second = local_file(&dir, "second.sql");
        let mut channel = StubChannel {
            fail_on: HashSet::from(["first.sql".to_string()]),
            ..Default::default()
        };

        let outcomes = service().run(
            &mut channel,
            &[
                target("first", "/backups/first", first),
                target("second", "/backups/second", second),
            ],
        );

        assert!(matches!(&outcomes[0].status, UploadStatus::Failed(r) if r.contains("permission denied")));
        assert!(outcomes[1].status.is_success());
        assert_eq!(channel.uploads.len(), 2);
    }

    #[test]
    fn one_outcome_per_target_in_order() {
        let dir = TempDir::new().unwrap();
        let targets: Vec<BackupTarget> = (0..5)
            .map(|i| {
                let local = if i % 2 == 0 {
                    local_file(&dir, &format!("f{i}.dat"))
                } else {
                    dir.path().join(format!("missing{i}.dat"))
                };
                target(&format!("t{i}"), &format!("/backups/t{i}"), local)
            })
            .collect();
        let mut channel = StubChannel {
            fail_on: HashSet::from(["f2.dat".to_string()]),
            ..Default::default()
        };

        let outcomes = service().run(&mut channel, &targets);

        let names: Vec<&str> = outcomes.iter().map(|o| o.target.as_str()).collect();
        assert_eq!(names, vec!["t0", "t1", "t2", "t3", "t4"]);
    }

    #[test]
    fn empty_target_list_yields_no_outcomes() {
        let mut channel = StubChannel::default();
        assert!(service().run(&mut channel, &[]).is_empty());
    }

    #[test]
    fn skip_existing_checks_remote_first() {
        let dir = TempDir::new().unwrap();
        let local = local_file(&dir, "db.sql");
        let mut channel = StubChannel {
            existing: HashSet::from(["/backups/db_20250322_101530.zip".to_string()]),
            ..Default::default()
        };
        let svc = BackupService::with_clock(
            RunOptions {
                skip_existing: true,
            },
            fixed_clock,
        );

        let outcomes = svc.run(&mut channel, &[target("db", "/backups/db", local)]);

        assert_eq!(outcomes[0].status, UploadStatus::SkippedRemoteExists);
        assert!(channel.uploads.is_empty());
    }

    #[test]
    fn existing_remote_is_overwritten_by_default() {
        let dir = TempDir::new().unwrap();
        let local = local_file(&dir, "db.sql");
        let mut channel = StubChannel {
            existing: HashSet::from(["/backups/db_20250322_101530.zip".to_string()]),
            ..Default::default()
        };

        let outcomes = service().run(&mut channel, &[target("db", "/backups/db", local)]);

        assert!(outcomes[0].status.is_success());
        assert_eq!(channel.uploads.len(), 1);
    }

    #[test]
    fn observer_sees_every_outcome_in_order() {
        let dir = TempDir::new().unwrap();
        let local = local_file(&dir, "a.sql");
        let mut channel = StubChannel::default();
        let mut seen = Vec::new();

        let outcomes = service().run_with(
            &mut channel,
            &[
                target("a", "/backups/a", local),
                target("b", "/backups/b", dir.path().join("b.sql")),
            ],
            |o| seen.push(o.target.clone()),
        );

        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(outcomes.len(), 2);
    }
}
