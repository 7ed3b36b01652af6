use std::fmt;
use std::path::PathBuf;

/// Proof of a completed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub bytes: u64,
    /// Hex SHA-256 of the bytes streamed to the remote side.
    pub sha256: String,
}

/// What happened to one target during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Succeeded(TransferReceipt),
    SkippedMissingLocal,
    /// Only produced when the run asked to skip existing remote files.
    SkippedRemoteExists,
    Failed(String),
}

impl UploadStatus {
    #[cfg(test)]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded(_) => write!(f, "succeeded"),
            Self::SkippedMissingLocal => write!(f, "skipped (local file missing)"),
            Self::SkippedRemoteExists => write!(f, "skipped (remote file exists)"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-target result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub target: String,
    pub local_path: PathBuf,
    /// `None` when the target was skipped before a remote path was derived.
    pub remote_path: Option<String>,
    pub status: UploadStatus,
}

/// Counts over a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub skipped: usize,
    /// Skips caused by a missing local file. Requested skips of existing
    /// remote files are counted in `skipped` only.
    pub skipped_missing: usize,
    pub failed: usize,
    pub bytes: u64,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[UploadOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, o| {
            match &o.status {
                UploadStatus::Succeeded(receipt) => {
                    acc.succeeded += 1;
                    acc.bytes += receipt.bytes;
                }
                UploadStatus::SkippedMissingLocal => {
                    acc.skipped += 1;
                    acc.skipped_missing += 1;
                }
                UploadStatus::SkippedRemoteExists => acc.skipped += 1,
                UploadStatus::Failed(_) => acc.failed += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// True when no target failed or lost its local file.
    pub fn is_complete(&self) -> bool {
        self.skipped_missing == 0 && self.failed == 0
    }
}
