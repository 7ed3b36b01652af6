use serde::{Deserialize, Serialize};

use crate::core::models::outcome::{UploadOutcome, UploadStatus};

/// Status values as written to the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JournalStatus {
    Succeeded,
    SkippedMissingLocal,
    SkippedRemoteExists,
    Failed,
}

/// A single entry in the run journal (JSON lines format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub host: String,
    pub target: String,
    pub local_path: String,
    pub remote_path: Option<String>,
    pub status: JournalStatus,
    pub detail: Option<String>,
    pub bytes: Option<u64>,
    pub sha256: Option<String>,
}

impl JournalEntry {
    /// Build an entry for an outcome produced against `host`.
    pub fn from_outcome(
        host: &str,
        outcome: &UploadOutcome,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        let (status, detail, bytes, sha256) = match &outcome.status {
            UploadStatus::Succeeded(receipt) => (
                JournalStatus::Succeeded,
                None,
                Some(receipt.bytes),
                Some(receipt.sha256.clone()),
            ),
            UploadStatus::SkippedMissingLocal => {
                (JournalStatus::SkippedMissingLocal, None, None, None)
            }
            UploadStatus::SkippedRemoteExists => {
                (JournalStatus::SkippedRemoteExists, None, None, None)
            }
            UploadStatus::Failed(reason) => {
                (JournalStatus::Failed, Some(reason.clone()), None, None)
            }
        };

        Self {
            timestamp,
            host: host.to_string(),
            target: outcome.target.clone(),
            local_path: outcome.local_path.display().to_string(),
            remote_path: outcome.remote_path.clone(),
            status,
            detail,
            bytes,
            sha256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::outcome::TransferReceipt;
    use std::path::PathBuf;

    #[test]
    fn failed_outcome_keeps_reason() {
        let outcome = UploadOutcome {
            target: "db".into(),
            local_path: PathBuf::from("/var/db.zip"),
            remote_path: Some("/backups/db_20250322_101530.zip".into()),
            status: UploadStatus::Failed("permission denied".into()),
        };
        let entry = JournalEntry::from_outcome("example.com", &outcome, chrono::Utc::now());

        assert_eq!(entry.status, JournalStatus::Failed);
        assert_eq!(entry.detail.as_deref(), Some("permission denied"));
        assert!(entry.bytes.is_none());
    }

    #[test]
    fn succeeded_outcome_carries_receipt() {
        let outcome = UploadOutcome {
            target: "db".into(),
            local_path: PathBuf::from("/var/db.zip"),
            remote_path: Some("/backups/db_20250322_101530.zip".into()),
            status: UploadStatus::Succeeded(TransferReceipt {
                bytes: 42,
                sha256: "abc".into(),
            }),
        };
        let entry = JournalEntry::from_outcome("example.com", &outcome, chrono::Utc::now());

        assert_eq!(entry.status, JournalStatus::Succeeded);
        assert_eq!(entry.bytes, Some(42));
        assert_eq!(entry.sha256.as_deref(), Some("abc"));
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&JournalStatus::SkippedMissingLocal).unwrap();
        assert_eq!(json, "\"skipped_missing_local\"");
    }
}
