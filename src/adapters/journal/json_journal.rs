use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::core::errors::{BackupError, Result};
use crate::core::models::journal_entry::JournalEntry;
use crate::core::traits::journal::Journal;

/// Journal that appends entries as JSON lines to a file.
///
/// Each line is one self-contained `JournalEntry`, so runs only ever
/// append and readers can stream the file line by line.
pub struct JsonJournal {
    path: PathBuf,
}

impl JsonJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Journal for JsonJournal {
    fn record(&self, entry: &JournalEntry) -> Result<()> {
        let line = serde_json::to_string(entry).map_err(|e| BackupError::Journal {
            detail: format!("Failed to serialize journal entry: {e}"),
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| BackupError::Journal {
                detail: format!("Cannot open journal at {}: {e}", self.path.display()),
            })?;

        writeln!(file, "{line}").map_err(|e| BackupError::Journal {
            detail: format!("Failed to write journal entry: {e}"),
        })?;

        Ok(())
    }

    fn query(&self, target: Option<&str>, since: Option<DateTime<Utc>>) -> Result<Vec<JournalEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.path).map_err(|e| BackupError::Journal {
            detail: format!("Cannot read journal: {e}"),
        })?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| BackupError::Journal {
                detail: format!("Error reading journal line {}: {e}", line_num + 1),
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let entry: JournalEntry =
                serde_json::from_str(trimmed).map_err(|e| BackupError::Journal {
                    detail: format!("Malformed journal entry at line {}: {e}", line_num + 1),
                })?;

            if let Some(name) = target
                && entry.target != name
            {
                continue;
            }

            if let Some(since_date) = since
                && entry.timestamp < since_date
            {
                continue;
            }

            entries.push(entry);
        }

        Ok(entries)
    }
}
