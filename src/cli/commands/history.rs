use std::path::{Path, PathBuf};

use chrono::{NaiveDate, TimeZone, Utc};
use colored::Colorize;

use crate::adapters::journal::json_journal::JsonJournal;
use crate::cli::output;
use crate::config::loader;
use crate::core::errors::{BackupError, Result};
use crate::core::models::journal_entry::{JournalEntry, JournalStatus};
use crate::core::traits::journal::Journal;

/// Execute the `sftp-backup history` command.
///
/// Displays journal entries with optional filters for target, date,
/// and entry count.
pub fn execute(
    journal: Option<&Path>,
    config: Option<&Path>,
    target: Option<&str>,
    since: Option<&str>,
    last: Option<usize>,
) -> Result<()> {
    let path = resolve_journal(journal, config)?;
    let journal = JsonJournal::new(path);

    let since_dt = since.map(parse_since).transpose()?;
    let entries = journal.query(target, since_dt)?;

    if entries.is_empty() {
        output::header("sftp-backup history");
        output::warning("No journal entries found");
        if target.is_some() || since.is_some() {
            output::info("Try removing filters to see all entries.");
        }
        return Ok(());
    }

    // --last N keeps the newest N, still printed oldest first.
    let skip = last.map_or(0, |n| entries.len().saturating_sub(n));
    let display = &entries[skip..];

    output::header(&format!("sftp-backup history ({} entries)", display.len()));
    println!();
    for entry in display {
        print_entry(entry);
    }

    Ok(())
}

/// `--journal` wins; otherwise the config's JOURNAL_FILE.
fn resolve_journal(journal: Option<&Path>, config: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = journal {
        return Ok(path.to_path_buf());
    }
    let Some(config_path) = config else {
        return Err(BackupError::InvalidConfig {
            detail: "no journal given. Use --journal <PATH> or --config <CONFIG>".into(),
        });
    };
    loader::load(config_path)?
        .journal_file
        .ok_or_else(|| BackupError::InvalidConfig {
            detail: format!("{} does not set JOURNAL_FILE", config_path.display()),
        })
}

/// Parse a date string (ISO 8601: `YYYY-MM-DD`) into a UTC DateTime.
fn parse_since(s: &str) -> Result<chrono::DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| BackupError::InvalidConfig {
            detail: format!(
                "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2025-03-22"
            ),
        })
        .map(|d| Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0).expect("midnight is always valid")))
}

/// Print a single journal entry as a formatted row.
fn print_entry(entry: &JournalEntry) {
    let date = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    let status = match entry.status {
        JournalStatus::Succeeded => "ok     ".green(),
        JournalStatus::SkippedMissingLocal | JournalStatus::SkippedRemoteExists => {
            "skipped".yellow()
        }
        JournalStatus::Failed => "failed ".red(),
    };
    let remote = entry.remote_path.as_deref().unwrap_or("-");

    print!("  {date}  {status}  {:<16} {remote}", entry.target);
    match (&entry.detail, entry.bytes) {
        (Some(detail), _) => println!("  ({detail})"),
        (None, Some(bytes)) => println!("  ({bytes} bytes)"),
        (None, None) => println!(),
    }
}
