use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::adapters::channel::dry_run_channel::DryRunChannel;
use crate::adapters::channel::sftp_channel::SftpChannel;
use crate::adapters::journal::json_journal::JsonJournal;
use crate::cli::output;
use crate::config::loader;
use crate::core::errors::{BackupError, Result};
use crate::core::models::journal_entry::JournalEntry;
use crate::core::models::outcome::{RunSummary, UploadOutcome, UploadStatus};
use crate::core::services::backup_service::{BackupService, RunOptions};
use crate::core::services::session::with_channel;
use crate::core::traits::journal::Journal;

/// Flags of `sftp-backup run`.
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub dry_run: bool,
    pub skip_existing: bool,
    pub strict: bool,
    pub journal: Option<PathBuf>,
}

/// Execute the `sftp-backup run` command.
///
/// Opens one channel, uploads every target through it and prints a
/// summary. A failed connection aborts before any target is touched;
/// per-target problems are reported and the run continues.
pub fn execute(config_path: &Path, args: &RunArgs) -> Result<()> {
    let config = loader::load(config_path)?;
    let conn = &config.connection;

    output::header(&format!(
        "sftp-backup run → {}{}",
        conn.display_target(),
        if args.dry_run { " (dry run)" } else { "" }
    ));
    output::detail(&format!("config:  {}", config_path.display()));
    output::detail(&format!("key:     {}", conn.key_file.display()));
    output::detail(&format!("targets: {}", config.targets.len()));

    let journal = select_journal(
        args.journal.as_deref(),
        config.journal_file.as_deref(),
        args.dry_run,
    );
    if let Some(j) = &journal {
        output::detail(&format!("journal: {}", j.path().display()));
    }

    let service = BackupService::new(RunOptions {
        skip_existing: args.skip_existing,
    });
    let report = reporter(journal.as_ref().map(|j| j as &dyn Journal), &conn.host);

    let outcomes = if args.dry_run {
        with_channel(
            || Ok(DryRunChannel::new()),
            |channel| {
                let outcomes = service.run_with(channel, &config.targets, report);
                output::detail(&format!("{} upload(s) planned", channel.planned().len()));
                outcomes
            },
        )?
    } else {
        let show_progress = !output::is_quiet();
        with_channel(
            || SftpChannel::open(conn.clone(), show_progress),
            |channel| service.run_with(channel, &config.targets, report),
        )?
    };

    let summary = RunSummary::from_outcomes(&outcomes);
    print_summary(&summary, args.dry_run);

    if args.strict && !summary.is_complete() {
        return Err(BackupError::IncompleteRun {
            failed: summary.failed,
            missing: summary.skipped_missing,
        });
    }
    Ok(())
}

/// Journal for this run: `--journal` wins over the config's JOURNAL_FILE.
/// Dry runs leave no trace in the journal.
fn select_journal(
    flag: Option<&Path>,
    configured: Option<&Path>,
    dry_run: bool,
) -> Option<JsonJournal> {
    if dry_run {
        return None;
    }
    flag.or(configured).map(JsonJournal::new)
}

/// Append one outcome to the journal, if there is one.
fn record_outcome(
    journal: Option<&dyn Journal>,
    host: &str,
    outcome: &UploadOutcome,
) -> Result<()> {
    match journal {
        Some(j) => j.record(&JournalEntry::from_outcome(host, outcome, Utc::now())),
        None => Ok(()),
    }
}

/// Observer that prints each outcome and journals it. A journal failure
/// is only a warning; the run goes on.
fn reporter<'a>(
    journal: Option<&'a dyn Journal>,
    host: &'a str,
) -> impl FnMut(&UploadOutcome) + 'a {
    move |outcome: &UploadOutcome| {
        print_outcome(outcome);
        if let Err(e) = record_outcome(journal, host, outcome) {
            output::warning(&format!("Journal not updated: {e}"));
        }
    }
}

/// Print one outcome as soon as it is known.
fn print_outcome(outcome: &UploadOutcome) {
    let local = outcome.local_path.display();
    let remote = outcome.remote_path.as_deref().unwrap_or("-");
    match &outcome.status {
        UploadStatus::Succeeded(receipt) => {
            output::success(&format!("{}: {local} → {remote}", outcome.target));
            output::detail(&format!("{} bytes, sha256 {}", receipt.bytes, receipt.sha256));
        }
        UploadStatus::SkippedMissingLocal => {
            let reason = BackupError::MissingLocalFile {
                path: outcome.local_path.clone(),
            };
            output::warning(&format!("{}: skipped, {reason}", outcome.target));
        }
        UploadStatus::SkippedRemoteExists => {
            output::warning(&format!(
                "{}: skipped, remote file already exists: {remote}",
                outcome.target
            ));
        }
        UploadStatus::Failed(reason) => {
            output::error(&format!("{}: {reason}", outcome.target));
        }
    }
}

fn print_summary(summary: &RunSummary, dry_run: bool) {
    output::header("Summary");
    let verb = if dry_run { "would upload" } else { "uploaded" };
    output::success(&format!(
        "{}/{} {verb} ({} bytes)",
        summary.succeeded,
        summary.total(),
        summary.bytes
    ));
    if summary.skipped > 0 {
        output::warning(&format!("{} skipped", summary.skipped));
    }
    if summary.failed > 0 {
        output::error(&format!("{} failed", summary.failed));
    }
}
