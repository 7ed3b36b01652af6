pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Upload configured files to a backup host over SFTP.
#[derive(Parser, Debug)]
#[command(name = "sftp-backup", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload every target in a config file
    Run {
        /// Config file (.ini or .toml)
        config: PathBuf,

        /// Show what would be uploaded without connecting
        #[arg(long)]
        dry_run: bool,

        /// Skip targets whose remote file already exists
        #[arg(long)]
        skip_existing: bool,

        /// Exit non-zero if any target failed or its local file was missing
        #[arg(long)]
        strict: bool,

        /// Append outcomes to this JSON-lines journal (overrides JOURNAL_FILE)
        #[arg(long, env = "SFTP_BACKUP_JOURNAL")]
        journal: Option<PathBuf>,
    },

    /// Delete aged backup archives from a local directory
    Sweep {
        /// Directory to clean (not recursive)
        #[arg(long)]
        target_dir: PathBuf,

        /// File extensions to match, e.g. .zip .log (default: all files)
        #[arg(long, num_args = 0..)]
        extensions: Vec<String>,

        /// Delete files older than this many days
        #[arg(long, default_value_t = 90)]
        days_old: u32,

        /// List files that would be deleted without deleting them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show recorded upload outcomes
    History {
        /// Journal file to read
        #[arg(long, env = "SFTP_BACKUP_JOURNAL")]
        journal: Option<PathBuf>,

        /// Read the journal location from this config's JOURNAL_FILE
        #[arg(long, conflicts_with = "journal")]
        config: Option<PathBuf>,

        /// Only show this target
        #[arg(long)]
        target: Option<String>,

        /// Filter entries since this date (ISO 8601)
        #[arg(long)]
        since: Option<String>,

        /// Show last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}
