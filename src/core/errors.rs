use std::path::PathBuf;

/// All domain errors for sftp-backup.
///
/// `Auth` and `Transport` abort a whole run. `Transfer` and
/// `MissingLocalFile` belong to a single target and are folded into
/// that target's outcome by the backup service.
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error(
        "Authentication failed for {user}@{host}: {reason}\n\n  \
         Check KEY_FILE, PASSPHRASE and USER in the config, and that the\n  \
         public key is listed in the remote authorized_keys."
    )]
    Auth {
        user: String,
        host: String,
        reason: String,
    },

    #[error(
        "Connection to {host}:{port} failed: {reason}\n\n  \
         Check HOST and PORT, and that the SSH server is reachable."
    )]
    Transport {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Upload to {remote_path} failed: {reason}")]
    Transfer { remote_path: String, reason: String },

    #[error("local file not found: {path}")]
    MissingLocalFile { path: PathBuf },

    #[error(
        "Config file not found: {path}\n\n  \
         Pass the path of an .ini or .toml file: sftp-backup run <CONFIG>"
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "Parse error in {file}: {detail}\n\n  \
         Expected [section] headers and KEY = value lines.\n  \
         Comments (# or ;) and blank lines are allowed."
    )]
    ParseError { file: PathBuf, detail: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Journal error: {detail}")]
    Journal { detail: String },

    #[error(
        "Run incomplete: {failed} failed, {missing} missing local file(s)\n\n  \
         Re-run without --strict to treat per-target problems as warnings."
    )]
    IncompleteRun { failed: usize, missing: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BackupError {
    /// Whether this error must abort the whole batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::Transport { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BackupError>;
