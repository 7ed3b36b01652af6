use std::collections::HashSet;
use std::path::PathBuf;

use crate::core::errors::{BackupError, Result};
use crate::core::models::backup_target::BackupTarget;
use crate::core::models::connection::ConnectionParams;
use crate::core::services::remote_path::has_file_name;

/// Parsed configuration: connection info plus the ordered target list.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupConfig {
    pub connection: ConnectionParams,
    pub targets: Vec<BackupTarget>,
    /// Optional JSON-lines journal recording every outcome.
    pub journal_file: Option<PathBuf>,
}

impl BackupConfig {
    /// Check invariants that every config format must satisfy.
    ///
    /// Local file existence is deliberately not checked here; it is
    /// checked per target right before the transfer.
    pub fn validate(&self) -> Result<()> {
        let conn = &self.connection;
        if conn.host.trim().is_empty() {
            return Err(invalid("HOST must not be empty"));
        }
        if conn.port == 0 {
            return Err(invalid("PORT must be between 1 and 65535"));
        }
        if conn.user.trim().is_empty() {
            return Err(invalid("USER must not be empty"));
        }
        if conn.key_file.as_os_str().is_empty() {
            return Err(invalid("KEY_FILE must not be empty"));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if !seen.insert(target.name.as_str()) {
                return Err(invalid(&format!(
                    "target '{}' is declared more than once",
                    target.name
                )));
            }
            if target.remote_path.trim().is_empty() {
                return Err(invalid(&format!(
                    "target '{}' has an empty REMOTE_PATH",
                    target.name
                )));
            }
            if !has_file_name(&target.remote_path) {
                return Err(invalid(&format!(
                    "target '{}' has a REMOTE_PATH without a file name: {}",
                    target.name, target.remote_path
                )));
            }
            if target.local_path.as_os_str().is_empty() {
                return Err(invalid(&format!(
                    "target '{}' has an empty LOCAL_PATH",
                    target.name
                )));
            }
        }
        Ok(())
    }
}

fn invalid(detail: &str) -> BackupError {
    BackupError::InvalidConfig {
        detail: detail.to_string(),
    }
}

/// Parse a port value, rejecting 0 and anything above 65535.
pub fn parse_port(raw: &str) -> Result<u16> {
    match raw.trim().parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(invalid(&format!(
            "PORT must be between 1 and 65535, got '{}'",
            raw.trim()
        ))),
    }
}

/// Expand a leading `~/` to the current user's home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Normalise a configured passphrase: strip quotes and whitespace,
/// and treat an empty result as "no passphrase".
pub fn normalize_passphrase(raw: Option<&str>) -> Option<String> {
    let cleaned = raw?.replace('"', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
