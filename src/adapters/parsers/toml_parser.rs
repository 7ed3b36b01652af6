use std::path::PathBuf;

use serde::Deserialize;

use crate::core::errors::{BackupError, Result};
use crate::core::models::backup_config::{
    BackupConfig, expand_home, normalize_passphrase, parse_port,
};
use crate::core::models::backup_target::BackupTarget;
use crate::core::models::connection::ConnectionParams;
use crate::core::traits::parser::ConfigParser;

/// Parses TOML backup configs.
///
/// ```toml
/// [connection]
/// host = "example.com"
/// user = "backup"
/// key_file = "~/.ssh/id_ed25519"
///
/// [[targets]]
/// name = "database"
/// remote_path = "/backups/db"
/// local_path = "/var/backups/db.zip"
/// ```
pub struct TomlParser;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    connection: RawConnection,
    #[serde(default)]
    targets: Vec<RawTarget>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConnection {
    host: String,
    /// Kept as a wide integer so out-of-range values get our own message.
    port: Option<i64>,
    user: String,
    key_file: String,
    passphrase: Option<String>,
    journal_file: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTarget {
    name: String,
    remote_path: String,
    local_path: String,
}

impl ConfigParser for TomlParser {
    fn parse(&self, content: &str) -> Result<BackupConfig> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| BackupError::ParseError {
            file: PathBuf::from("config.toml"),
            detail: e.to_string(),
        })?;

        let port = match raw.connection.port {
            Some(p) => parse_port(&p.to_string())?,
            None => ConnectionParams::DEFAULT_PORT,
        };

        let config = BackupConfig {
            connection: ConnectionParams {
                host: raw.connection.host,
                port,
                user: raw.connection.user,
                key_file: expand_home(&raw.connection.key_file),
                passphrase: normalize_passphrase(raw.connection.passphrase.as_deref()),
            },
            targets: raw
                .targets
                .into_iter()
                .map(|t| BackupTarget {
                    name: t.name,
                    remote_path: t.remote_path,
                    local_path: PathBuf::from(t.local_path),
                })
                .collect(),
            journal_file: raw
                .connection
                .journal_file
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(expand_home),
        };
        config.validate()?;
        Ok(config)
    }

    fn supported_extensions(&self) -> &[&str] {
        &[".toml"]
    }
}
