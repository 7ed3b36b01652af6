use crate::core::errors::Result;
use crate::core::models::backup_config::BackupConfig;

/// Port for parsing backup configuration files.
///
/// Ships with `IniParser` (the classic format) and `TomlParser`.
pub trait ConfigParser: Send + Sync {
    /// Parse raw file content into a `BackupConfig`.
    fn parse(&self, content: &str) -> Result<BackupConfig>;

    /// File extensions this parser handles (e.g. `[".ini"]`).
    fn supported_extensions(&self) -> &[&str];
}
