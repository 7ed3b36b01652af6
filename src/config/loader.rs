use std::path::Path;

use crate::adapters::parsers::ini_parser::IniParser;
use crate::adapters::parsers::toml_parser::TomlParser;
use crate::core::errors::{BackupError, Result};
use crate::core::models::backup_config::BackupConfig;
use crate::core::traits::parser::ConfigParser;

/// Load and validate a backup config.
///
/// The parser is picked by file extension: `.toml` files go to the TOML
/// parser, everything else is read as INI.
pub fn load(path: &Path) -> Result<BackupConfig> {
    if !path.is_file() {
        return Err(BackupError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;

    parser_for(path).parse(&content).map_err(|e| match e {
        BackupError::ParseError { detail, .. } => BackupError::ParseError {
            file: path.to_path_buf(),
            detail,
        },
        other => other,
    })
}

/// Choose the parser whose extensions match `path`, defaulting to INI.
fn parser_for(path: &Path) -> Box<dyn ConfigParser> {
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    let toml = TomlParser;
    if toml.supported_extensions().contains(&ext.as_str()) {
        Box::new(toml)
    } else {
        Box::new(IniParser)
    }
}
