use std::path::PathBuf;

use crate::core::errors::{BackupError, Result};
use crate::core::models::backup_config::{
    BackupConfig, expand_home, normalize_passphrase, parse_port,
};
use crate::core::models::backup_target::BackupTarget;
use crate::core::models::connection::ConnectionParams;
use crate::core::traits::parser::ConfigParser;

/// Name of the section holding connection settings and shared defaults.
const DEFAULT_SECTION: &str = "DEFAULT";

/// Parses INI backup configs.
///
/// ```text
/// [DEFAULT]
/// HOST = example.com
/// PORT = 22
/// USER = backup
/// KEY_FILE = ~/.ssh/id_rsa
/// PASSPHRASE = ""
///
/// [database]
/// REMOTE_PATH = /backups/db
/// LOCAL_PATH = /var/backups/db.zip
/// ```
///
/// Supports:
/// - `KEY = value` and `KEY: value` entries, keys case-insensitive
/// - Comment lines starting with `#` or `;`
/// - Target sections inheriting missing keys from `[DEFAULT]`
/// - Every section other than `[DEFAULT]` is one target, in file order
pub struct IniParser;

/// A section as read from the file, before interpretation.
#[derive(Debug)]
struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl Section {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl IniParser {
    /// Split content into sections. The `[DEFAULT]` section always comes
    /// first in the result, even when it is absent from the file.
    fn read_sections(content: &str) -> Result<Vec<Section>> {
        let mut sections = vec![Section {
            name: DEFAULT_SECTION.to_string(),
            entries: Vec::new(),
        }];
        let mut current: Option<usize> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err(parse_error(line_number, "unterminated section header"));
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(parse_error(line_number, "empty section name"));
                }
                current = Some(if name == DEFAULT_SECTION {
                    0
                } else {
                    if sections.iter().any(|s| s.name == name) {
                        return Err(parse_error(
                            line_number,
                            &format!("section [{name}] is declared more than once"),
                        ));
                    }
                    sections.push(Section {
                        name: name.to_string(),
                        entries: Vec::new(),
                    });
                    sections.len() - 1
                });
                continue;
            }

            let Some(section_idx) = current else {
                return Err(parse_error(
                    line_number,
                    "entry before the first [section] header",
                ));
            };

            let Some(sep) = trimmed.find(['=', ':']) else {
                return Err(parse_error(
                    line_number,
                    &format!("expected KEY = value, got: {trimmed}"),
                ));
            };
            let key = trimmed[..sep].trim().to_lowercase();
            if key.is_empty() {
                return Err(parse_error(line_number, "empty key"));
            }
            let value = trimmed[sep + 1..].trim().to_string();

            let section = &mut sections[section_idx];
            if section.get(&key).is_some() {
                return Err(parse_error(
                    line_number,
                    &format!("key '{key}' repeated in [{}]", section.name),
                ));
            }
            section.entries.push((key, value));
        }

        Ok(sections)
    }
}

fn parse_error(line_number: usize, detail: &str) -> BackupError {
    BackupError::ParseError {
        file: PathBuf::from("config.ini"),
        detail: format!("line {line_number}: {detail}"),
    }
}

fn required<'a>(section: &'a Section, key: &str) -> Result<&'a str> {
    match section.get(key) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BackupError::InvalidConfig {
            detail: format!(
                "[{}] is missing {}",
                section.name,
                key.to_uppercase()
            ),
        }),
    }
}

/// Look `key` up in a target section, falling back to `[DEFAULT]`.
fn target_value(section: &Section, defaults: &Section, key: &str) -> Result<String> {
    section
        .get(key)
        .or_else(|| defaults.get(key))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| BackupError::InvalidConfig {
            detail: format!(
                "target [{}] is missing {}",
                section.name,
                key.to_uppercase()
            ),
        })
}

impl ConfigParser for IniParser {
    fn parse(&self, content: &str) -> Result<BackupConfig> {
        let mut sections = IniParser::read_sections(content)?;
        let target_sections = sections.split_off(1);
        let defaults = &sections[0];

        let connection = ConnectionParams {
            host: required(defaults, "host")?.to_string(),
            port: match defaults.get("port") {
                Some(raw) => parse_port(raw)?,
                None => ConnectionParams::DEFAULT_PORT,
            },
            user: required(defaults, "user")?.to_string(),
            key_file: expand_home(required(defaults, "key_file")?),
            passphrase: normalize_passphrase(defaults.get("passphrase")),
        };

        let targets = target_sections
            .iter()
            .map(|section| -> Result<BackupTarget> {
                Ok(BackupTarget {
                    name: section.name.clone(),
                    remote_path: target_value(section, defaults, "remote_path")?,
                    local_path: PathBuf::from(target_value(section, defaults, "local_path")?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let journal_file = defaults
            .get("journal_file")
            .filter(|v| !v.is_empty())
            .map(expand_home);

        let config = BackupConfig {
            connection,
            targets,
            journal_file,
        };
        config.validate()?;
        Ok(config)
    }

    fn supported_extensions(&self) -> &[&str] {
        &[".ini", ".conf", ".cfg"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[DEFAULT]
HOST = example.com
PORT = 2222
USER = backup
KEY_FILE = /keys/id_rsa
PASSPHRASE = \"\"

# nightly dumps
[database]
REMOTE_PATH = /backups/db
LOCAL_PATH = /var/backups/db.zip

[website]
REMOTE_PATH: /backups/www.tar
LOCAL_PATH: /var/backups/www.zip
";

    #[test]
    fn parse_connection_section() {
        let cfg = IniParser.parse(SAMPLE).unwrap();

        assert_eq!(cfg.connection.host, "example.com");
        assert_eq!(cfg.connection.port, 2222);
        assert_eq!(cfg.connection.user, "backup");
        assert_eq!(cfg.connection.key_file, PathBuf::from("/keys/id_rsa"));
        assert_eq!(cfg.connection.passphrase, None);
    }

    #[test]
    fn targets_keep_file_order() {
        let cfg = IniParser.parse(SAMPLE).unwrap();
        let names: Vec<&str> = cfg.targets.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["database", "website"]);
        assert_eq!(cfg.targets[1].remote_path, "/backups/www.tar");
        assert_eq!(
            cfg.targets[1].local_path,
            PathBuf::from("/var/backups/www.zip")
        );
    }

    #[test]
    fn keys_are_case_insensitive() {
        let content = "[DEFAULT]\nhost = h\nUser = u\nkey_file = k\n[t]\nremote_path = /r\nLocal_Path = /l";
        let cfg = IniParser.parse(content).unwrap();

        assert_eq!(cfg.connection.user, "u");
        assert_eq!(cfg.targets[0].local_path, PathBuf::from("/l"));
    }

    #[test]
    fn port_defaults_to_22() {
        let content = "[DEFAULT]\nHOST = h\nUSER = u\nKEY_FILE = k";
        let cfg = IniParser.parse(content).unwrap();

        assert_eq!(cfg.connection.port, 22);
        assert!(cfg.targets.is_empty());
    }

    #[test]
    fn passphrase_is_unquoted() {
        let content = "[DEFAULT]\nHOST = h\nUSER = u\nKEY_FILE = k\nPASSPHRASE = \"open sesame\"";
        let cfg = IniParser.parse(content).unwrap();

        assert_eq!(cfg.connection.passphrase.as_deref(), Some("open sesame"));
    }

    #[test]
    fn target_inherits_from_default() {
        let content = "[DEFAULT]\nHOST = h\nUSER = u\nKEY_FILE = k\nREMOTE_PATH = /backups/shared\n[a]\nLOCAL_PATH = /a.zip";
        let cfg = IniParser.parse(content).unwrap();

        assert_eq!(cfg.targets[0].remote_path, "/backups/shared");
    }

    #[test]
    fn journal_file_is_optional() {
        let content = "[DEFAULT]\nHOST = h\nUSER = u\nKEY_FILE = k\nJOURNAL_FILE = /var/log/backup.jsonl";
        let cfg = IniParser.parse(content).unwrap();

        assert_eq!(
            cfg.journal_file,
            Some(PathBuf::from("/var/log/backup.jsonl"))
        );
    }

    #[test]
    fn missing_host_is_reported() {
        let content = "[DEFAULT]\nUSER = u\nKEY_FILE = k";
        let err = IniParser.parse(content).unwrap_err();

        assert!(err.to_string().contains("HOST"));
    }

    #[test]
    fn target_missing_local_path_is_reported() {
        let content = "[DEFAULT]\nHOST = h\nUSER = u\nKEY_FILE = k\n[db]\nREMOTE_PATH = /r";
        let err = IniParser.parse(content).unwrap_err();

        assert!(err.to_string().contains("[db]"));
        assert!(err.to_string().contains("LOCAL_PATH"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let content = "[DEFAULT]\nHOST = h\nPORT = 70000\nUSER = u\nKEY_FILE = k";
        assert!(IniParser.parse(content).is_err());
    }

    #[test]
    fn duplicate_section_is_rejected() {
        let content = "[DEFAULT]\nHOST = h\nUSER = u\nKEY_FILE = k\n[a]\nREMOTE_PATH=/r\nLOCAL_PATH=/l\n[a]\nREMOTE_PATH=/r\nLOCAL_PATH=/l";
        let err = IniParser.parse(content).unwrap_err();

        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let content = "[DEFAULT]\nHOST = h\nHOST = g";
        assert!(IniParser.parse(content).is_err());
    }

    #[test]
    fn entry_before_section_is_rejected() {
        let err = IniParser.parse("HOST = h").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn line_without_separator_is_rejected() {
        let content = "[DEFAULT]\nHOST example.com";
        let err = IniParser.parse(content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn semicolon_comments_are_ignored() {
        let content = "; top comment\n[DEFAULT]\n; inner\nHOST = h\nUSER = u\nKEY_FILE = k";
        assert!(IniParser.parse(content).is_ok());
    }
}
