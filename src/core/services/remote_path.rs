use chrono::NaiveDateTime;

/// Timestamp layout appended to every uploaded file name.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Extension every uploaded copy receives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Derive the remote file name for an upload.
///
/// Strips the extension of the template's last path component, then
/// appends `_YYYYMMDD_HHMMSS.zip`. A leading dot (as in `.profile`) is part
/// of the name, not an extension. Trailing slashes are ignored, so
/// `/backups/` names the file `/backups_…`.
///
/// ```text
/// /backups/db      @ 2025-03-22 10:15:30 -> /backups/db_20250322_101530.zip
/// /backups/db.sql  @ 2025-03-22 10:15:30 -> /backups/db_20250322_101530.zip
/// ```
pub fn derive_remote_path(template: &str, at: NaiveDateTime) -> String {
    format!(
        "{}_{}.{ARCHIVE_EXTENSION}",
        strip_extension(template),
        at.format(TIMESTAMP_FORMAT)
    )
}

/// Whether a template names a file once trailing slashes are dropped.
pub fn has_file_name(template: &str) -> bool {
    template
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .is_some_and(|name| !name.trim().is_empty())
}

/// Remove the final extension of the last `/`-separated component.
fn strip_extension(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[name_start..];
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => &path[..name_start + dot],
        _ => path,
    }
}
