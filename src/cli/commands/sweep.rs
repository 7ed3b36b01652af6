use std::path::Path;

use crate::cli::output;
use crate::core::errors::Result;
use crate::core::services::sweep_service::SweepService;

/// Execute the `sftp-backup sweep` command.
///
/// Deletes files in `target_dir` older than `days_old` days whose
/// extension matches `extensions` (all files when empty).
pub fn execute(target_dir: &Path, extensions: &[String], days_old: u32, dry_run: bool) -> Result<()> {
    let svc = SweepService::new(extensions, days_old, dry_run);

    output::header(&format!(
        "sftp-backup sweep {}{}",
        target_dir.display(),
        if dry_run { " (dry run)" } else { "" }
    ));
    output::detail(&format!("older than: {days_old} days"));
    if !extensions.is_empty() {
        output::detail(&format!("extensions: {}", extensions.join(" ")));
    }

    let report = svc.sweep(target_dir)?;

    for path in &report.deleted {
        if report.dry_run {
            output::info(&format!("[DRY-RUN] would delete {}", path.display()));
        } else {
            output::info(&format!("deleted {}", path.display()));
        }
    }
    for (path, reason) in &report.failed {
        output::warning(&format!("could not delete {}: {reason}", path.display()));
    }

    let verb = if report.dry_run { "would be deleted" } else { "deleted" };
    output::success(&format!("{} file(s) {verb}", report.deleted.len()));
    Ok(())
}
