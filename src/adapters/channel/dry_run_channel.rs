use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::adapters::channel::digest::HashingWriter;
use crate::core::errors::{BackupError, Result};
use crate::core::models::outcome::TransferReceipt;
use crate::core::traits::channel::SecureChannel;

/// Channel that reads local files but never touches the network.
///
/// Used by `run --dry-run` to show what a real run would upload.
#[derive(Debug, Default)]
pub struct DryRunChannel {
    planned: Vec<(PathBuf, String)>,
    closed: bool,
}

impl DryRunChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads that would have happened, in order.
    pub fn planned(&self) -> &[(PathBuf, String)] {
        &self.planned
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl SecureChannel for DryRunChannel {
    fn exists(&self, _remote_path: &str) -> bool {
        false
    }

    fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<TransferReceipt> {
        let read_failed = |e: io::Error| BackupError::Transfer {
            remote_path: remote_path.to_string(),
            reason: format!("cannot read {}: {e}", local_path.display()),
        };
        let local = File::open(local_path).map_err(read_failed)?;
        let mut writer = HashingWriter::new(io::sink(), ProgressBar::hidden());
        io::copy(&mut BufReader::new(local), &mut writer).map_err(read_failed)?;
        let (_, receipt) = writer.finish().map_err(read_failed)?;

        self.planned
            .push((local_path.to_path_buf(), remote_path.to_string()));
        Ok(receipt)
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
