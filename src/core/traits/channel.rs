use std::path::Path;

use crate::core::errors::Result;
use crate::core::models::outcome::TransferReceipt;

/// Port for an authenticated file-transfer session to one remote host.
///
/// Implementations live in `adapters::channel` (e.g. SftpChannel,
/// DryRunChannel). Opening is an adapter constructor; the core only sees
/// an already opened channel. A channel is used by one run on one thread.
pub trait SecureChannel {
    /// Whether `remote_path` exists. Any probe error counts as `false`.
    fn exists(&self, remote_path: &str) -> bool;

    /// Copy `local_path` verbatim to `remote_path`, overwriting it.
    ///
    /// Any I/O error fails the whole upload. The remote file may be
    /// left partially written.
    fn upload(&mut self, local_path: &Path, remote_path: &str) -> Result<TransferReceipt>;

    /// Release the session. Safe to call more than once.
    fn close(&mut self);
}
