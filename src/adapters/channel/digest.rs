use std::io::{self, Write};

use indicatif::ProgressBar;
use sha2::{Digest, Sha256};

use crate::core::models::outcome::TransferReceipt;

/// Writer adapter that hashes and counts everything passing through it,
/// and advances a progress bar.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
    bytes: u64,
    progress: ProgressBar,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W, progress: ProgressBar) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes: 0,
            progress,
        }
    }

    /// Flush and produce the receipt for what was written, handing the
    /// inner writer back so the caller can close it. The progress bar is
    /// cleared even when the flush fails.
    pub fn finish(mut self) -> io::Result<(W, TransferReceipt)> {
        let flushed = self.inner.flush();
        self.progress.finish_and_clear();
        flushed?;
        let receipt = TransferReceipt {
            bytes: self.bytes,
            sha256: format!("{:x}", self.hasher.finalize()),
        };
        Ok((self.inner, receipt))
    }

    /// Give up on a failed transfer and clear the progress bar.
    pub fn abort(self) {
        self.progress.finish_and_clear();
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes += n as u64;
        self.progress.inc(n as u64);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
