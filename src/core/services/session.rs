use std::ops::{Deref, DerefMut};

use crate::core::errors::Result;
use crate::core::traits::channel::SecureChannel;

/// Owns an opened channel and closes it when dropped.
///
/// Closing happens on every exit path: normal return, early `?` return
/// and unwinding panics.
pub struct ChannelGuard<C: SecureChannel> {
    channel: Option<C>,
}

impl<C: SecureChannel> ChannelGuard<C> {
    /// Open a channel with `open`. On failure nothing is held and the
    /// error is returned unchanged.
    pub fn open<F>(open: F) -> Result<Self>
    where
        F: FnOnce() -> Result<C>,
    {
        Ok(Self {
            channel: Some(open()?),
        })
    }

    /// Close the channel now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close();
        }
    }
}

impl<C: SecureChannel> Deref for ChannelGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        // Only `close(self)` and `drop` empty the slot, and both consume the guard.
        self.channel.as_ref().expect("channel guard used after close")
    }
}

impl<C: SecureChannel> DerefMut for ChannelGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        self.channel.as_mut().expect("channel guard used after close")
    }
}

impl<C: SecureChannel> Drop for ChannelGuard<C> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Open a channel, run `body` with it, and close it afterwards.
///
/// If opening fails, `body` never runs and the open error is returned.
/// Errors are always propagated, never swallowed.
pub fn with_channel<C, T, O, B>(open: O, body: B) -> Result<T>
where
    C: SecureChannel,
    O: FnOnce() -> Result<C>,
    B: FnOnce(&mut C) -> T,
{
    let mut guard = ChannelGuard::open(open)?;
    let value = body(&mut *guard);
    guard.close();
    Ok(value)
}
