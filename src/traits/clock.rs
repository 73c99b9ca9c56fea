//! Time source for reserve updates.

use core::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, modulo 2^32.
///
/// Only differences between readings matter; wrap-around is expected.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current timestamp.
    fn now(&self) -> u32;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now(&self) -> u32 {
        // wraps modulo 2^32
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as u32)
    }
}

/// Clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use hydra_exchange::traits::{Clock, ManualClock};
///
/// let clock = ManualClock::new(u32::MAX);
/// clock.advance(2);
/// assert_eq!(clock.now(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU32,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub const fn new(start: u32) -> Self {
        Self {
            now: AtomicU32::new(start),
        }
    }

    /// Sets the current time.
    pub fn set(&self, timestamp: u32) {
        self.now.store(timestamp, Ordering::SeqCst);
    }

    /// Moves time forward by `seconds`, wrapping.
    pub fn advance(&self, seconds: u32) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u32 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> u32 {
        (**self).now()
    }
}
