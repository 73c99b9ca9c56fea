//! Exclusive, non-reentrant access to the exchange's mutating entry points.
//!
//! One operation holds the guard from start to commit or rollback,
//! including any swap callback it runs.  A second entry from the thread
//! already holding it is a re-entrant call and fails at once.  While a
//! callback runs, every entry fails at once whatever the thread, since the
//! callback may be waiting on the thread that is trying to get in.  Other
//! entries wait for release.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::error::AmmError;

/// Lock that rejects re-entry instead of deadlocking on it.
///
/// # Examples
///
/// ```
/// use hydra_exchange::engine::ReentrancyGuard;
/// use hydra_exchange::error::AmmError;
///
/// let guard = ReentrancyGuard::new();
/// let held = guard.enter().expect("free");
/// assert_eq!(guard.enter().err(), Some(AmmError::Reentrancy));
/// drop(held);
/// assert!(guard.enter().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    state: Mutex<GuardState>,
    released: Condvar,
}

#[derive(Debug, Default)]
struct GuardState {
    holder: Option<ThreadId>,
    in_callback: bool,
}

/// Proof of holding a [`ReentrancyGuard`]; releases it on drop, including
/// on error paths and unwinding.
#[derive(Debug)]
#[must_use = "the guard is released as soon as this is dropped"]
pub struct Entered<'a> {
    guard: &'a ReentrancyGuard,
}

/// Marks a running callback; cleared on drop.
#[derive(Debug)]
#[must_use = "the callback mark is cleared as soon as this is dropped"]
pub(crate) struct CallbackScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl ReentrancyGuard {
    /// Creates a released guard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the guard, waiting while another thread holds it.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Reentrancy`] if the calling thread already holds
    /// it, or if the holder is running a callback.
    pub fn enter(&self) -> Result<Entered<'_>, AmmError> {
        let me = thread::current().id();
        let mut state = self.lock();
        loop {
            if state.in_callback {
                return Err(AmmError::Reentrancy);
            }
            match state.holder {
                None => {
                    state.holder = Some(me);
                    return Ok(Entered { guard: self });
                }
                Some(owner) if owner == me => return Err(AmmError::Reentrancy),
                Some(_) => {
                    state = self
                        .released
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }
    }

    /// Returns `true` while some operation holds the guard.
    #[must_use]
    pub fn is_held(&self) -> bool {
        self.lock().holder.is_some()
    }

    /// Rejects every entry until the returned scope is dropped.
    pub(crate) fn callback_scope(&self) -> CallbackScope<'_> {
        self.lock().in_callback = true;
        CallbackScope { guard: self }
    }

    fn lock(&self) -> MutexGuard<'_, GuardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        let mut state = self.guard.lock();
        state.holder = None;
        state.in_callback = false;
        drop(state);
        self.guard.released.notify_one();
    }
}

impl Drop for CallbackScope<'_> {
    fn drop(&mut self) {
        self.guard.lock().in_callback = false;
    }
}
