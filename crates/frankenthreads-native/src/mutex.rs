//! Mutual exclusion lock: direct forwarding with attribute translation.

use log::trace;

use frankenthreads_core::attr::MutexAttr;
use frankenthreads_core::error::{NativeError, TryLockOutcome};

use crate::sys::imp;

/// A native mutex (`pthread_mutex_t` / `CRITICAL_SECTION`).
///
/// Unlocking from a thread that does not hold the lock is undefined,
/// inherited from the native primitive. Destruction happens on drop.
pub struct Mutex {
    raw: imp::RawMutex,
}

impl std::fmt::Debug for Mutex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mutex").finish_non_exhaustive()
    }
}

impl Mutex {
    /// Initializes the native mutex, applying only the attribute fields
    /// explicitly set in `attr`.
    pub fn init(attr: Option<&MutexAttr>) -> Result<Self, NativeError> {
        trace!("mutex_init");
        Ok(Self {
            raw: imp::RawMutex::init(attr)?,
        })
    }

    /// Blocks until the lock is acquired.
    pub fn lock(&self) -> Result<(), NativeError> {
        trace!("mutex_lock");
        self.raw.lock()
    }

    /// Non-blocking acquire. [`TryLockOutcome::Busy`] is the
    /// distinguished "already locked" result, not a failure.
    pub fn try_lock(&self) -> Result<TryLockOutcome, NativeError> {
        trace!("mutex_trylock");
        self.raw.try_lock()
    }

    pub fn unlock(&self) -> Result<(), NativeError> {
        trace!("mutex_unlock");
        self.raw.unlock()
    }

    pub(crate) fn raw(&self) -> &imp::RawMutex {
        &self.raw
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
