//! Read-write lock.
//!
//! Forwards to the native primitive. On POSIX the lock self-describes
//! its held mode and release is a single native call; on Windows the
//! acquired mode is recorded in an explicit tag and release dispatches
//! from it (see `frankenthreads-core::rwlock`).

use log::trace;

use frankenthreads_core::error::NativeError;

use crate::sys::imp;

/// A native reader-writer lock. Multiple concurrent shared holders are
/// permitted; an exclusive holder excludes everyone.
pub struct RwLock {
    raw: imp::RawRwLock,
}

impl RwLock {
    pub fn init() -> Result<Self, NativeError> {
        trace!("rwlock_init");
        Ok(Self {
            raw: imp::RawRwLock::init()?,
        })
    }

    /// Acquires in shared mode; blocks while an exclusive holder exists.
    pub fn rd_lock(&self) -> Result<(), NativeError> {
        trace!("rwlock_rdlock");
        self.raw.rd_lock()
    }

    /// Acquires in exclusive mode; blocks until no holder remains.
    pub fn wr_lock(&self) -> Result<(), NativeError> {
        trace!("rwlock_wrlock");
        self.raw.wr_lock()
    }

    /// Releases the most recently recorded mode.
    pub fn unlock(&self) -> Result<(), NativeError> {
        trace!("rwlock_unlock");
        self.raw.unlock()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
