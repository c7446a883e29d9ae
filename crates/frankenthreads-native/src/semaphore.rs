//! Counting semaphore.
//!
//! Direct forwarding to the OS counting semaphore where one exists
//! (`sem_init` on Linux/BSD, a kernel semaphore object on Windows).
//! Apple platforms lack unnamed semaphores; there each instance is
//! backed by a named kernel object created under a process-unique name,
//! so concurrently initialized instances are independent.

use log::trace;

use frankenthreads_core::error::{NativeError, TryLockOutcome};

use crate::sys::imp;

/// A counting semaphore with the requested initial count. The count is
/// bounded below by zero and above by the native implementation maximum.
pub struct Semaphore {
    raw: imp::RawSemaphore,
}

impl Semaphore {
    pub fn init(initial: u32) -> Result<Self, NativeError> {
        trace!("semaphore_init");
        Ok(Self {
            raw: imp::RawSemaphore::init(initial)?,
        })
    }

    /// Decrements the count, blocking while it is zero.
    pub fn wait(&self) -> Result<(), NativeError> {
        trace!("semaphore_wait");
        self.raw.wait()
    }

    /// Non-blocking decrement. [`TryLockOutcome::Busy`] means the count
    /// was zero; nothing was acquired.
    pub fn try_wait(&self) -> Result<TryLockOutcome, NativeError> {
        trace!("semaphore_trywait");
        self.raw.try_wait()
    }

    /// Increments the count, possibly unblocking one waiter.
    pub fn post(&self) -> Result<(), NativeError> {
        trace!("semaphore_post");
        self.raw.post()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
