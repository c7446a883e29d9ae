//! Condition variable: direct forwarding with attribute translation.

use log::trace;

use frankenthreads_core::attr::CondAttr;
use frankenthreads_core::error::NativeError;

use crate::mutex::Mutex;
use crate::sys::imp;

/// A native condition variable, always paired with a held [`Mutex`] at
/// wait time.
pub struct Cond {
    raw: imp::RawCond,
}

impl Cond {
    pub fn init(attr: Option<&CondAttr>) -> Result<Self, NativeError> {
        trace!("cond_init");
        Ok(Self {
            raw: imp::RawCond::init(attr)?,
        })
    }

    /// Atomically releases `mutex` and blocks until signaled; the mutex
    /// is re-acquired before this returns. The caller must hold `mutex`.
    /// Wakeups may be spurious; callers re-check their predicate.
    pub fn wait(&self, mutex: &Mutex) -> Result<(), NativeError> {
        trace!("cond_wait");
        self.raw.wait(mutex.raw())
    }

    /// Wakes at most one current waiter.
    pub fn signal(&self) -> Result<(), NativeError> {
        trace!("cond_signal");
        self.raw.signal()
    }

    /// Wakes all current waiters. No ordering among them is guaranteed
    /// beyond what the OS provides.
    pub fn broadcast(&self) -> Result<(), NativeError> {
        trace!("cond_broadcast");
        self.raw.broadcast()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_without_waiters_is_ok() {
        let cond = Cond::init(None).expect("init");
        cond.signal().expect("signal");
        cond.broadcast().expect("broadcast");
    }

    #[cfg(unix)]
    #[test]
    fn monotonic_clock_attr_is_accepted() {
        use frankenthreads_core::attr;

        let attr = CondAttr {
            clock: attr::COND_CLOCK_MONOTONIC,
            ..CondAttr::default()
        };
        let _cond = Cond::init(Some(&attr)).expect("init");
    }
}
