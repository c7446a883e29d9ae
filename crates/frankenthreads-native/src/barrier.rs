//! Barrier: rendezvous for a fixed number of parties.
//!
//! Linux and the BSDs have a native barrier and get direct forwarding.
//! Windows and Apple platforms do not; there the barrier is emulated
//! with a private mutex, a condition variable, and the core arrival
//! ledger. The two paths are indistinguishable to callers: `wait`
//! releases all parties when the `trip_count`-th arrives, the releasing
//! arrival proceeds without suspending, and the barrier is immediately
//! reusable for the next round.

use log::trace;

use frankenthreads_core::error::NativeError;

#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
use std::cell::UnsafeCell;

#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
use frankenthreads_core::barrier::{Arrival, BarrierLedger};

#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
use crate::cond::Cond;
#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
use crate::mutex::Mutex;

#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
use crate::sys::imp;

// ---------------------------------------------------------------------------
// Native path
// ---------------------------------------------------------------------------

/// A rendezvous barrier for a fixed, positive number of parties.
#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
pub struct Barrier {
    raw: imp::RawBarrier,
}

#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
impl std::fmt::Debug for Barrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Barrier").finish_non_exhaustive()
    }
}

#[cfg(not(any(windows, target_os = "macos", target_os = "ios")))]
impl Barrier {
    /// A barrier releasing once `trip_count` parties have arrived.
    /// A zero trip count is rejected with `EINVAL`.
    pub fn init(trip_count: u32) -> Result<Self, NativeError> {
        trace!("barrier_init");
        Ok(Self {
            raw: imp::RawBarrier::init(trip_count)?,
        })
    }

    /// Blocks until `trip_count` parties have called `wait` for this
    /// round, then releases them all.
    pub fn wait(&self) -> Result<(), NativeError> {
        trace!("barrier_wait");
        self.raw.wait()
    }
}

// ---------------------------------------------------------------------------
// Emulated path
// ---------------------------------------------------------------------------

/// A rendezvous barrier for a fixed, positive number of parties.
#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
pub struct Barrier {
    lock: Mutex,
    cond: Cond,
    ledger: UnsafeCell<BarrierLedger>,
}

// SAFETY: the ledger is read and written only while `lock` is held.
#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
unsafe impl Send for Barrier {}
#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
unsafe impl Sync for Barrier {}

#[cfg(any(windows, target_os = "macos", target_os = "ios"))]
impl Barrier {
    /// A barrier releasing once `trip_count` parties have arrived.
    /// A zero trip count is rejected with `EINVAL`.
    pub fn init(trip_count: u32) -> Result<Self, NativeError> {
        trace!("barrier_init");
        Ok(Self {
            lock: Mutex::init(None)?,
            cond: Cond::init(None)?,
            ledger: UnsafeCell::new(BarrierLedger::new(trip_count)?),
        })
    }

    /// Blocks until `trip_count` parties have called `wait` for this
    /// round, then releases them all. The completing arrival broadcasts
    /// and proceeds without suspending; the others wait until their
    /// round closes, re-checking after every wakeup.
    pub fn wait(&self) -> Result<(), NativeError> {
        trace!("barrier_wait");
        self.lock.lock()?;
        // SAFETY: ledger access is serialized by `lock`, held here.
        let arrival = unsafe { (*self.ledger.get()).arrive() };
        match arrival {
            Arrival::ReleaseAll => {
                self.cond.broadcast()?;
                self.lock.unlock()
            }
            Arrival::Wait { generation } => {
                // SAFETY: as above; the lock is re-held after each wait.
                while unsafe { (*self.ledger.get()).round_open(generation) } {
                    self.cond.wait(&self.lock)?;
                }
                self.lock.unlock()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use frankenthreads_core::errno;

    #[test]
    fn zero_trip_count_is_einval() {
        let err = Barrier::init(0).expect_err("init must fail");
        assert_eq!(err.errno, errno::EINVAL);
    }

    #[test]
    fn single_party_barrier_never_blocks() {
        let barrier = Barrier::init(1).expect("init");
        for _ in 0..3 {
            barrier.wait().expect("wait");
        }
    }
}
