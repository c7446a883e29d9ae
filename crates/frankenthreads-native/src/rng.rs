//! Thread-safe pseudo-random draws with an explicit lifecycle.
//!
//! A context object replacing the usual process-wide `rand()` state: the
//! generator state lives in the context, guarded by a mutex, so draws
//! from any thread are serialized and two contexts never share hidden
//! state. Construct to initialize, drop to tear down. Not a source of
//! cryptographic randomness.

use std::time::{SystemTime, UNIX_EPOCH};

use log::trace;

use parking_lot::Mutex;

use crate::thread;

/// Largest value [`RngContext::draw`] can return.
pub const RAND_MAX: i32 = 32_767;

/// Mutex-guarded linear-congruential generator (the classic C `rand`
/// recurrence).
pub struct RngContext {
    state: Mutex<u64>,
}

impl RngContext {
    /// A context starting from an explicit seed; the same seed yields
    /// the same draw sequence.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        trace!("rng_init");
        Self {
            state: Mutex::new(seed),
        }
    }

    /// A context seeded from wall time mixed with the calling thread's
    /// identity, so contexts created by different threads in the same
    /// second still diverge.
    #[must_use]
    pub fn seeded() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        Self::new(now ^ thread::current_id())
    }

    /// One draw in `0..=RAND_MAX`. Draws from concurrent threads are
    /// serialized by the internal mutex.
    pub fn draw(&self) -> i32 {
        trace!("rng_random");
        let mut state = self.state.lock();
        *state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        ((*state >> 16) % 32_768) as i32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
