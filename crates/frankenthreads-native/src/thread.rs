//! Thread lifecycle manager.
//!
//! A [`Thread`] binds a routine and an opaque payload at construction,
//! starts OS execution on `create`, and yields the routine's return value
//! through `join`. Lifecycle misuse (double join, join after detach) is
//! caught by the portable transition contract and reported as an error
//! instead of reaching the native primitive's undefined behavior.

use std::ffi::c_void;
use std::ptr;

use log::trace;

use frankenthreads_core::attr::ThreadAttr;
use frankenthreads_core::errno;
use frankenthreads_core::error::NativeError;
use frankenthreads_core::thread::{ThreadOp, ThreadState, lifecycle_transition};

use crate::sys::imp;

/// A thread routine: one opaque caller-owned payload in, one
/// callee-allocated result out. The payload must outlive the thread; the
/// result's ownership transfers to whoever joins.
pub type Routine = extern "C" fn(*mut c_void) -> *mut c_void;

/// One OS thread: routine and payload bound at construction, result slot
/// valid after a successful `join`.
pub struct Thread {
    routine: Routine,
    payload: *mut c_void,
    state: ThreadState,
    repr: Option<imp::ThreadRepr>,
}

// SAFETY: the handle may move between threads; payload and result
// pointer validity is governed by the routine contract, not by which
// thread holds the handle.
unsafe impl Send for Thread {}

impl Thread {
    /// Binds `routine` and `payload` without starting execution.
    #[must_use]
    pub fn new(routine: Routine, payload: *mut c_void) -> Self {
        Self {
            routine,
            payload,
            state: ThreadState::Constructed,
            repr: None,
        }
    }

    /// Validates `op` against the lifecycle contract; the state is
    /// committed only after the native call succeeds.
    fn gate(&self, op: ThreadOp) -> Result<ThreadState, NativeError> {
        let outcome = lifecycle_transition(self.state, op);
        if outcome.errno != 0 {
            return Err(NativeError::new(outcome.errno));
        }
        Ok(outcome.next)
    }

    /// Starts OS execution, translating any supplied attributes. Only
    /// explicitly-set attribute fields are applied; the rest keep the
    /// native defaults. Never retries.
    ///
    /// # Safety
    ///
    /// The payload bound at construction must stay valid until the thread
    /// has exited (or forever, if the thread is detached and ignored).
    pub unsafe fn create(&mut self, attr: Option<&ThreadAttr>) -> Result<(), NativeError> {
        trace!("thread_create");
        let next = self.gate(ThreadOp::Create)?;
        // SAFETY: forwarded caller contract.
        let repr = unsafe { imp::spawn(self.routine, self.payload, attr)? };
        self.repr = Some(repr);
        self.state = next;
        Ok(())
    }

    /// Blocks until the thread exits. After `Ok`, [`Self::result`] is
    /// valid and owned by the caller.
    pub fn join(&mut self) -> Result<(), NativeError> {
        trace!("thread_join");
        let next = self.gate(ThreadOp::Join)?;
        let repr = self
            .repr
            .as_mut()
            .ok_or(NativeError::new(errno::EINVAL))?;
        imp::join(repr)?;
        self.state = next;
        Ok(())
    }

    /// Releases join responsibility; the thread cleans up autonomously.
    /// The result slot becomes unreachable.
    pub fn detach(&mut self) -> Result<(), NativeError> {
        trace!("thread_detach");
        let next = self.gate(ThreadOp::Detach)?;
        let repr = self
            .repr
            .as_mut()
            .ok_or(NativeError::new(errno::EINVAL))?;
        imp::detach(repr)?;
        self.state = next;
        Ok(())
    }

    /// Requests asynchronous termination. Semantics are the native ones:
    /// no cooperative cancellation point is guaranteed.
    #[cfg(not(target_os = "android"))]
    pub fn cancel(&self) -> Result<(), NativeError> {
        trace!("thread_cancel");
        self.gate(ThreadOp::Cancel)?;
        let repr = self
            .repr
            .as_ref()
            .ok_or(NativeError::new(errno::EINVAL))?;
        imp::cancel(repr)
    }

    /// Structural identity comparison of the native handles. Threads that
    /// were never created compare unequal to everything.
    #[must_use]
    pub fn equal(&self, other: &Thread) -> bool {
        match (&self.repr, &other.repr) {
            (Some(a), Some(b)) => imp::equal(a, b),
            _ => false,
        }
    }

    /// Uniform numeric identifier derived from the native handle; usable
    /// as a hash key or log field. Zero before `create`.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.repr.as_ref().map(imp::id).unwrap_or(0)
    }

    /// Pointer the routine returned (or passed to [`exit_current`]).
    /// Valid only after `join` returned `Ok`; reading it earlier races
    /// with the thread. The caller owns, and frees, whatever it points
    /// to. Null after detach or before join.
    #[must_use]
    pub fn result(&self) -> *mut c_void {
        match (&self.state, &self.repr) {
            (ThreadState::Joined, Some(repr)) => imp::result(repr),
            _ => ptr::null_mut(),
        }
    }

    /// Current lifecycle state, for diagnostics.
    #[must_use]
    pub fn state(&self) -> ThreadState {
        self.state
    }
}

/// Identity of the calling thread, for comparison and logging; never
/// aliases ownership of any handle.
#[must_use]
pub fn current_id() -> u64 {
    trace!("thread_self");
    imp::current_id()
}

/// Terminates the calling thread immediately, skipping the rest of its
/// routine, with `result` recorded through whichever capture path applies
/// to the platform.
///
/// # Safety
///
/// Live locals are not dropped and held locks stay held; call only where
/// nothing on the stack owns resources. On pthreads this forwards to
/// `pthread_exit`, whose unwind must not cross a non-unwinding frame —
/// in particular, the routine frame itself.
pub unsafe fn exit_current(result: *mut c_void) -> ! {
    trace!("thread_exit");
    // SAFETY: forwarded caller contract.
    unsafe { imp::exit(result) }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
