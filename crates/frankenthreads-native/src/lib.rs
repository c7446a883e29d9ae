//! # frankenthreads-native
//!
//! One uniform surface (thread lifecycle, mutex, condition variable,
//! read-write lock, barrier, counting semaphore) over two divergent
//! native threading models: POSIX pthreads and Win32.
//!
//! Where a platform provides a primitive natively, the layer forwards to
//! it one-to-one; where it does not, the primitive is emulated so the two
//! paths are indistinguishable to callers. A barrier is emulated on
//! Windows and Apple platforms from a mutex, a condition variable, and an
//! arrival ledger; a semaphore is emulated on Apple platforms through a
//! named kernel object. Thread return values are captured through
//! `pthread_join` where the OS plumbs them and through a trampoline where
//! it does not.
//!
//! Every blocking operation is a real OS-level blocking call with no
//! timeout; nothing retries. Fallible operations report
//! [`NativeError`] exactly once and leave the primitive in whatever state
//! the OS left it.

pub mod barrier;
pub mod cond;
pub mod mutex;
pub mod rng;
pub mod rwlock;
pub mod semaphore;
mod sys;
pub mod thread;

pub use frankenthreads_core::attr::{CondAttr, MutexAttr, ThreadAttr};
pub use frankenthreads_core::error::{NativeError, TryLockOutcome};

pub use barrier::Barrier;
pub use cond::Cond;
pub use mutex::Mutex;
pub use rng::RngContext;
pub use rwlock::RwLock;
pub use semaphore::Semaphore;
pub use thread::{Routine, Thread, current_id, exit_current};
