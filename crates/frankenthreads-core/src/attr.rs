//! Attribute models for threads, mutexes, and condition variables.
//!
//! Attribute structs are platform-specific variants selected at build
//! time; the recognized option set matches what the corresponding native
//! attribute object accepts on that platform. A field value of zero means
//! "unset": only explicitly-set fields are translated to the native
//! attribute object, everything else keeps the native default.
//!
//! The constants below are the portable encodings; the native layer maps
//! them to the platform's own values at translation time.

#[cfg(unix)]
use crate::errno;

// ---------------------------------------------------------------------------
// Portable option encodings (0 = unset everywhere)
// ---------------------------------------------------------------------------

pub const DETACH_STATE_UNSET: i32 = 0;
/// Thread starts joinable (the native default, but expressible).
pub const DETACH_STATE_JOINABLE: i32 = 1;
/// Thread starts detached; it can never be joined.
pub const DETACH_STATE_DETACHED: i32 = 2;

pub const PSHARED_UNSET: i32 = 0;
/// Primitive is private to the creating process (native default).
pub const PSHARED_PRIVATE: i32 = 1;
/// Primitive may be placed in shared memory and used across processes.
pub const PSHARED_SHARED: i32 = 2;

pub const MUTEX_KIND_UNSET: i32 = 0;
/// No error checking, no recursive locking.
pub const MUTEX_KIND_NORMAL: i32 = 1;
/// The owning thread can re-lock without deadlock.
pub const MUTEX_KIND_RECURSIVE: i32 = 2;
/// Relocking and unheld unlock are reported instead of undefined.
pub const MUTEX_KIND_ERRORCHECK: i32 = 3;

pub const MUTEX_ROBUST_UNSET: i32 = 0;
/// Waiters stall if the owner dies holding the mutex (native default).
pub const MUTEX_ROBUST_STALLED: i32 = 1;
/// Waiters are notified if the owner dies holding the mutex.
pub const MUTEX_ROBUST_ROBUST: i32 = 2;

pub const MUTEX_PROTOCOL_UNSET: i32 = 0;
pub const MUTEX_PROTOCOL_NONE: i32 = 1;
/// Priority inheritance.
pub const MUTEX_PROTOCOL_INHERIT: i32 = 2;
/// Priority ceiling protection.
pub const MUTEX_PROTOCOL_PROTECT: i32 = 3;

pub const COND_CLOCK_UNSET: i32 = 0;
/// Wall clock (native default).
pub const COND_CLOCK_REALTIME: i32 = 1;
/// Monotonic clock.
pub const COND_CLOCK_MONOTONIC: i32 = 2;

pub const SCHED_POLICY_UNSET: i32 = 0;
pub const SCHED_POLICY_OTHER: i32 = 1;
pub const SCHED_POLICY_FIFO: i32 = 2;
pub const SCHED_POLICY_RR: i32 = 3;

pub const INHERIT_SCHED_UNSET: i32 = 0;
/// Inherit scheduling attributes from the creating thread.
pub const INHERIT_SCHED_INHERIT: i32 = 1;
/// Take scheduling attributes from the attribute object.
pub const INHERIT_SCHED_EXPLICIT: i32 = 2;

pub const SCOPE_UNSET: i32 = 0;
/// Contend with every thread on the system.
pub const SCOPE_SYSTEM: i32 = 1;
/// Contend only with threads in the same process.
pub const SCOPE_PROCESS: i32 = 2;

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// Returns true if `state` is unset or a recognized detach state.
#[must_use]
pub const fn valid_detach_state(state: i32) -> bool {
    matches!(
        state,
        DETACH_STATE_UNSET | DETACH_STATE_JOINABLE | DETACH_STATE_DETACHED
    )
}

/// Returns true if `pshared` is unset or a recognized sharing mode.
#[must_use]
pub const fn valid_pshared(pshared: i32) -> bool {
    matches!(pshared, PSHARED_UNSET | PSHARED_PRIVATE | PSHARED_SHARED)
}

/// Returns true if `kind` is unset or a recognized mutex kind.
#[must_use]
pub const fn valid_mutex_kind(kind: i32) -> bool {
    matches!(
        kind,
        MUTEX_KIND_UNSET | MUTEX_KIND_NORMAL | MUTEX_KIND_RECURSIVE | MUTEX_KIND_ERRORCHECK
    )
}

/// Sanitize a mutex kind: if unknown, fall back to unset.
#[must_use]
pub const fn sanitize_mutex_kind(kind: i32) -> i32 {
    if valid_mutex_kind(kind) {
        kind
    } else {
        MUTEX_KIND_UNSET
    }
}

/// Returns true if `robust` is unset or a recognized robustness mode.
#[must_use]
pub const fn valid_mutex_robust(robust: i32) -> bool {
    matches!(
        robust,
        MUTEX_ROBUST_UNSET | MUTEX_ROBUST_STALLED | MUTEX_ROBUST_ROBUST
    )
}

/// Returns true if `protocol` is unset or a recognized priority protocol.
#[must_use]
pub const fn valid_mutex_protocol(protocol: i32) -> bool {
    matches!(
        protocol,
        MUTEX_PROTOCOL_UNSET | MUTEX_PROTOCOL_NONE | MUTEX_PROTOCOL_INHERIT | MUTEX_PROTOCOL_PROTECT
    )
}

/// Returns true if `clock` is unset or a recognized condvar clock.
#[must_use]
pub const fn valid_cond_clock(clock: i32) -> bool {
    matches!(
        clock,
        COND_CLOCK_UNSET | COND_CLOCK_REALTIME | COND_CLOCK_MONOTONIC
    )
}

/// Sanitize a condvar clock: if unknown, fall back to unset.
#[must_use]
pub const fn sanitize_cond_clock(clock: i32) -> i32 {
    if valid_cond_clock(clock) {
        clock
    } else {
        COND_CLOCK_UNSET
    }
}

/// Returns true if `policy` is unset or a recognized scheduling policy.
#[must_use]
pub const fn valid_sched_policy(policy: i32) -> bool {
    matches!(
        policy,
        SCHED_POLICY_UNSET | SCHED_POLICY_OTHER | SCHED_POLICY_FIFO | SCHED_POLICY_RR
    )
}

/// Returns true if `inherit` is unset or a recognized inheritance mode.
#[must_use]
pub const fn valid_inherit_sched(inherit: i32) -> bool {
    matches!(
        inherit,
        INHERIT_SCHED_UNSET | INHERIT_SCHED_INHERIT | INHERIT_SCHED_EXPLICIT
    )
}

/// Returns true if `scope` is unset or a recognized contention scope.
#[must_use]
pub const fn valid_scope(scope: i32) -> bool {
    matches!(scope, SCOPE_UNSET | SCOPE_SYSTEM | SCOPE_PROCESS)
}

// ---------------------------------------------------------------------------
// POSIX attribute variants
// ---------------------------------------------------------------------------

/// Thread creation attributes, POSIX variant.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadAttr {
    /// Stack size in bytes; 0 keeps the native default.
    pub stack_size: usize,
    /// Explicit stack base address for [`Self::stack`] placement; 0 unset.
    pub stack_addr: usize,
    /// Explicit stack region size; non-zero enables placement at
    /// [`Self::stack_addr`]. Applied on Linux/gnu only.
    pub stack: usize,
    /// One of the `DETACH_STATE_*` constants.
    pub detach_state: i32,
    /// Guard region size in bytes; 0 keeps the native default.
    pub guard_size: usize,
    /// One of the `INHERIT_SCHED_*` constants. Applied on Linux/gnu only.
    pub inherit_sched: i32,
    /// One of the `SCHED_POLICY_*` constants. Applied on Linux/gnu only.
    pub sched_policy: i32,
    /// One of the `SCOPE_*` constants. Applied on Linux/gnu only.
    pub scope: i32,
}

/// Mutex attributes, POSIX variant.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutexAttr {
    /// One of the `PSHARED_*` constants.
    pub pshared: i32,
    /// One of the `MUTEX_KIND_*` constants.
    pub kind: i32,
    /// One of the `MUTEX_ROBUST_*` constants. Applied on Linux/gnu only.
    pub robust: i32,
    /// One of the `MUTEX_PROTOCOL_*` constants. Applied on Linux/gnu only.
    pub protocol: i32,
    /// Priority ceiling for `MUTEX_PROTOCOL_PROTECT`; 0 unset. Applied on
    /// Linux/gnu only.
    pub prioceiling: i32,
}

/// Condition variable attributes, POSIX variant.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CondAttr {
    /// One of the `PSHARED_*` constants.
    pub pshared: i32,
    /// One of the `COND_CLOCK_*` constants. Applied on Linux/gnu only.
    pub clock: i32,
}

// ---------------------------------------------------------------------------
// Windows attribute variants
// ---------------------------------------------------------------------------

/// Thread creation attributes, Win32 variant.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadAttr {
    /// Stack size in bytes; 0 keeps the native default.
    pub stack_size: usize,
    /// Raw `dwCreationFlags` value passed through to `CreateThread`.
    pub creation_flags: u32,
}

/// Mutex attributes, Win32 variant. `CRITICAL_SECTION` takes none.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutexAttr {}

/// Condition variable attributes, Win32 variant. Takes none.
#[cfg(windows)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CondAttr {}

// ---------------------------------------------------------------------------
// Whole-struct validation (errno-style, 0 = accepted)
// ---------------------------------------------------------------------------

/// Errno for a thread attribute struct: `EINVAL` if any set field carries
/// an unrecognized encoding, 0 otherwise.
#[cfg(unix)]
#[must_use]
pub const fn thread_attr_errno(attr: &ThreadAttr) -> i32 {
    if valid_detach_state(attr.detach_state)
        && valid_inherit_sched(attr.inherit_sched)
        && valid_sched_policy(attr.sched_policy)
        && valid_scope(attr.scope)
    {
        0
    } else {
        errno::EINVAL
    }
}

#[cfg(windows)]
#[must_use]
pub const fn thread_attr_errno(_attr: &ThreadAttr) -> i32 {
    0
}

/// Errno for a mutex attribute struct.
#[cfg(unix)]
#[must_use]
pub const fn mutex_attr_errno(attr: &MutexAttr) -> i32 {
    if valid_pshared(attr.pshared)
        && valid_mutex_kind(attr.kind)
        && valid_mutex_robust(attr.robust)
        && valid_mutex_protocol(attr.protocol)
    {
        0
    } else {
        errno::EINVAL
    }
}

#[cfg(windows)]
#[must_use]
pub const fn mutex_attr_errno(_attr: &MutexAttr) -> i32 {
    0
}

/// Errno for a condition variable attribute struct.
#[cfg(unix)]
#[must_use]
pub const fn cond_attr_errno(attr: &CondAttr) -> i32 {
    if valid_pshared(attr.pshared) && valid_cond_clock(attr.clock) {
        0
    } else {
        errno::EINVAL
    }
}

#[cfg(windows)]
#[must_use]
pub const fn cond_attr_errno(_attr: &CondAttr) -> i32 {
    0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
