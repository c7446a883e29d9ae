//! The library error type and the distinguished try-lock result.

use thiserror::Error;

use crate::errno;

/// Failure reported by a native primitive call, carrying the errno-style
/// code the call returned (or, for library-detected misuse, one of the
/// constants in [`crate::errno`]).
///
/// Nothing in this layer retries: every failure is reported exactly once
/// to the immediate caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("native call failed (errno {errno})")]
pub struct NativeError {
    /// Errno-style code; platform numbering for OS-originated failures.
    pub errno: i32,
}

impl NativeError {
    #[must_use]
    pub const fn new(errno: i32) -> Self {
        Self { errno }
    }

    /// Library-detected invalid argument or contract violation.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            errno: errno::EINVAL,
        }
    }
}

/// Result of a non-blocking acquire.
///
/// `Busy` is not an error: it is the distinguished "already locked"
/// outcome that callers must check before treating lock failure as
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryLockOutcome {
    /// The primitive was acquired and must be released by the caller.
    Acquired,
    /// The primitive is currently held elsewhere; nothing was acquired.
    Busy,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
