//! Name allocation for the named-semaphore emulation.
//!
//! Platforms without unnamed semaphores back each instance with a named
//! kernel object. Names are process-unique (`/fts-<pid>-<seq>`, both in
//! hex) so that two instances initialized concurrently can never alias
//! the same kernel object.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

/// Apple's `PSEMNAMLEN`: named semaphore names are limited to 31 bytes.
pub const MAX_NAME_LEN: usize = 31;

static NAME_SEQ: AtomicU64 = AtomicU64::new(0);

/// Allocates a fresh kernel-object name, unique within this process and
/// distinguished across processes by pid.
///
/// Worst case is `/fts-` + 8 hex pid digits + `-` + 16 hex sequence
/// digits = 30 bytes, inside [`MAX_NAME_LEN`].
#[must_use]
pub fn unique_name() -> String {
    let seq = NAME_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("/fts-{:x}-{:x}", process::id(), seq)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let a = unique_name();
        let b = unique_name();
        assert_ne!(a, b);
    }

    #[test]
    fn names_are_slash_prefixed() {
        assert!(unique_name().starts_with("/fts-"));
    }

    #[test]
    fn names_fit_the_kernel_limit() {
        for _ in 0..64 {
            let name = unique_name();
            assert!(
                name.len() <= MAX_NAME_LEN,
                "name too long for sem_open: {name}"
            );
        }
    }

    #[test]
    fn names_embed_the_pid() {
        let pid = format!("{:x}", process::id());
        assert!(unique_name().contains(&pid));
    }
}
