//! Read-write lock held-mode tag.
//!
//! `SRWLOCK` does not self-describe the mode it was acquired in, so the
//! Win32 variant records the most recent acquire in this tag and release
//! dispatches from it. The tag is per-lock, not per-holder: concurrent
//! shared holders all observe `SharedHeld`, which is exactly enough to
//! pick the right native release call.

/// Mode the lock was most recently acquired in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeldMode {
    /// Not held, or already released; releasing in this mode is misuse.
    #[default]
    Unlocked,
    /// Last acquire was shared (read).
    SharedHeld,
    /// Last acquire was exclusive (write).
    ExclusiveHeld,
}

/// Which native release call to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Shared,
    Exclusive,
}

impl HeldMode {
    /// Release dispatch for the recorded mode; `None` means nothing is
    /// recorded as held and the release must be rejected.
    #[must_use]
    pub const fn release_dispatch(self) -> Option<ReleaseKind> {
        match self {
            HeldMode::Unlocked => None,
            HeldMode::SharedHeld => Some(ReleaseKind::Shared),
            HeldMode::ExclusiveHeld => Some(ReleaseKind::Exclusive),
        }
    }

    /// Encoding for atomic storage.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            HeldMode::Unlocked => 0,
            HeldMode::SharedHeld => 1,
            HeldMode::ExclusiveHeld => 2,
        }
    }

    /// Inverse of [`Self::as_u8`]; unknown encodings decode as unlocked.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => HeldMode::SharedHeld,
            2 => HeldMode::ExclusiveHeld,
            _ => HeldMode::Unlocked,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_dispatch_table() {
        assert_eq!(HeldMode::Unlocked.release_dispatch(), None);
        assert_eq!(
            HeldMode::SharedHeld.release_dispatch(),
            Some(ReleaseKind::Shared)
        );
        assert_eq!(
            HeldMode::ExclusiveHeld.release_dispatch(),
            Some(ReleaseKind::Exclusive)
        );
    }

    #[test]
    fn u8_round_trip() {
        for mode in [
            HeldMode::Unlocked,
            HeldMode::SharedHeld,
            HeldMode::ExclusiveHeld,
        ] {
            assert_eq!(HeldMode::from_u8(mode.as_u8()), mode);
        }
    }

    #[test]
    fn unknown_encoding_decodes_unlocked() {
        assert_eq!(HeldMode::from_u8(250), HeldMode::Unlocked);
    }

    #[test]
    fn default_is_unlocked() {
        assert_eq!(HeldMode::default(), HeldMode::Unlocked);
    }
}
