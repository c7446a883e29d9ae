//! Platform variant selection.
//!
//! A closed set of per-platform variant modules behind one interface,
//! chosen at build time. Each variant exposes the same item names; the
//! public modules above this one never branch on the platform themselves
//! except where a primitive's very existence differs (see `barrier`).

#[cfg(unix)]
pub(crate) mod posix;
#[cfg(unix)]
pub(crate) use posix as imp;

#[cfg(windows)]
pub(crate) mod windows;
#[cfg(windows)]
pub(crate) use windows as imp;
