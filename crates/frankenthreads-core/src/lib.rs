//! # frankenthreads-core
//!
//! Platform-portable logic for the frankenthreads synchronization layer.
//!
//! This crate holds everything that does not touch an operating system:
//! errno constants, the library error type, attribute models with their
//! validators, the thread lifecycle contract, the read-write lock
//! held-mode tag, the barrier arrival ledger, and named-semaphore name
//! allocation. The OS forwarding itself lives in `frankenthreads-native`.
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod attr;
pub mod barrier;
pub mod errno;
pub mod error;
pub mod rwlock;
pub mod sem;
pub mod thread;
