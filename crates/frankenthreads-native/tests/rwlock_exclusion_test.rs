//! Read-write lock: shared holders coexist, exclusive holders exclude
//! everyone. Coexistence is proved deterministically by parking all
//! readers at a barrier while they hold the read lock.
//!
//! The concurrent-reader scenarios run where the native lock
//! self-describes its held mode; the tagged release path records one
//! mode per lock and is exercised by the single-holder tests.

#![cfg(unix)]

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

use frankenthreads_native::{Barrier, RwLock, Thread};

const READERS: usize = 3;

struct ReadGroup {
    rw: RwLock,
    all_reading: Barrier,
    errors: AtomicU32,
}

extern "C" fn read_and_meet(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at the ReadGroup owned by the test,
    // which outlives every worker.
    let group = unsafe { &*(data as *const ReadGroup) };
    if group.rw.rd_lock().is_err() {
        group.errors.fetch_add(1, Ordering::Relaxed);
        return ptr::null_mut();
    }
    // Reaching the barrier requires every reader to hold the lock at
    // the same time.
    if group.all_reading.wait().is_err() {
        group.errors.fetch_add(1, Ordering::Relaxed);
    }
    if group.rw.unlock().is_err() {
        group.errors.fetch_add(1, Ordering::Relaxed);
    }
    ptr::null_mut()
}

#[test]
fn readers_coexist() {
    let group = ReadGroup {
        rw: RwLock::init().expect("rwlock init"),
        all_reading: Barrier::init(READERS as u32).expect("barrier init"),
        errors: AtomicU32::new(0),
    };
    let payload = &group as *const ReadGroup as *mut c_void;

    let mut workers: Vec<Thread> = (0..READERS)
        .map(|_| Thread::new(read_and_meet, payload))
        .collect();
    for worker in &mut workers {
        // SAFETY: `group` outlives the joins below.
        unsafe { worker.create(None) }.expect("create");
    }
    for worker in &mut workers {
        worker.join().expect("join");
    }
    assert_eq!(
        group.errors.load(Ordering::Relaxed),
        0,
        "readers failed to hold the lock simultaneously"
    );
}

struct MixedGroup {
    rw: RwLock,
    readers_in: AtomicI32,
    writer_in: AtomicI32,
    violations: AtomicU32,
    errors: AtomicU32,
}

extern "C" fn reader_cycles(data: *mut c_void) -> *mut c_void {
    // SAFETY: as above.
    let group = unsafe { &*(data as *const MixedGroup) };
    for _ in 0..200 {
        if group.rw.rd_lock().is_err() {
            group.errors.fetch_add(1, Ordering::Relaxed);
            return ptr::null_mut();
        }
        group.readers_in.fetch_add(1, Ordering::SeqCst);
        if group.writer_in.load(Ordering::SeqCst) != 0 {
            group.violations.fetch_add(1, Ordering::Relaxed);
        }
        group.readers_in.fetch_sub(1, Ordering::SeqCst);
        if group.rw.unlock().is_err() {
            group.errors.fetch_add(1, Ordering::Relaxed);
            return ptr::null_mut();
        }
    }
    ptr::null_mut()
}

extern "C" fn writer_cycles(data: *mut c_void) -> *mut c_void {
    // SAFETY: as above.
    let group = unsafe { &*(data as *const MixedGroup) };
    for _ in 0..100 {
        if group.rw.wr_lock().is_err() {
            group.errors.fetch_add(1, Ordering::Relaxed);
            return ptr::null_mut();
        }
        if group.readers_in.load(Ordering::SeqCst) != 0
            || group.writer_in.swap(1, Ordering::SeqCst) != 0
        {
            group.violations.fetch_add(1, Ordering::Relaxed);
        }
        group.writer_in.store(0, Ordering::SeqCst);
        if group.rw.unlock().is_err() {
            group.errors.fetch_add(1, Ordering::Relaxed);
            return ptr::null_mut();
        }
    }
    ptr::null_mut()
}

#[test]
fn writer_excludes_readers_and_writers() {
    let group = MixedGroup {
        rw: RwLock::init().expect("rwlock init"),
        readers_in: AtomicI32::new(0),
        writer_in: AtomicI32::new(0),
        violations: AtomicU32::new(0),
        errors: AtomicU32::new(0),
    };
    let payload = &group as *const MixedGroup as *mut c_void;

    let mut workers: Vec<Thread> = Vec::new();
    for _ in 0..2 {
        workers.push(Thread::new(reader_cycles, payload));
    }
    workers.push(Thread::new(writer_cycles, payload));
    workers.push(Thread::new(writer_cycles, payload));
    for worker in &mut workers {
        // SAFETY: `group` outlives the joins below.
        unsafe { worker.create(None) }.expect("create");
    }
    for worker in &mut workers {
        worker.join().expect("join");
    }

    assert_eq!(group.errors.load(Ordering::Relaxed), 0);
    assert_eq!(
        group.violations.load(Ordering::Relaxed),
        0,
        "an exclusive holder coexisted with another holder"
    );
}
