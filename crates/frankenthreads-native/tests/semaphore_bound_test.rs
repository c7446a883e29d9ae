//! Counting semaphore: at most `initial` holders sit between `wait` and
//! `post` at any moment, and separately initialized instances are
//! independent.

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::time::Duration;

use frankenthreads_native::{Semaphore, Thread, TryLockOutcome};

const PERMITS: i32 = 2;
const WAITERS: usize = 6;

struct Gate {
    sem: Semaphore,
    in_flight: AtomicI32,
    max_seen: AtomicI32,
    errors: AtomicU32,
}

extern "C" fn enter_leave(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at the Gate owned by the test, which
    // outlives every worker.
    let gate = unsafe { &*(data as *const Gate) };
    if gate.sem.wait().is_err() {
        gate.errors.fetch_add(1, Ordering::Relaxed);
        return ptr::null_mut();
    }
    let now = gate.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    gate.max_seen.fetch_max(now, Ordering::SeqCst);
    std::thread::sleep(Duration::from_millis(30));
    gate.in_flight.fetch_sub(1, Ordering::SeqCst);
    if gate.sem.post().is_err() {
        gate.errors.fetch_add(1, Ordering::Relaxed);
    }
    ptr::null_mut()
}

#[test]
fn at_most_initial_count_holders() {
    let gate = Gate {
        sem: Semaphore::init(PERMITS as u32).expect("sem init"),
        in_flight: AtomicI32::new(0),
        max_seen: AtomicI32::new(0),
        errors: AtomicU32::new(0),
    };
    let payload = &gate as *const Gate as *mut c_void;

    let mut workers: Vec<Thread> = (0..WAITERS).map(|_| Thread::new(enter_leave, payload)).collect();
    for worker in &mut workers {
        // SAFETY: `gate` outlives the joins below.
        unsafe { worker.create(None) }.expect("create");
    }
    for worker in &mut workers {
        worker.join().expect("join");
    }

    assert_eq!(gate.errors.load(Ordering::Relaxed), 0);
    let max = gate.max_seen.load(Ordering::SeqCst);
    assert!(max >= 1, "no worker ever entered");
    assert!(
        max <= PERMITS,
        "{max} workers were concurrently inside a {PERMITS}-permit semaphore"
    );
    assert_eq!(gate.in_flight.load(Ordering::SeqCst), 0);
}

#[test]
fn concurrently_initialized_semaphores_are_independent() {
    // Both carry one permit. If the two instances aliased one backing
    // object, draining the first would leave nothing for the second.
    let first = Semaphore::init(1).expect("first init");
    let second = Semaphore::init(1).expect("second init");

    first.wait().expect("drain first");
    assert_eq!(
        second.try_wait().expect("probe second"),
        TryLockOutcome::Acquired,
        "second instance lost its permit: instances alias one kernel object"
    );
    assert_eq!(first.try_wait().expect("probe first"), TryLockOutcome::Busy);

    second.post().expect("post second");
    first.post().expect("post first");
}
