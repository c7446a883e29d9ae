//! Mutual exclusion under load: concurrent increments never lose updates
//! and `try_lock` distinguishes busy from failure.

use std::cell::UnsafeCell;
use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use frankenthreads_native::{Mutex, Thread, TryLockOutcome};

struct Counter {
    lock: Mutex,
    value: UnsafeCell<u64>,
    errors: AtomicU32,
}

// SAFETY: `value` is only accessed while `lock` is held.
unsafe impl Sync for Counter {}

extern "C" fn add_one(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at the Counter owned by the test, which
    // outlives every worker.
    let counter = unsafe { &*(data as *const Counter) };
    if counter.lock.lock().is_err() {
        counter.errors.fetch_add(1, Ordering::Relaxed);
        return ptr::null_mut();
    }
    // SAFETY: the lock is held.
    unsafe { *counter.value.get() += 1 };
    if counter.lock.unlock().is_err() {
        counter.errors.fetch_add(1, Ordering::Relaxed);
    }
    ptr::null_mut()
}

#[test]
fn four_threads_each_increment_once() {
    let counter = Counter {
        lock: Mutex::init(None).expect("mutex init"),
        value: UnsafeCell::new(0),
        errors: AtomicU32::new(0),
    };
    let payload = &counter as *const Counter as *mut c_void;

    let mut workers: Vec<Thread> = (0..4).map(|_| Thread::new(add_one, payload)).collect();
    for worker in &mut workers {
        // SAFETY: `counter` outlives the joins below.
        unsafe { worker.create(None) }.expect("create");
    }
    for worker in &mut workers {
        worker.join().expect("join");
    }

    assert_eq!(counter.errors.load(Ordering::Relaxed), 0);
    // SAFETY: all workers joined; no concurrent access remains.
    assert_eq!(unsafe { *counter.value.get() }, 4);
}

struct Holder {
    lock: Mutex,
    held: AtomicU32,
}

extern "C" fn hold_briefly(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at the Holder owned by the test.
    let holder = unsafe { &*(data as *const Holder) };
    if holder.lock.lock().is_err() {
        return ptr::null_mut();
    }
    holder.held.store(1, Ordering::Release);
    std::thread::sleep(Duration::from_millis(150));
    holder.held.store(0, Ordering::Release);
    let _ = holder.lock.unlock();
    ptr::null_mut()
}

#[test]
fn try_lock_reports_busy_while_held() {
    let holder = Holder {
        lock: Mutex::init(None).expect("mutex init"),
        held: AtomicU32::new(0),
    };
    let payload = &holder as *const Holder as *mut c_void;

    let mut worker = Thread::new(hold_briefly, payload);
    // SAFETY: `holder` outlives the join below.
    unsafe { worker.create(None) }.expect("create");

    while holder.held.load(Ordering::Acquire) == 0 {
        std::thread::yield_now();
    }
    assert_eq!(
        holder.lock.try_lock().expect("trylock"),
        TryLockOutcome::Busy,
        "a held mutex must report busy, not failure"
    );

    worker.join().expect("join");
    assert_eq!(
        holder.lock.try_lock().expect("trylock"),
        TryLockOutcome::Acquired
    );
    holder.lock.unlock().expect("unlock");
}
