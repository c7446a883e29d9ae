//! Probe a held mutex with `try_lock` while a worker sleeps inside the
//! critical section.

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use frankenthreads_native::{Mutex, Thread, TryLockOutcome};

struct Shared {
    lock: Mutex,
    held: AtomicBool,
}

extern "C" fn hold_lock(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at the Shared owned by main, which
    // joins before dropping it.
    let shared = unsafe { &*(data as *const Shared) };
    shared.lock.lock().expect("worker lock failed");
    shared.held.store(true, Ordering::Release);
    std::thread::sleep(Duration::from_millis(300));
    shared.lock.unlock().expect("worker unlock failed");
    ptr::null_mut()
}

fn main() {
    let shared = Shared {
        lock: Mutex::init(None).expect("mutex initialization failed"),
        held: AtomicBool::new(false),
    };
    let mut worker = Thread::new(hold_lock, &shared as *const Shared as *mut c_void);
    // SAFETY: `shared` outlives the join below.
    unsafe { worker.create(None) }.expect("thread creation failed");

    while !shared.held.load(Ordering::Acquire) {
        std::thread::yield_now();
    }
    match shared.lock.try_lock().expect("trylock failed") {
        TryLockOutcome::Busy => println!("mutex is busy, doing something else"),
        TryLockOutcome::Acquired => {
            println!("acquired immediately");
            shared.lock.unlock().expect("unlock failed");
        }
    }

    worker.join().expect("thread join failed");
    println!("worker released the mutex");
}
