//! Roll a die on a worker thread; the result comes back as a heap
//! allocation the joiner takes ownership of.

use std::ffi::c_void;

use frankenthreads_native::{RngContext, Thread};

extern "C" fn roll_dice(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at the RngContext owned by main, which
    // joins before dropping it.
    let rng = unsafe { &*(data as *const RngContext) };
    let value = rng.draw() % 6 + 1;
    Box::into_raw(Box::new(value)) as *mut c_void
}

fn main() {
    let rng = RngContext::seeded();
    let mut worker = Thread::new(roll_dice, &rng as *const RngContext as *mut c_void);
    // SAFETY: `rng` outlives the join below.
    unsafe { worker.create(None) }.expect("thread creation failed");
    worker.join().expect("thread join failed");

    let raw = worker.result();
    assert!(!raw.is_null());
    // SAFETY: the routine allocated this with Box::new; ownership
    // transferred to us at join.
    let value = unsafe { Box::from_raw(raw as *mut i32) };
    println!("rolled a {value}");
}
