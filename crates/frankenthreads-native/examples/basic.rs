//! Create one worker, hand it a payload, join it.

use std::ffi::c_void;
use std::ptr;

use frankenthreads_native::Thread;

extern "C" fn greet(data: *mut c_void) -> *mut c_void {
    let id = data as usize;
    println!("hello from worker {id}");
    ptr::null_mut()
}

fn main() {
    let mut worker = Thread::new(greet, 1_usize as *mut c_void);
    // SAFETY: the payload is a plain integer, never dereferenced.
    unsafe { worker.create(None) }.expect("thread creation failed");
    worker.join().expect("thread join failed");
    println!("worker {} joined", worker.id());
}
