//! Sum 0..=N on a worker thread; N comes from the command line.

use std::env;
use std::ffi::c_void;
use std::ptr;

use frankenthreads_native::Thread;

struct SumJob {
    upper: u64,
    total: u64,
}

extern "C" fn summation(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at the SumJob owned by main, which
    // joins before reading it.
    let job = unsafe { &mut *(data as *mut SumJob) };
    for term in 0..=job.upper {
        job.total += term;
    }
    ptr::null_mut()
}

fn main() {
    let upper: u64 = env::args()
        .nth(1)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1_000);

    let mut job = SumJob { upper, total: 0 };
    let mut worker = Thread::new(summation, &mut job as *mut SumJob as *mut c_void);
    // SAFETY: `job` outlives the join below.
    unsafe { worker.create(None) }.expect("thread creation failed");
    worker.join().expect("thread join failed");

    println!("sum = {}", job.total);
}
