//! Four workers meet at a barrier: every "reached" line prints before
//! any "passed" line of the same round.

use std::ffi::c_void;
use std::ptr;

use frankenthreads_native::{Barrier, Thread};

const PARTIES: usize = 4;
const ROUNDS: usize = 2;

struct Meeting {
    barrier: Barrier,
}

struct WorkerArg {
    meeting: *const Meeting,
    id: usize,
}

extern "C" fn meet(data: *mut c_void) -> *mut c_void {
    // SAFETY: the box was handed over by main via into_raw.
    let arg = unsafe { Box::from_raw(data as *mut WorkerArg) };
    // SAFETY: the Meeting outlives every worker; main joins first.
    let meeting = unsafe { &*arg.meeting };
    for round in 0..ROUNDS {
        println!("worker {} reached the barrier (round {round})", arg.id);
        meeting.barrier.wait().expect("barrier wait failed");
        println!("worker {} passed the barrier (round {round})", arg.id);
    }
    ptr::null_mut()
}

fn main() {
    let meeting = Meeting {
        barrier: Barrier::init(PARTIES as u32).expect("barrier initialization failed"),
    };

    let mut workers: Vec<Thread> = (0..PARTIES)
        .map(|id| {
            let arg = Box::new(WorkerArg {
                meeting: &meeting,
                id,
            });
            Thread::new(meet, Box::into_raw(arg) as *mut c_void)
        })
        .collect();
    for worker in &mut workers {
        // SAFETY: `meeting` outlives the joins below; each worker owns
        // its argument box.
        unsafe { worker.create(None) }.expect("thread creation failed");
    }
    for worker in &mut workers {
        worker.join().expect("thread join failed");
    }
}
