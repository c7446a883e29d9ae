//! A login queue: sixteen users contend for four seats guarded by a
//! counting semaphore, with randomized session lengths.

use std::ffi::c_void;
use std::ptr;
use std::time::Duration;

use frankenthreads_native::{RngContext, Semaphore, Thread};

const USERS: usize = 16;
const SEATS: u32 = 4;

struct Desk {
    seats: Semaphore,
    rng: RngContext,
}

struct WorkerArg {
    desk: *const Desk,
    id: usize,
}

extern "C" fn login_session(data: *mut c_void) -> *mut c_void {
    // SAFETY: the box was handed over by main via into_raw.
    let arg = unsafe { Box::from_raw(data as *mut WorkerArg) };
    // SAFETY: the Desk outlives every worker; main joins first.
    let desk = unsafe { &*arg.desk };

    println!("({}) waiting in the login queue", arg.id);
    desk.seats.wait().expect("semaphore wait failed");

    println!("({}) logged in", arg.id);
    let session_ms = (desk.rng.draw() % 5 + 1) * 50;
    std::thread::sleep(Duration::from_millis(session_ms as u64));
    println!("({}) logged out", arg.id);

    desk.seats.post().expect("semaphore post failed");
    ptr::null_mut()
}

fn main() {
    let desk = Desk {
        seats: Semaphore::init(SEATS).expect("semaphore initialization failed"),
        rng: RngContext::seeded(),
    };

    let mut workers: Vec<Thread> = (0..USERS)
        .map(|id| {
            let arg = Box::new(WorkerArg { desk: &desk, id });
            Thread::new(login_session, Box::into_raw(arg) as *mut c_void)
        })
        .collect();
    for worker in &mut workers {
        // SAFETY: `desk` outlives the joins below; each worker owns its
        // argument box.
        unsafe { worker.create(None) }.expect("thread creation failed");
    }
    for worker in &mut workers {
        worker.join().expect("thread join failed");
    }
}
