//! Readers share a board under a read-write lock while a writer updates
//! it.

use std::cell::UnsafeCell;
use std::ffi::c_void;
use std::ptr;
use std::time::Duration;

use frankenthreads_native::{RwLock, Thread};

struct Board {
    rw: RwLock,
    value: UnsafeCell<i32>,
}

// SAFETY: `value` is only accessed while `rw` is held in the matching
// mode.
unsafe impl Sync for Board {}

struct WorkerArg {
    board: *const Board,
    id: usize,
}

extern "C" fn reader(data: *mut c_void) -> *mut c_void {
    // SAFETY: the box was handed over by main via into_raw.
    let arg = unsafe { Box::from_raw(data as *mut WorkerArg) };
    // SAFETY: the Board outlives every worker; main joins first.
    let board = unsafe { &*arg.board };
    for _ in 0..3 {
        board.rw.rd_lock().expect("read lock failed");
        // SAFETY: shared access is valid while the read lock is held.
        let seen = unsafe { *board.value.get() };
        println!("reader {} sees {seen}", arg.id);
        board.rw.unlock().expect("read unlock failed");
        std::thread::sleep(Duration::from_millis(20));
    }
    ptr::null_mut()
}

extern "C" fn writer(data: *mut c_void) -> *mut c_void {
    // SAFETY: as in reader.
    let arg = unsafe { Box::from_raw(data as *mut WorkerArg) };
    let board = unsafe { &*arg.board };
    for _ in 0..3 {
        board.rw.wr_lock().expect("write lock failed");
        // SAFETY: exclusive access is valid while the write lock is held.
        unsafe { *board.value.get() += 1 };
        board.rw.unlock().expect("write unlock failed");
        std::thread::sleep(Duration::from_millis(30));
    }
    ptr::null_mut()
}

fn main() {
    let board = Board {
        rw: RwLock::init().expect("rwlock initialization failed"),
        value: UnsafeCell::new(0),
    };

    let mut workers: Vec<Thread> = Vec::new();
    for id in 0..2 {
        let arg = Box::new(WorkerArg { board: &board, id });
        workers.push(Thread::new(reader, Box::into_raw(arg) as *mut c_void));
    }
    let arg = Box::new(WorkerArg {
        board: &board,
        id: 0,
    });
    workers.push(Thread::new(writer, Box::into_raw(arg) as *mut c_void));

    for worker in &mut workers {
        // SAFETY: `board` outlives the joins below.
        unsafe { worker.create(None) }.expect("thread creation failed");
    }
    for worker in &mut workers {
        worker.join().expect("thread join failed");
    }

    // SAFETY: all workers joined.
    println!("final value: {}", unsafe { *board.value.get() });
}
