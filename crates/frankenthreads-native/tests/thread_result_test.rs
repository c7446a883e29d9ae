//! Thread result capture: the routine's returned pointer round-trips
//! byte-identical to the joiner on every capture path, including the
//! explicit-exit path, and ownership transfers to the joiner.

use std::ffi::c_void;
use std::ptr;

use frankenthreads_native::{Thread, current_id};

#[cfg(windows)]
use frankenthreads_native::exit_current;

const DICE_VALUE: u64 = 0x00C0_FFEE_D00D_CAFE;

extern "C" fn allocate_result(data: *mut c_void) -> *mut c_void {
    let bump = data as usize as u64;
    Box::into_raw(Box::new(DICE_VALUE.wrapping_add(bump))) as *mut c_void
}

#[test]
fn result_round_trips_unchanged() {
    let mut worker = Thread::new(allocate_result, 7_usize as *mut c_void);
    // SAFETY: the payload is a plain integer, never dereferenced.
    unsafe { worker.create(None) }.expect("create");

    assert!(
        worker.result().is_null(),
        "result slot must not be readable before join"
    );
    worker.join().expect("join");

    let raw = worker.result();
    assert!(!raw.is_null());
    // SAFETY: the routine allocated this with Box::new; ownership
    // transferred to us at join.
    let value = unsafe { Box::from_raw(raw as *mut u64) };
    assert_eq!(*value, DICE_VALUE.wrapping_add(7));
}

#[cfg(windows)]
extern "C" fn exit_with_result(_data: *mut c_void) -> *mut c_void {
    let result = Box::into_raw(Box::new(DICE_VALUE)) as *mut c_void;
    // SAFETY: nothing on this frame owns resources.
    unsafe { exit_current(result) }
}

// The pthread variant of the exit path unwinds the native thread start
// and cannot be driven from inside a non-unwinding routine frame; it is
// exercised on the trampoline platform, where thread exit does not
// unwind.
#[cfg(windows)]
#[test]
fn explicit_exit_records_its_result() {
    let mut worker = Thread::new(exit_with_result, ptr::null_mut());
    // SAFETY: null payload, never dereferenced.
    unsafe { worker.create(None) }.expect("create");
    worker.join().expect("join");

    let raw = worker.result();
    assert!(!raw.is_null(), "exit path must record the result");
    // SAFETY: as in result_round_trips_unchanged.
    let value = unsafe { Box::from_raw(raw as *mut u64) };
    assert_eq!(*value, DICE_VALUE);
}

extern "C" fn report_identity(data: *mut c_void) -> *mut c_void {
    // SAFETY: the payload points at a u64 slot owned by the test.
    unsafe { *(data as *mut u64) = current_id() };
    ptr::null_mut()
}

#[test]
fn id_matches_what_the_thread_observes() {
    let mut observed: u64 = 0;
    let mut worker = Thread::new(report_identity, &mut observed as *mut u64 as *mut c_void);
    // SAFETY: `observed` outlives the join below.
    unsafe { worker.create(None) }.expect("create");
    let id = worker.id();
    worker.join().expect("join");

    assert_ne!(observed, 0);
    assert_eq!(id, observed, "manager id and self-reported id disagree");
    assert_ne!(observed, current_id(), "worker identity equals the joiner's");
}

#[cfg(not(target_os = "android"))]
#[test]
fn cancel_before_create_is_rejected() {
    use frankenthreads_core::errno;

    let worker = Thread::new(report_identity, ptr::null_mut());
    let err = worker.cancel().expect_err("cancel must fail");
    assert_eq!(err.errno, errno::EINVAL);
}
