//! POSIX variant: forwarding to pthreads and POSIX semaphores via `libc`.
//!
//! Threads pass the caller's routine straight to `pthread_create`; the
//! return value travels through `pthread_join`'s out parameter, so no
//! trampoline is interposed. Attribute translation applies only the
//! fields the caller explicitly set.
//!
//! Handles are heap-pinned for the init→drop interval: the native types
//! are address-sensitive once initialized, and Rust values move.

use std::cell::UnsafeCell;
use std::ffi::c_void;
use std::io;
use std::mem;
use std::ptr;

use frankenthreads_core::attr::{self, CondAttr, MutexAttr, ThreadAttr};
use frankenthreads_core::errno;
use frankenthreads_core::error::{NativeError, TryLockOutcome};

#[cfg(any(target_os = "macos", target_os = "ios"))]
use frankenthreads_core::sem;

use crate::thread::Routine;

fn check(code: libc::c_int) -> Result<(), NativeError> {
    if code == 0 {
        Ok(())
    } else {
        Err(NativeError::new(code))
    }
}

fn last_errno() -> i32 {
    io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(errno::EINVAL)
}

// ---------------------------------------------------------------------------
// Scheduling and priority bindings (Linux/gnu)
// ---------------------------------------------------------------------------

/// glibc exports these symbols unconditionally; declared here so the
/// scheduling attributes stay a compile-time capability rather than a
/// crate-coverage question.
#[cfg(all(target_os = "linux", target_env = "gnu"))]
mod ffi {
    use std::ffi::{c_int, c_void};

    pub const PTHREAD_INHERIT_SCHED: c_int = 0;
    pub const PTHREAD_EXPLICIT_SCHED: c_int = 1;
    pub const PTHREAD_SCOPE_SYSTEM: c_int = 0;
    pub const PTHREAD_SCOPE_PROCESS: c_int = 1;
    pub const PTHREAD_PRIO_NONE: c_int = 0;
    pub const PTHREAD_PRIO_INHERIT: c_int = 1;
    pub const PTHREAD_PRIO_PROTECT: c_int = 2;
    pub const PTHREAD_MUTEX_STALLED: c_int = 0;
    pub const PTHREAD_MUTEX_ROBUST: c_int = 1;

    unsafe extern "C" {
        pub fn pthread_attr_setinheritsched(
            attr: *mut libc::pthread_attr_t,
            inheritsched: c_int,
        ) -> c_int;
        pub fn pthread_attr_setschedpolicy(attr: *mut libc::pthread_attr_t, policy: c_int)
        -> c_int;
        pub fn pthread_attr_setscope(attr: *mut libc::pthread_attr_t, scope: c_int) -> c_int;
        pub fn pthread_attr_setstack(
            attr: *mut libc::pthread_attr_t,
            stackaddr: *mut c_void,
            stacksize: usize,
        ) -> c_int;
        pub fn pthread_mutexattr_setprotocol(
            attr: *mut libc::pthread_mutexattr_t,
            protocol: c_int,
        ) -> c_int;
        pub fn pthread_mutexattr_setrobust(
            attr: *mut libc::pthread_mutexattr_t,
            robustness: c_int,
        ) -> c_int;
        pub fn pthread_mutexattr_setprioceiling(
            attr: *mut libc::pthread_mutexattr_t,
            prioceiling: c_int,
        ) -> c_int;
    }
}

// ---------------------------------------------------------------------------
// Thread lifecycle
// ---------------------------------------------------------------------------

pub(crate) struct ThreadRepr {
    handle: libc::pthread_t,
    result: *mut c_void,
}

// SAFETY: a pthread_t is a handle the OS lets any thread operate on; the
// stored result pointer's ownership rules are the routine contract's.
unsafe impl Send for ThreadRepr {}

/// Translates the explicitly-set fields of `attr`; unset fields keep the
/// native defaults. Setter failures are not checked, matching the native
/// attribute objects' forgiving contract.
unsafe fn apply_thread_attr(native: &mut libc::pthread_attr_t, attr: &ThreadAttr) {
    if attr.detach_state != attr::DETACH_STATE_UNSET {
        let state = if attr.detach_state == attr::DETACH_STATE_DETACHED {
            libc::PTHREAD_CREATE_DETACHED
        } else {
            libc::PTHREAD_CREATE_JOINABLE
        };
        // SAFETY: `native` was initialized by pthread_attr_init.
        let _ = unsafe { libc::pthread_attr_setdetachstate(native, state) };
    }
    if attr.guard_size != 0 {
        // SAFETY: as above.
        let _ = unsafe { libc::pthread_attr_setguardsize(native, attr.guard_size) };
    }
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    {
        if attr.inherit_sched != attr::INHERIT_SCHED_UNSET {
            let inherit = if attr.inherit_sched == attr::INHERIT_SCHED_EXPLICIT {
                ffi::PTHREAD_EXPLICIT_SCHED
            } else {
                ffi::PTHREAD_INHERIT_SCHED
            };
            // SAFETY: as above.
            let _ = unsafe { ffi::pthread_attr_setinheritsched(native, inherit) };
        }
        if attr.sched_policy != attr::SCHED_POLICY_UNSET {
            let policy = match attr.sched_policy {
                attr::SCHED_POLICY_FIFO => libc::SCHED_FIFO,
                attr::SCHED_POLICY_RR => libc::SCHED_RR,
                _ => libc::SCHED_OTHER,
            };
            // SAFETY: as above.
            let _ = unsafe { ffi::pthread_attr_setschedpolicy(native, policy) };
        }
        if attr.scope != attr::SCOPE_UNSET {
            let scope = if attr.scope == attr::SCOPE_PROCESS {
                ffi::PTHREAD_SCOPE_PROCESS
            } else {
                ffi::PTHREAD_SCOPE_SYSTEM
            };
            // SAFETY: as above.
            let _ = unsafe { ffi::pthread_attr_setscope(native, scope) };
        }
        if attr.stack != 0 {
            // SAFETY: the caller vouches for the stack region; the OS
            // validates alignment and minimum size.
            let _ = unsafe {
                ffi::pthread_attr_setstack(native, attr.stack_addr as *mut c_void, attr.stack)
            };
        }
    }
    if attr.stack_size != 0 {
        // SAFETY: as above.
        let _ = unsafe { libc::pthread_attr_setstacksize(native, attr.stack_size) };
    }
}

/// # Safety
///
/// `payload` must stay valid for the lifetime of the spawned thread.
pub(crate) unsafe fn spawn(
    routine: Routine,
    payload: *mut c_void,
    attr: Option<&ThreadAttr>,
) -> Result<ThreadRepr, NativeError> {
    // SAFETY: zeroed pthread_t is only a placeholder for the out param.
    let mut handle: libc::pthread_t = unsafe { mem::zeroed() };
    let code = match attr {
        Some(attr) => {
            let rejected = attr::thread_attr_errno(attr);
            if rejected != 0 {
                return Err(NativeError::new(rejected));
            }
            // SAFETY: zeroed storage is valid input for pthread_attr_init.
            let mut native: libc::pthread_attr_t = unsafe { mem::zeroed() };
            // SAFETY: `native` points at writable storage.
            let init = unsafe { libc::pthread_attr_init(&mut native) };
            if init != 0 {
                return Err(NativeError::new(init));
            }
            // SAFETY: `native` initialized above.
            unsafe { apply_thread_attr(&mut native, attr) };
            // SAFETY: routine is a valid C-ABI function; payload validity
            // is the caller's contract.
            let created = unsafe { libc::pthread_create(&mut handle, &native, routine, payload) };
            // SAFETY: `native` initialized above, not used again.
            let _ = unsafe { libc::pthread_attr_destroy(&mut native) };
            created
        }
        // SAFETY: as above, with native default attributes.
        None => unsafe { libc::pthread_create(&mut handle, ptr::null(), routine, payload) },
    };
    check(code)?;
    Ok(ThreadRepr {
        handle,
        result: ptr::null_mut(),
    })
}

pub(crate) fn join(repr: &mut ThreadRepr) -> Result<(), NativeError> {
    let mut result: *mut c_void = ptr::null_mut();
    // SAFETY: the lifecycle contract guarantees the handle is joinable
    // and has not been joined or detached before.
    check(unsafe { libc::pthread_join(repr.handle, &mut result) })?;
    repr.result = result;
    Ok(())
}

pub(crate) fn detach(repr: &mut ThreadRepr) -> Result<(), NativeError> {
    // SAFETY: as in join.
    check(unsafe { libc::pthread_detach(repr.handle) })
}

pub(crate) fn result(repr: &ThreadRepr) -> *mut c_void {
    repr.result
}

pub(crate) fn equal(a: &ThreadRepr, b: &ThreadRepr) -> bool {
    // SAFETY: pthread_equal only inspects the handle values.
    unsafe { libc::pthread_equal(a.handle, b.handle) != 0 }
}

pub(crate) fn id(repr: &ThreadRepr) -> u64 {
    repr.handle as u64
}

pub(crate) fn current_id() -> u64 {
    // SAFETY: always valid to ask for the calling thread's handle.
    (unsafe { libc::pthread_self() }) as u64
}

#[cfg(not(target_os = "android"))]
pub(crate) fn cancel(repr: &ThreadRepr) -> Result<(), NativeError> {
    // SAFETY: an invalid or finished target reports ESRCH, it does not fault.
    check(unsafe { libc::pthread_cancel(repr.handle) })
}

/// # Safety
///
/// Terminates the calling thread without unwinding; live locals are not
/// dropped.
pub(crate) unsafe fn exit(result: *mut c_void) -> ! {
    // SAFETY: caller acknowledged the no-unwind contract.
    unsafe { libc::pthread_exit(result) }
}

// ---------------------------------------------------------------------------
// Mutex
// ---------------------------------------------------------------------------

pub(crate) struct RawMutex {
    handle: Box<UnsafeCell<libc::pthread_mutex_t>>,
}

// SAFETY: pthread mutexes are built for concurrent use from any thread;
// the heap pin keeps the handle address stable.
unsafe impl Send for RawMutex {}
unsafe impl Sync for RawMutex {}

unsafe fn apply_mutex_attr(native: &mut libc::pthread_mutexattr_t, attr: &MutexAttr) {
    if attr.pshared != attr::PSHARED_UNSET {
        let pshared = if attr.pshared == attr::PSHARED_SHARED {
            libc::PTHREAD_PROCESS_SHARED
        } else {
            libc::PTHREAD_PROCESS_PRIVATE
        };
        // SAFETY: `native` was initialized by pthread_mutexattr_init.
        let _ = unsafe { libc::pthread_mutexattr_setpshared(native, pshared) };
    }
    if attr.kind != attr::MUTEX_KIND_UNSET {
        let kind = match attr.kind {
            attr::MUTEX_KIND_RECURSIVE => libc::PTHREAD_MUTEX_RECURSIVE,
            attr::MUTEX_KIND_ERRORCHECK => libc::PTHREAD_MUTEX_ERRORCHECK,
            _ => libc::PTHREAD_MUTEX_NORMAL,
        };
        // SAFETY: as above.
        let _ = unsafe { libc::pthread_mutexattr_settype(native, kind) };
    }
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    {
        if attr.robust != attr::MUTEX_ROBUST_UNSET {
            let robust = if attr.robust == attr::MUTEX_ROBUST_ROBUST {
                ffi::PTHREAD_MUTEX_ROBUST
            } else {
                ffi::PTHREAD_MUTEX_STALLED
            };
            // SAFETY: as above.
            let _ = unsafe { ffi::pthread_mutexattr_setrobust(native, robust) };
        }
        if attr.protocol != attr::MUTEX_PROTOCOL_UNSET {
            let protocol = match attr.protocol {
                attr::MUTEX_PROTOCOL_INHERIT => ffi::PTHREAD_PRIO_INHERIT,
                attr::MUTEX_PROTOCOL_PROTECT => ffi::PTHREAD_PRIO_PROTECT,
                _ => ffi::PTHREAD_PRIO_NONE,
            };
            // SAFETY: as above.
            let _ = unsafe { ffi::pthread_mutexattr_setprotocol(native, protocol) };
        }
        if attr.prioceiling != 0 {
            // SAFETY: as above; the OS validates the ceiling value.
            let _ = unsafe { ffi::pthread_mutexattr_setprioceiling(native, attr.prioceiling) };
        }
    }
}

impl RawMutex {
    pub(crate) fn init(attr: Option<&MutexAttr>) -> Result<Self, NativeError> {
        // SAFETY: zeroed storage is a placeholder until pthread_mutex_init.
        let handle = Box::new(UnsafeCell::new(unsafe {
            mem::zeroed::<libc::pthread_mutex_t>()
        }));
        let code = match attr {
            Some(attr) => {
                let rejected = attr::mutex_attr_errno(attr);
                if rejected != 0 {
                    return Err(NativeError::new(rejected));
                }
                // SAFETY: zeroed storage is valid input for the init call.
                let mut native: libc::pthread_mutexattr_t = unsafe { mem::zeroed() };
                // SAFETY: `native` points at writable storage.
                let init = unsafe { libc::pthread_mutexattr_init(&mut native) };
                if init != 0 {
                    return Err(NativeError::new(init));
                }
                // SAFETY: `native` initialized above.
                unsafe { apply_mutex_attr(&mut native, attr) };
                // SAFETY: `handle` is heap-pinned writable storage.
                let created = unsafe { libc::pthread_mutex_init(handle.get(), &native) };
                // SAFETY: `native` initialized above, not used again.
                let _ = unsafe { libc::pthread_mutexattr_destroy(&mut native) };
                created
            }
            // SAFETY: as above, with native default attributes.
            None => unsafe { libc::pthread_mutex_init(handle.get(), ptr::null()) },
        };
        check(code)?;
        Ok(Self { handle })
    }

    pub(crate) fn lock(&self) -> Result<(), NativeError> {
        // SAFETY: the handle was initialized in init and outlives self.
        check(unsafe { libc::pthread_mutex_lock(self.handle.get()) })
    }

    pub(crate) fn try_lock(&self) -> Result<TryLockOutcome, NativeError> {
        // SAFETY: as above.
        match unsafe { libc::pthread_mutex_trylock(self.handle.get()) } {
            0 => Ok(TryLockOutcome::Acquired),
            libc::EBUSY => Ok(TryLockOutcome::Busy),
            code => Err(NativeError::new(code)),
        }
    }

    pub(crate) fn unlock(&self) -> Result<(), NativeError> {
        // SAFETY: as above.
        check(unsafe { libc::pthread_mutex_unlock(self.handle.get()) })
    }

    pub(crate) fn raw(&self) -> *mut libc::pthread_mutex_t {
        self.handle.get()
    }
}

impl Drop for RawMutex {
    fn drop(&mut self) {
        // SAFETY: initialized in init; destroying a held mutex is the
        // caller's misuse, inherited from the native contract.
        let _ = unsafe { libc::pthread_mutex_destroy(self.handle.get()) };
    }
}

// ---------------------------------------------------------------------------
// Condition variable
// ---------------------------------------------------------------------------

pub(crate) struct RawCond {
    handle: Box<UnsafeCell<libc::pthread_cond_t>>,
}

// SAFETY: as for RawMutex.
unsafe impl Send for RawCond {}
unsafe impl Sync for RawCond {}

unsafe fn apply_cond_attr(native: &mut libc::pthread_condattr_t, attr: &CondAttr) {
    if attr.pshared != attr::PSHARED_UNSET {
        let pshared = if attr.pshared == attr::PSHARED_SHARED {
            libc::PTHREAD_PROCESS_SHARED
        } else {
            libc::PTHREAD_PROCESS_PRIVATE
        };
        // SAFETY: `native` was initialized by pthread_condattr_init.
        let _ = unsafe { libc::pthread_condattr_setpshared(native, pshared) };
    }
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    if attr.clock != attr::COND_CLOCK_UNSET {
        let clock = if attr.clock == attr::COND_CLOCK_MONOTONIC {
            libc::CLOCK_MONOTONIC
        } else {
            libc::CLOCK_REALTIME
        };
        // SAFETY: as above.
        let _ = unsafe { libc::pthread_condattr_setclock(native, clock) };
    }
}

impl RawCond {
    pub(crate) fn init(attr: Option<&CondAttr>) -> Result<Self, NativeError> {
        // SAFETY: zeroed storage is a placeholder until pthread_cond_init.
        let handle = Box::new(UnsafeCell::new(unsafe {
            mem::zeroed::<libc::pthread_cond_t>()
        }));
        let code = match attr {
            Some(attr) => {
                let rejected = attr::cond_attr_errno(attr);
                if rejected != 0 {
                    return Err(NativeError::new(rejected));
                }
                // SAFETY: zeroed storage is valid input for the init call.
                let mut native: libc::pthread_condattr_t = unsafe { mem::zeroed() };
                // SAFETY: `native` points at writable storage.
                let init = unsafe { libc::pthread_condattr_init(&mut native) };
                if init != 0 {
                    return Err(NativeError::new(init));
                }
                // SAFETY: `native` initialized above.
                unsafe { apply_cond_attr(&mut native, attr) };
                // SAFETY: `handle` is heap-pinned writable storage.
                let created = unsafe { libc::pthread_cond_init(handle.get(), &native) };
                // SAFETY: `native` initialized above, not used again.
                let _ = unsafe { libc::pthread_condattr_destroy(&mut native) };
                created
            }
            // SAFETY: as above, with native default attributes.
            None => unsafe { libc::pthread_cond_init(handle.get(), ptr::null()) },
        };
        check(code)?;
        Ok(Self { handle })
    }

    /// Caller must hold `mutex`; it is released for the wait and
    /// re-acquired atomically with respect to wakeup before return.
    pub(crate) fn wait(&self, mutex: &RawMutex) -> Result<(), NativeError> {
        // SAFETY: both handles are initialized; the held-mutex
        // precondition is inherited from the native contract.
        check(unsafe { libc::pthread_cond_wait(self.handle.get(), mutex.raw()) })
    }

    pub(crate) fn signal(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init.
        check(unsafe { libc::pthread_cond_signal(self.handle.get()) })
    }

    pub(crate) fn broadcast(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init.
        check(unsafe { libc::pthread_cond_broadcast(self.handle.get()) })
    }
}

impl Drop for RawCond {
    fn drop(&mut self) {
        // SAFETY: initialized in init, not used again.
        let _ = unsafe { libc::pthread_cond_destroy(self.handle.get()) };
    }
}

// ---------------------------------------------------------------------------
// Read-write lock
// ---------------------------------------------------------------------------

pub(crate) struct RawRwLock {
    handle: Box<UnsafeCell<libc::pthread_rwlock_t>>,
}

// SAFETY: as for RawMutex.
unsafe impl Send for RawRwLock {}
unsafe impl Sync for RawRwLock {}

impl RawRwLock {
    pub(crate) fn init() -> Result<Self, NativeError> {
        // SAFETY: zeroed storage is a placeholder until pthread_rwlock_init.
        let handle = Box::new(UnsafeCell::new(unsafe {
            mem::zeroed::<libc::pthread_rwlock_t>()
        }));
        // SAFETY: `handle` is heap-pinned writable storage.
        check(unsafe { libc::pthread_rwlock_init(handle.get(), ptr::null()) })?;
        Ok(Self { handle })
    }

    pub(crate) fn rd_lock(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init.
        check(unsafe { libc::pthread_rwlock_rdlock(self.handle.get()) })
    }

    pub(crate) fn wr_lock(&self) -> Result<(), NativeError> {
        // SAFETY: as above.
        check(unsafe { libc::pthread_rwlock_wrlock(self.handle.get()) })
    }

    /// The native lock self-describes the held mode; one release call
    /// serves both.
    pub(crate) fn unlock(&self) -> Result<(), NativeError> {
        // SAFETY: as above.
        check(unsafe { libc::pthread_rwlock_unlock(self.handle.get()) })
    }
}

impl Drop for RawRwLock {
    fn drop(&mut self) {
        // SAFETY: initialized in init, not used again.
        let _ = unsafe { libc::pthread_rwlock_destroy(self.handle.get()) };
    }
}

// ---------------------------------------------------------------------------
// Barrier (native where the platform has one)
// ---------------------------------------------------------------------------

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub(crate) struct RawBarrier {
    handle: Box<UnsafeCell<libc::pthread_barrier_t>>,
}

// SAFETY: as for RawMutex.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
unsafe impl Send for RawBarrier {}
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
unsafe impl Sync for RawBarrier {}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
impl RawBarrier {
    pub(crate) fn init(trip_count: u32) -> Result<Self, NativeError> {
        if trip_count == 0 {
            return Err(NativeError::invalid());
        }
        // SAFETY: zeroed storage is a placeholder until the init call.
        let handle = Box::new(UnsafeCell::new(unsafe {
            mem::zeroed::<libc::pthread_barrier_t>()
        }));
        // SAFETY: `handle` is heap-pinned writable storage.
        check(unsafe {
            libc::pthread_barrier_init(handle.get(), ptr::null(), trip_count as libc::c_uint)
        })?;
        Ok(Self { handle })
    }

    pub(crate) fn wait(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init. The serial-thread sentinel
        // marks one releasing arrival and is plain success to callers.
        match unsafe { libc::pthread_barrier_wait(self.handle.get()) } {
            0 | libc::PTHREAD_BARRIER_SERIAL_THREAD => Ok(()),
            code => Err(NativeError::new(code)),
        }
    }
}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
impl Drop for RawBarrier {
    fn drop(&mut self) {
        // SAFETY: initialized in init, not used again.
        let _ = unsafe { libc::pthread_barrier_destroy(self.handle.get()) };
    }
}

// ---------------------------------------------------------------------------
// Semaphore, unnamed variant (Linux, BSD)
// ---------------------------------------------------------------------------

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
pub(crate) struct RawSemaphore {
    handle: Box<UnsafeCell<libc::sem_t>>,
}

// SAFETY: POSIX semaphores are built for concurrent use from any thread.
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
unsafe impl Send for RawSemaphore {}
#[cfg(not(any(target_os = "macos", target_os = "ios")))]
unsafe impl Sync for RawSemaphore {}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
impl RawSemaphore {
    pub(crate) fn init(initial: u32) -> Result<Self, NativeError> {
        // SAFETY: zeroed storage is a placeholder until sem_init.
        let handle = Box::new(UnsafeCell::new(unsafe { mem::zeroed::<libc::sem_t>() }));
        // SAFETY: `handle` is heap-pinned writable storage; pshared 0
        // keeps the semaphore process-private.
        if unsafe { libc::sem_init(handle.get(), 0, initial as libc::c_uint) } != 0 {
            return Err(NativeError::new(last_errno()));
        }
        Ok(Self { handle })
    }

    pub(crate) fn wait(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init. EINTR is reported, not
        // resumed; nothing in this layer retries.
        if unsafe { libc::sem_wait(self.handle.get()) } != 0 {
            return Err(NativeError::new(last_errno()));
        }
        Ok(())
    }

    pub(crate) fn try_wait(&self) -> Result<TryLockOutcome, NativeError> {
        // SAFETY: as above.
        if unsafe { libc::sem_trywait(self.handle.get()) } == 0 {
            return Ok(TryLockOutcome::Acquired);
        }
        match last_errno() {
            code if code == libc::EAGAIN => Ok(TryLockOutcome::Busy),
            code => Err(NativeError::new(code)),
        }
    }

    pub(crate) fn post(&self) -> Result<(), NativeError> {
        // SAFETY: as above.
        if unsafe { libc::sem_post(self.handle.get()) } != 0 {
            return Err(NativeError::new(last_errno()));
        }
        Ok(())
    }
}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
impl Drop for RawSemaphore {
    fn drop(&mut self) {
        // SAFETY: initialized in init, not used again.
        let _ = unsafe { libc::sem_destroy(self.handle.get()) };
    }
}

// ---------------------------------------------------------------------------
// Semaphore, named-object variant (Apple: no unnamed semaphores)
// ---------------------------------------------------------------------------

#[cfg(any(target_os = "macos", target_os = "ios"))]
pub(crate) struct RawSemaphore {
    handle: *mut libc::sem_t,
    name: std::ffi::CString,
}

// SAFETY: the named semaphore handle may be used from any thread in the
// opening process.
#[cfg(any(target_os = "macos", target_os = "ios"))]
unsafe impl Send for RawSemaphore {}
#[cfg(any(target_os = "macos", target_os = "ios"))]
unsafe impl Sync for RawSemaphore {}

#[cfg(any(target_os = "macos", target_os = "ios"))]
impl RawSemaphore {
    pub(crate) fn init(initial: u32) -> Result<Self, NativeError> {
        let name = std::ffi::CString::new(sem::unique_name())
            .map_err(|_| NativeError::invalid())?;
        // Clear any stale object a crashed process left under this name,
        // then create exclusively: with per-instance names, a clash means
        // stale state, never a live sibling.
        // SAFETY: `name` is a valid NUL-terminated string.
        let _ = unsafe { libc::sem_unlink(name.as_ptr()) };
        // SAFETY: as above; mode and value are the variadic creation args.
        let handle = unsafe {
            libc::sem_open(
                name.as_ptr(),
                libc::O_CREAT | libc::O_EXCL,
                0o600 as libc::c_uint,
                initial as libc::c_uint,
            )
        };
        if handle == libc::SEM_FAILED {
            return Err(NativeError::new(last_errno()));
        }
        Ok(Self { handle, name })
    }

    pub(crate) fn wait(&self) -> Result<(), NativeError> {
        // SAFETY: handle came from a successful sem_open.
        if unsafe { libc::sem_wait(self.handle) } != 0 {
            return Err(NativeError::new(last_errno()));
        }
        Ok(())
    }

    pub(crate) fn try_wait(&self) -> Result<TryLockOutcome, NativeError> {
        // SAFETY: as above.
        if unsafe { libc::sem_trywait(self.handle) } == 0 {
            return Ok(TryLockOutcome::Acquired);
        }
        match last_errno() {
            code if code == libc::EAGAIN => Ok(TryLockOutcome::Busy),
            code => Err(NativeError::new(code)),
        }
    }

    pub(crate) fn post(&self) -> Result<(), NativeError> {
        // SAFETY: as above.
        if unsafe { libc::sem_post(self.handle) } != 0 {
            return Err(NativeError::new(last_errno()));
        }
        Ok(())
    }
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
impl Drop for RawSemaphore {
    fn drop(&mut self) {
        // SAFETY: handle came from sem_open; the name is unlinked so the
        // kernel object disappears with the last close.
        let _ = unsafe { libc::sem_close(self.handle) };
        let _ = unsafe { libc::sem_unlink(self.name.as_ptr()) };
    }
}
