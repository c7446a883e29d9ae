//! Win32 variant: forwarding to kernel32 threading and synchronization.
//!
//! The native thread entry ABI discards the routine's return value, so
//! creation interposes a trampoline that runs the routine and stores the
//! returned pointer into a result cell owned by the thread object. The
//! trampoline also registers the cell in a thread-local so that an
//! explicit thread exit can record its result through the same cell.
//!
//! `SRWLOCK` does not self-describe its held mode; release dispatches
//! from the recorded [`HeldMode`] tag.

use std::cell::{Cell, UnsafeCell};
use std::ffi::c_void;
use std::mem;
use std::ptr;
use std::sync::atomic::{AtomicU8, Ordering};

use frankenthreads_core::attr::{CondAttr, MutexAttr, ThreadAttr};
use frankenthreads_core::errno;
use frankenthreads_core::error::{NativeError, TryLockOutcome};
use frankenthreads_core::rwlock::{HeldMode, ReleaseKind};

/// Hand-declared kernel32 surface; only what this layer calls.
pub(crate) mod ffi {
    #![allow(non_snake_case)]

    use std::ffi::c_void;

    pub type BOOL = i32;
    pub type DWORD = u32;
    pub type HANDLE = *mut c_void;
    pub type LONG = i32;

    pub const INFINITE: DWORD = 0xFFFF_FFFF;
    pub const WAIT_OBJECT_0: DWORD = 0;
    pub const WAIT_TIMEOUT: DWORD = 0x0000_0102;
    pub const LONG_MAX: LONG = 0x7FFF_FFFF;

    /// RTL_CRITICAL_SECTION layout; initialized in place by the kernel.
    #[repr(C)]
    pub struct CRITICAL_SECTION {
        pub DebugInfo: *mut c_void,
        pub LockCount: LONG,
        pub RecursionCount: LONG,
        pub OwningThread: HANDLE,
        pub LockSemaphore: HANDLE,
        pub SpinCount: usize,
    }

    #[repr(C)]
    pub struct CONDITION_VARIABLE {
        pub Ptr: *mut c_void,
    }

    #[repr(C)]
    pub struct SRWLOCK {
        pub Ptr: *mut c_void,
    }

    pub type ThreadEntry = unsafe extern "system" fn(*mut c_void) -> DWORD;

    #[link(name = "kernel32")]
    unsafe extern "system" {
        pub fn CreateThread(
            security: *mut c_void,
            stack_size: usize,
            entry: ThreadEntry,
            parameter: *mut c_void,
            creation_flags: DWORD,
            thread_id: *mut DWORD,
        ) -> HANDLE;
        pub fn WaitForSingleObject(handle: HANDLE, timeout_ms: DWORD) -> DWORD;
        pub fn CloseHandle(handle: HANDLE) -> BOOL;
        pub fn GetCurrentThreadId() -> DWORD;
        pub fn GetThreadId(thread: HANDLE) -> DWORD;
        pub fn TerminateThread(thread: HANDLE, exit_code: DWORD) -> BOOL;
        pub fn ExitThread(exit_code: DWORD) -> !;
        pub fn GetLastError() -> DWORD;

        pub fn InitializeCriticalSection(section: *mut CRITICAL_SECTION);
        pub fn EnterCriticalSection(section: *mut CRITICAL_SECTION);
        pub fn TryEnterCriticalSection(section: *mut CRITICAL_SECTION) -> BOOL;
        pub fn LeaveCriticalSection(section: *mut CRITICAL_SECTION);
        pub fn DeleteCriticalSection(section: *mut CRITICAL_SECTION);

        pub fn InitializeConditionVariable(cond: *mut CONDITION_VARIABLE);
        pub fn WakeConditionVariable(cond: *mut CONDITION_VARIABLE);
        pub fn WakeAllConditionVariable(cond: *mut CONDITION_VARIABLE);
        pub fn SleepConditionVariableCS(
            cond: *mut CONDITION_VARIABLE,
            section: *mut CRITICAL_SECTION,
            timeout_ms: DWORD,
        ) -> BOOL;

        pub fn InitializeSRWLock(lock: *mut SRWLOCK);
        pub fn AcquireSRWLockShared(lock: *mut SRWLOCK);
        pub fn ReleaseSRWLockShared(lock: *mut SRWLOCK);
        pub fn AcquireSRWLockExclusive(lock: *mut SRWLOCK);
        pub fn ReleaseSRWLockExclusive(lock: *mut SRWLOCK);

        pub fn CreateSemaphoreW(
            security: *mut c_void,
            initial_count: LONG,
            maximum_count: LONG,
            name: *const u16,
        ) -> HANDLE;
        pub fn ReleaseSemaphore(
            handle: HANDLE,
            release_count: LONG,
            previous_count: *mut LONG,
        ) -> BOOL;
    }
}

use crate::thread::Routine;

fn last_error() -> NativeError {
    // Win32 error codes pass through untranslated.
    NativeError::new(unsafe { ffi::GetLastError() } as i32)
}

// ---------------------------------------------------------------------------
// Thread lifecycle
// ---------------------------------------------------------------------------

/// Result slot shared between the spawning side and the trampoline. The
/// address must stay stable for the thread's lifetime, so the cell is
/// heap-pinned and the handle owns the box.
pub(crate) struct ResultCell {
    routine: Routine,
    payload: *mut c_void,
    result: UnsafeCell<*mut c_void>,
}

thread_local! {
    /// Cell of the thread currently executing a trampolined routine; the
    /// explicit-exit path records its result here.
    static ACTIVE_CELL: Cell<*const ResultCell> = const { Cell::new(ptr::null()) };
}

/// Entry point handed to `CreateThread`. Runs the routine and captures
/// the returned pointer the native ABI would otherwise discard.
unsafe extern "system" fn thread_entry(parameter: *mut c_void) -> ffi::DWORD {
    let cell = parameter as *const ResultCell;
    ACTIVE_CELL.with(|active| active.set(cell));
    // SAFETY: the cell is kept alive by the joiner or intentionally
    // leaked by detach; either way it outlives this thread.
    let cell_ref = unsafe { &*cell };
    let result = (cell_ref.routine)(cell_ref.payload);
    // SAFETY: the joiner reads the slot only after WaitForSingleObject
    // observes thread exit, which orders after this store.
    unsafe { *cell_ref.result.get() = result };
    0
}

pub(crate) struct ThreadRepr {
    handle: ffi::HANDLE,
    cell: Option<Box<ResultCell>>,
}

// SAFETY: the handle is a kernel object usable from any thread; pointer
// ownership inside the cell follows the routine contract.
unsafe impl Send for ThreadRepr {}

/// # Safety
///
/// `payload` must stay valid for the lifetime of the spawned thread.
pub(crate) unsafe fn spawn(
    routine: Routine,
    payload: *mut c_void,
    attr: Option<&ThreadAttr>,
) -> Result<ThreadRepr, NativeError> {
    let (stack_size, creation_flags) = match attr {
        Some(attr) => (attr.stack_size, attr.creation_flags),
        None => (0, 0),
    };
    let cell = Box::new(ResultCell {
        routine,
        payload,
        result: UnsafeCell::new(ptr::null_mut()),
    });
    let parameter = &*cell as *const ResultCell as *mut c_void;
    // SAFETY: `parameter` stays valid because the box is owned by the
    // returned repr (or leaked on detach).
    let handle = unsafe {
        ffi::CreateThread(
            ptr::null_mut(),
            stack_size,
            thread_entry,
            parameter,
            creation_flags,
            ptr::null_mut(),
        )
    };
    if handle.is_null() {
        return Err(last_error());
    }
    Ok(ThreadRepr {
        handle,
        cell: Some(cell),
    })
}

pub(crate) fn join(repr: &mut ThreadRepr) -> Result<(), NativeError> {
    // SAFETY: the lifecycle contract guarantees the handle is open and
    // has not been joined or detached before.
    if unsafe { ffi::WaitForSingleObject(repr.handle, ffi::INFINITE) } != ffi::WAIT_OBJECT_0 {
        return Err(last_error());
    }
    // SAFETY: the thread has exited; no writer remains.
    if unsafe { ffi::CloseHandle(repr.handle) } == 0 {
        return Err(last_error());
    }
    Ok(())
}

pub(crate) fn detach(repr: &mut ThreadRepr) -> Result<(), NativeError> {
    // The detached thread may still be writing its result slot; the cell
    // is leaked on purpose and the result becomes unreachable.
    if let Some(cell) = repr.cell.take() {
        let _ = Box::into_raw(cell);
    }
    // SAFETY: handle came from CreateThread.
    if unsafe { ffi::CloseHandle(repr.handle) } == 0 {
        return Err(last_error());
    }
    Ok(())
}

pub(crate) fn result(repr: &ThreadRepr) -> *mut c_void {
    match &repr.cell {
        // SAFETY: callers read the slot only after join returned Ok.
        Some(cell) => unsafe { *cell.result.get() },
        None => ptr::null_mut(),
    }
}

pub(crate) fn equal(a: &ThreadRepr, b: &ThreadRepr) -> bool {
    a.handle == b.handle
}

pub(crate) fn id(repr: &ThreadRepr) -> u64 {
    // SAFETY: GetThreadId tolerates any thread handle value.
    (unsafe { ffi::GetThreadId(repr.handle) }) as u64
}

pub(crate) fn current_id() -> u64 {
    // SAFETY: always valid for the calling thread.
    (unsafe { ffi::GetCurrentThreadId() }) as u64
}

pub(crate) fn cancel(repr: &ThreadRepr) -> Result<(), NativeError> {
    // SAFETY: asynchronous, no-cleanup termination; semantics are the
    // native ones, not strengthened.
    if unsafe { ffi::TerminateThread(repr.handle, 0) } == 0 {
        return Err(last_error());
    }
    Ok(())
}

/// # Safety
///
/// Terminates the calling thread without unwinding; live locals are not
/// dropped.
pub(crate) unsafe fn exit(result: *mut c_void) -> ! {
    let cell = ACTIVE_CELL.with(|active| active.get());
    if !cell.is_null() {
        // SAFETY: the cell registered by the trampoline outlives the
        // thread; recording here is the capture path for explicit exits.
        unsafe { *(*cell).result.get() = result };
    }
    // SAFETY: caller acknowledged the no-unwind contract.
    unsafe { ffi::ExitThread(0) }
}

// ---------------------------------------------------------------------------
// Mutex
// ---------------------------------------------------------------------------

pub(crate) struct RawMutex {
    handle: Box<UnsafeCell<ffi::CRITICAL_SECTION>>,
}

// SAFETY: critical sections are built for concurrent use from any thread;
// the heap pin keeps the handle address stable.
unsafe impl Send for RawMutex {}
unsafe impl Sync for RawMutex {}

impl RawMutex {
    /// Critical sections take no attributes; `attr` is accepted for
    /// surface uniformity and ignored.
    pub(crate) fn init(_attr: Option<&MutexAttr>) -> Result<Self, NativeError> {
        // SAFETY: zeroed storage is a placeholder until the init call.
        let handle = Box::new(UnsafeCell::new(unsafe {
            mem::zeroed::<ffi::CRITICAL_SECTION>()
        }));
        // SAFETY: `handle` is heap-pinned writable storage.
        unsafe { ffi::InitializeCriticalSection(handle.get()) };
        Ok(Self { handle })
    }

    pub(crate) fn lock(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init and outlives self.
        unsafe { ffi::EnterCriticalSection(self.handle.get()) };
        Ok(())
    }

    pub(crate) fn try_lock(&self) -> Result<TryLockOutcome, NativeError> {
        // SAFETY: as above.
        if unsafe { ffi::TryEnterCriticalSection(self.handle.get()) } != 0 {
            Ok(TryLockOutcome::Acquired)
        } else {
            Ok(TryLockOutcome::Busy)
        }
    }

    pub(crate) fn unlock(&self) -> Result<(), NativeError> {
        // SAFETY: as above; unlocking an unheld section is the caller's
        // misuse, inherited from the native contract.
        unsafe { ffi::LeaveCriticalSection(self.handle.get()) };
        Ok(())
    }

    pub(crate) fn raw(&self) -> *mut ffi::CRITICAL_SECTION {
        self.handle.get()
    }
}

impl Drop for RawMutex {
    fn drop(&mut self) {
        // SAFETY: initialized in init, not used again.
        unsafe { ffi::DeleteCriticalSection(self.handle.get()) };
    }
}

// ---------------------------------------------------------------------------
// Condition variable
// ---------------------------------------------------------------------------

pub(crate) struct RawCond {
    handle: Box<UnsafeCell<ffi::CONDITION_VARIABLE>>,
}

// SAFETY: as for RawMutex.
unsafe impl Send for RawCond {}
unsafe impl Sync for RawCond {}

impl RawCond {
    /// Win32 condition variables take no attributes; `attr` is ignored.
    pub(crate) fn init(_attr: Option<&CondAttr>) -> Result<Self, NativeError> {
        // SAFETY: zeroed storage is a placeholder until the init call.
        let handle = Box::new(UnsafeCell::new(unsafe {
            mem::zeroed::<ffi::CONDITION_VARIABLE>()
        }));
        // SAFETY: `handle` is heap-pinned writable storage.
        unsafe { ffi::InitializeConditionVariable(handle.get()) };
        Ok(Self { handle })
    }

    /// Caller must hold `mutex`; it is released for the wait and
    /// re-acquired atomically with respect to wakeup before return.
    pub(crate) fn wait(&self, mutex: &RawMutex) -> Result<(), NativeError> {
        // SAFETY: both handles are initialized; the held-mutex
        // precondition is inherited from the native contract.
        if unsafe { ffi::SleepConditionVariableCS(self.handle.get(), mutex.raw(), ffi::INFINITE) }
            == 0
        {
            return Err(last_error());
        }
        Ok(())
    }

    pub(crate) fn signal(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init.
        unsafe { ffi::WakeConditionVariable(self.handle.get()) };
        Ok(())
    }

    pub(crate) fn broadcast(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init.
        unsafe { ffi::WakeAllConditionVariable(self.handle.get()) };
        Ok(())
    }
}

// Win32 condition variables need no destruction.

// ---------------------------------------------------------------------------
// Read-write lock
// ---------------------------------------------------------------------------

pub(crate) struct RawRwLock {
    handle: Box<UnsafeCell<ffi::SRWLOCK>>,
    /// Most recent acquire, for release dispatch; see core's `HeldMode`.
    mode: AtomicU8,
}

// SAFETY: SRW locks are built for concurrent use; the tag is atomic.
unsafe impl Send for RawRwLock {}
unsafe impl Sync for RawRwLock {}

impl RawRwLock {
    pub(crate) fn init() -> Result<Self, NativeError> {
        // SAFETY: zeroed storage is a placeholder until the init call.
        let handle = Box::new(UnsafeCell::new(unsafe { mem::zeroed::<ffi::SRWLOCK>() }));
        // SAFETY: `handle` is heap-pinned writable storage.
        unsafe { ffi::InitializeSRWLock(handle.get()) };
        Ok(Self {
            handle,
            mode: AtomicU8::new(HeldMode::Unlocked.as_u8()),
        })
    }

    pub(crate) fn rd_lock(&self) -> Result<(), NativeError> {
        // SAFETY: handle initialized in init.
        unsafe { ffi::AcquireSRWLockShared(self.handle.get()) };
        self.mode
            .store(HeldMode::SharedHeld.as_u8(), Ordering::Release);
        Ok(())
    }

    pub(crate) fn wr_lock(&self) -> Result<(), NativeError> {
        // SAFETY: as above.
        unsafe { ffi::AcquireSRWLockExclusive(self.handle.get()) };
        self.mode
            .store(HeldMode::ExclusiveHeld.as_u8(), Ordering::Release);
        Ok(())
    }

    /// Dispatches the native release matching the recorded mode, then
    /// resets the tag. Releasing with nothing recorded is rejected.
    pub(crate) fn unlock(&self) -> Result<(), NativeError> {
        let mode = HeldMode::from_u8(self.mode.load(Ordering::Acquire));
        let kind = mode
            .release_dispatch()
            .ok_or(NativeError::new(errno::EPERM))?;
        self.mode
            .store(HeldMode::Unlocked.as_u8(), Ordering::Release);
        match kind {
            // SAFETY: handle initialized in init; the caller holds the
            // lock in the recorded mode per the tag contract.
            ReleaseKind::Shared => unsafe { ffi::ReleaseSRWLockShared(self.handle.get()) },
            ReleaseKind::Exclusive => unsafe { ffi::ReleaseSRWLockExclusive(self.handle.get()) },
        }
        Ok(())
    }
}

// SRW locks need no destruction; the box frees the storage.

// ---------------------------------------------------------------------------
// Semaphore
// ---------------------------------------------------------------------------

pub(crate) struct RawSemaphore {
    handle: ffi::HANDLE,
}

// SAFETY: kernel semaphore handles may be used from any thread.
unsafe impl Send for RawSemaphore {}
unsafe impl Sync for RawSemaphore {}

impl RawSemaphore {
    pub(crate) fn init(initial: u32) -> Result<Self, NativeError> {
        if initial > ffi::LONG_MAX as u32 {
            return Err(NativeError::invalid());
        }
        // SAFETY: anonymous (unnamed) kernel semaphore; the cap mirrors
        // the native bounded maximum.
        let handle = unsafe {
            ffi::CreateSemaphoreW(
                ptr::null_mut(),
                initial as ffi::LONG,
                ffi::LONG_MAX,
                ptr::null(),
            )
        };
        if handle.is_null() {
            return Err(last_error());
        }
        Ok(Self { handle })
    }

    pub(crate) fn wait(&self) -> Result<(), NativeError> {
        // SAFETY: handle came from CreateSemaphoreW.
        if unsafe { ffi::WaitForSingleObject(self.handle, ffi::INFINITE) } != ffi::WAIT_OBJECT_0 {
            return Err(last_error());
        }
        Ok(())
    }

    pub(crate) fn try_wait(&self) -> Result<TryLockOutcome, NativeError> {
        // SAFETY: a zero-timeout wait is the native non-blocking probe.
        match unsafe { ffi::WaitForSingleObject(self.handle, 0) } {
            ffi::WAIT_OBJECT_0 => Ok(TryLockOutcome::Acquired),
            ffi::WAIT_TIMEOUT => Ok(TryLockOutcome::Busy),
            _ => Err(last_error()),
        }
    }

    pub(crate) fn post(&self) -> Result<(), NativeError> {
        // SAFETY: as above; releases one unit and may unblock one waiter.
        if unsafe { ffi::ReleaseSemaphore(self.handle, 1, ptr::null_mut()) } == 0 {
            return Err(last_error());
        }
        Ok(())
    }
}

impl Drop for RawSemaphore {
    fn drop(&mut self) {
        // SAFETY: handle came from CreateSemaphoreW, not used again.
        let _ = unsafe { ffi::CloseHandle(self.handle) };
    }
}
