/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * Host port: runs the port on top of `std` so the helper glue can be
 * exercised in unit tests and desktop simulations.
 */

//! Host Port Implementation
//!
//! Semaphores are a mutex-protected count plus a condvar; the backend thread
//! is a named `std` thread.
//!
//! Differences from a real RTOS:
//! - waiters are woken in whatever order the OS picks, not by priority
//! - thread priority and time slice are ignored
//! - the static stack buffer only sizes the thread; `std` allocates its own

use core::ffi::{c_void, CStr};
use core::mem::size_of_val;

use std::boxed::Box;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use super::{SemaphorePort, ThreadPort};
use crate::config::{HOST_MIN_STACK_BYTES, SEMAPHORE_INITIAL_COUNT};
use crate::error::PortError;
use crate::types::*;

/// Error code reported when the OS refuses to spawn a thread
const HOST_SPAWN_FAILED: i32 = -1;

/// Marker type for the host port.
#[derive(Debug, Clone, Copy, Default)]
pub struct Host;

// =============================================================================
// Semaphores
// =============================================================================

struct HostSemaphore {
    count: Mutex<u32>,
    available: Condvar,
}

impl HostSemaphore {
    fn lock(&self) -> MutexGuard<'_, u32> {
        // A panicking waiter cannot leave the count inconsistent.
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SemaphorePort for Host {
    fn create_raw() -> Option<SemaphoreHandle> {
        let sem = Box::new(HostSemaphore {
            count: Mutex::new(SEMAPHORE_INITIAL_COUNT),
            available: Condvar::new(),
        });
        Some(SemaphoreHandle::from_ptr(Box::into_raw(sem)))
    }

    unsafe fn delete_raw(handle: SemaphoreHandle) {
        drop(Box::from_raw(handle.as_ptr::<HostSemaphore>()));
    }

    unsafe fn take_raw(handle: SemaphoreHandle) {
        let sem = &*handle.as_ptr::<HostSemaphore>();
        let mut count = sem.lock();
        while *count == 0 {
            count = sem
                .available
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *count -= 1;
    }

    unsafe fn release_raw(handle: SemaphoreHandle) {
        let sem = &*handle.as_ptr::<HostSemaphore>();
        let mut count = sem.lock();
        *count = count.saturating_add(1);
        sem.available.notify_one();
    }
}

// =============================================================================
// Threads
// =============================================================================

/// Control block of a host thread: the join handle once spawned.
#[derive(Debug)]
pub struct HostThread {
    handle: Option<JoinHandle<()>>,
}

impl HostThread {
    pub const fn new() -> Self {
        Self { handle: None }
    }

    pub fn is_spawned(&self) -> bool {
        self.handle.is_some()
    }

    /// Name the thread was spawned with.
    pub fn name(&self) -> Option<&str> {
        self.handle.as_ref().and_then(|h| h.thread().name())
    }

    /// Waits for the thread to finish. `None` if it was never spawned or
    /// already joined.
    pub fn join(&mut self) -> Option<thread::Result<()>> {
        self.handle.take().map(JoinHandle::join)
    }
}

impl Default for HostThread {
    fn default() -> Self {
        Self::new()
    }
}

// Entry parameters are raw pointers; the caller of spawn_static vouches
// for them.
struct SendPtr(*mut c_void);

unsafe impl Send for SendPtr {}

impl SendPtr {
    fn into_inner(self) -> *mut c_void {
        self.0
    }
}

impl ThreadPort for Host {
    type ControlBlock = HostThread;

    const CONTROL_BLOCK_INIT: HostThread = HostThread::new();

    unsafe fn spawn_static(
        name: &'static CStr,
        entry: ThreadEntry,
        param: *mut c_void,
        stack: &'static mut [StackWord],
        tcb: &'static mut HostThread,
        _priority: Priority,
        _tick: Ticks,
    ) -> Result<&'static mut HostThread, PortError> {
        let stack_bytes = size_of_val(stack).max(HOST_MIN_STACK_BYTES);
        let param = SendPtr(param);

        let handle = thread::Builder::new()
            .name(name.to_string_lossy().into_owned())
            .stack_size(stack_bytes)
            .spawn(move || entry(param.into_inner()))
            .map_err(|_| PortError::ThreadInit(HOST_SPAWN_FAILED))?;

        tcb.handle = Some(handle);
        Ok(tcb)
    }

    #[inline(always)]
    fn idle() {
        thread::yield_now();
    }
}
