/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * The port layer binds the helper's abstract threading requirements onto
 * one RTOS:
 * - Semaphores (create, delete, take forever, release)
 * - One statically allocated thread
 *
 * Select a port via Cargo features (`port-host`, `port-rt-thread`).
 */

//! Port Layer
//!
//! Each port implements [`SemaphorePort`] and [`ThreadPort`] for a zero-sized
//! marker type, re-exported here as [`Port`]. The rest of the crate (and the
//! Arm-2D helper through the `c-abi` exports) only talks to `Port`.
//!
//! ## Available Ports
//!
//! - `port-rt-thread` - RT-Thread kernel through its C API
//! - `port-host` - `std` threads, for tests and desktop simulation
//!
//! ## Overriding
//!
//! The four adapter operations of [`SemaphorePort`] are provided methods.
//! A port that needs different behaviour for one of them overrides just that
//! method and inherits the rest.

use core::ffi::c_void;

use crate::error::PortError;
use crate::trace;
use crate::types::*;

// Only use the host port if port-host is enabled AND port-rt-thread is NOT
// enabled. This makes the ports mutually exclusive.
#[cfg(all(feature = "port-host", not(feature = "port-rt-thread")))]
mod host;

#[cfg(all(feature = "port-host", not(feature = "port-rt-thread")))]
pub use host::{Host as Port, Host, HostThread};

#[cfg(feature = "port-rt-thread")]
mod rt_thread;

#[cfg(feature = "port-rt-thread")]
pub use rt_thread::{RtThread as Port, RtThread, RtThreadControlBlock};

#[cfg(not(any(feature = "port-host", feature = "port-rt-thread")))]
compile_error!("select a port: enable `port-host` or `port-rt-thread`");

// =============================================================================
// Semaphores
// =============================================================================

/// Semaphore capability required by the Arm-2D helper.
///
/// The `*_raw` primitives map one-to-one onto RTOS calls and only ever see
/// non-null handles. The provided methods are the adapter contract the helper
/// relies on: null handles are no-ops, waits always report success and
/// allocation failure is fatal.
pub trait SemaphorePort {
    /// Creates a semaphore with count 0 and a priority-ordered wait queue.
    ///
    /// Returns `None` when the RTOS is out of semaphore objects.
    fn create_raw() -> Option<SemaphoreHandle>;

    /// Deletes a semaphore.
    ///
    /// # Safety
    ///
    /// `handle` must be non-null and returned by [`Self::create_raw`], and
    /// must not have been deleted already.
    unsafe fn delete_raw(handle: SemaphoreHandle);

    /// Blocks the calling thread until the semaphore is released.
    ///
    /// # Safety
    ///
    /// `handle` must refer to a live semaphore of this port.
    unsafe fn take_raw(handle: SemaphoreHandle);

    /// Releases the semaphore, waking one waiter if any.
    ///
    /// # Safety
    ///
    /// `handle` must refer to a live semaphore of this port.
    unsafe fn release_raw(handle: SemaphoreHandle);

    /// Allocates a new semaphore for the helper.
    ///
    /// # Panics
    ///
    /// Panics if the RTOS cannot allocate the semaphore. Kernel objects are
    /// sized at build time; running out is a configuration bug.
    fn new_semaphore() -> SemaphoreHandle {
        let handle = Self::create_raw().filter(|h| !h.is_null());
        match handle {
            Some(handle) => {
                trace::semaphore_create(handle);
                handle
            }
            None => {
                trace::semaphore_create_failed();
                panic!("semaphore allocation failed");
            }
        }
    }

    /// Frees a semaphore. No-op for a null handle.
    ///
    /// # Safety
    ///
    /// A non-null `handle` must be live. Freeing the same handle twice, or
    /// using any copy of it afterwards, is undefined.
    unsafe fn free_semaphore(handle: SemaphoreHandle) {
        if !handle.is_null() {
            trace::semaphore_delete(handle);
            Self::delete_raw(handle);
        }
    }

    /// Waits forever for the semaphore. Always returns `true`; returns
    /// immediately for a null handle.
    ///
    /// # Safety
    ///
    /// A non-null `handle` must be live.
    unsafe fn wait_for_semaphore(handle: SemaphoreHandle) -> bool {
        if !handle.is_null() {
            trace::semaphore_take(handle);
            Self::take_raw(handle);
        }
        true
    }

    /// Signals the semaphore. No-op for a null handle.
    ///
    /// # Safety
    ///
    /// A non-null `handle` must be live.
    unsafe fn set_semaphore(handle: SemaphoreHandle) {
        if !handle.is_null() {
            trace::semaphore_give(handle);
            Self::release_raw(handle);
        }
    }
}

// =============================================================================
// Threads
// =============================================================================

/// Thread capability used to bring up the backend render thread.
pub trait ThreadPort {
    /// RTOS thread control block, stored in static memory.
    type ControlBlock: Send + 'static;

    /// Initial (unused) control block value, so it can live in a `static`.
    const CONTROL_BLOCK_INIT: Self::ControlBlock;

    /// Creates a thread on caller-provided static storage and starts it.
    ///
    /// `param` is handed to `entry` unchanged. The control block is handed
    /// back so the caller keeps access to the running thread.
    ///
    /// # Safety
    ///
    /// `param` must stay valid for as long as the thread may read it.
    unsafe fn spawn_static(
        name: &'static core::ffi::CStr,
        entry: ThreadEntry,
        param: *mut c_void,
        stack: &'static mut [StackWord],
        tcb: &'static mut Self::ControlBlock,
        priority: Priority,
        tick: Ticks,
    ) -> Result<&'static mut Self::ControlBlock, PortError>;

    /// One iteration of an idle loop (a NOP on target).
    fn idle();
}
