/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * C symbols the Arm-2D helper links against. Enabled by the `c-abi`
 * feature; leave it off to provide these symbols from elsewhere.
 */

//! C ABI Exports
//!
//! | Symbol                           | Backed by                          |
//! |----------------------------------|------------------------------------|
//! | `arm_2d_port_new_semaphore`      | [`SemaphorePort::new_semaphore`]   |
//! | `arm_2d_port_free_semaphore`     | [`SemaphorePort::free_semaphore`]  |
//! | `arm_2d_port_wait_for_semaphore` | [`SemaphorePort::wait_for_semaphore`] |
//! | `arm_2d_port_set_semaphoret`     | [`SemaphorePort::set_semaphore`]   |
//! | `ARM_2D_RUNTIME_FEATURE`         | [`ARM_2D_RUNTIME_FEATURE`]         |
//! | `arm_2d_backend_thread`          | [`backend_thread_body`]            |
//! | `arm_2d_helper_rtos_init`        | [`rtos_init`]                      |
//!
//! `arm_2d_port_set_semaphoret` is spelled the way the helper declares it.

use core::ffi::c_void;

use crate::backend::{backend_thread_body, rtos_init, BackendContext};
use crate::port::{Port, SemaphorePort, ThreadPort};
use crate::runtime::runtime_feature;
use crate::trace;
use crate::types::SemaphoreHandle;

extern "C" {
    /// Render dispatch loop of the Arm-2D helper.
    fn arm_2d_helper_backend_task();
}

fn helper_backend_task() {
    unsafe { arm_2d_helper_backend_task() }
}

#[cfg(all(feature = "perf-counter", feature = "port-rt-thread"))]
static PERF_COUNTER: crate::perf::PerfCounter = crate::perf::PerfCounter;

#[cfg(all(feature = "perf-counter", feature = "port-rt-thread"))]
static BACKEND: BackendContext =
    BackendContext::new(helper_backend_task).with_cycle_counter(&PERF_COUNTER);

#[cfg(not(all(feature = "perf-counter", feature = "port-rt-thread")))]
static BACKEND: BackendContext = BackendContext::new(helper_backend_task);

// =============================================================================
// Runtime feature flags
// =============================================================================

/// Defined in [`crate::runtime`] so there is a single record.
pub use crate::runtime::{RawRuntimeFeature, ARM_2D_RUNTIME_FEATURE};

// =============================================================================
// Semaphores
// =============================================================================

#[no_mangle]
pub extern "C" fn arm_2d_port_new_semaphore() -> usize {
    Port::new_semaphore().as_raw()
}

/// # Safety
///
/// `semaphore` must be 0 or a live handle from `arm_2d_port_new_semaphore`.
#[no_mangle]
pub unsafe extern "C" fn arm_2d_port_free_semaphore(semaphore: usize) {
    Port::free_semaphore(SemaphoreHandle::from_raw(semaphore));
}

/// # Safety
///
/// `semaphore` must be 0 or a live handle from `arm_2d_port_new_semaphore`.
#[no_mangle]
pub unsafe extern "C" fn arm_2d_port_wait_for_semaphore(semaphore: usize) -> bool {
    Port::wait_for_semaphore(SemaphoreHandle::from_raw(semaphore))
}

/// # Safety
///
/// `semaphore` must be 0 or a live handle from `arm_2d_port_new_semaphore`.
#[no_mangle]
pub unsafe extern "C" fn arm_2d_port_set_semaphoret(semaphore: usize) {
    Port::set_semaphore(SemaphoreHandle::from_raw(semaphore));
}

// =============================================================================
// Backend thread
// =============================================================================

/// Backend thread entry for C callers. Ignores its argument and never
/// returns.
#[no_mangle]
pub extern "C" fn arm_2d_backend_thread(_argument: *mut c_void) -> ! {
    backend_thread_body::<Port>(&BACKEND);
    // Only reachable if someone requested an exit; still never exit the
    // RTOS thread.
    loop {
        Port::idle();
    }
}

#[no_mangle]
pub extern "C" fn arm_2d_helper_rtos_init() {
    // The helper reads the record from here on.
    trace::runtime_feature_frozen(runtime_feature());
    rtos_init(&BACKEND);
}
