/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * RT-Thread port: binds the port traits onto the RT-Thread kernel's C API
 * (rtthread.h). The kernel itself is linked in by the integrator.
 */

//! RT-Thread Port Implementation
//!
//! - semaphores: `rt_sem_create` / `rt_sem_delete` / `rt_sem_take` /
//!   `rt_sem_release`, priority-ordered waiters, wait forever
//! - backend thread: `rt_thread_init` + `rt_thread_startup` on static storage

use core::ffi::{c_char, c_long, c_void, CStr};
use core::mem::size_of_val;

use super::{SemaphorePort, ThreadPort};
use crate::config::{RT_THREAD_CONTROL_BLOCK_BYTES, SEMAPHORE_INITIAL_COUNT, SEMAPHORE_NAME};
use crate::error::PortError;
use crate::types::*;

// =============================================================================
// Kernel bindings (rtdef.h / rtthread.h)
// =============================================================================

#[allow(non_camel_case_types)]
type rt_err_t = c_long;

#[allow(non_camel_case_types)]
type rt_sem_t = *mut c_void;

const RT_EOK: rt_err_t = 0;

/// Waiters are queued by thread priority
const RT_IPC_FLAG_PRIO: u8 = 0x01;

/// Block without timeout
const RT_WAITING_FOREVER: i32 = -1;

extern "C" {
    fn rt_sem_create(name: *const c_char, value: u32, flag: u8) -> rt_sem_t;
    fn rt_sem_delete(sem: rt_sem_t) -> rt_err_t;
    fn rt_sem_take(sem: rt_sem_t, timeout: i32) -> rt_err_t;
    fn rt_sem_release(sem: rt_sem_t) -> rt_err_t;

    fn rt_thread_init(
        thread: *mut c_void,
        name: *const c_char,
        entry: ThreadEntry,
        parameter: *mut c_void,
        stack_start: *mut c_void,
        stack_size: u32,
        priority: u8,
        tick: u32,
    ) -> rt_err_t;
    fn rt_thread_startup(thread: *mut c_void) -> rt_err_t;
}

/// Marker type for the RT-Thread port.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtThread;

// =============================================================================
// Semaphores
// =============================================================================

impl SemaphorePort for RtThread {
    fn create_raw() -> Option<SemaphoreHandle> {
        let sem = unsafe {
            rt_sem_create(
                SEMAPHORE_NAME.as_ptr(),
                SEMAPHORE_INITIAL_COUNT,
                RT_IPC_FLAG_PRIO,
            )
        };
        if sem.is_null() {
            None
        } else {
            Some(SemaphoreHandle::from_ptr(sem))
        }
    }

    unsafe fn delete_raw(handle: SemaphoreHandle) {
        rt_sem_delete(handle.as_ptr());
    }

    unsafe fn take_raw(handle: SemaphoreHandle) {
        // -RT_EINTR and friends are not reported to the helper
        rt_sem_take(handle.as_ptr(), RT_WAITING_FOREVER);
    }

    unsafe fn release_raw(handle: SemaphoreHandle) {
        rt_sem_release(handle.as_ptr());
    }
}

// =============================================================================
// Threads
// =============================================================================

/// Storage for a `struct rt_thread`, treated as opaque.
///
/// Sized by [`RT_THREAD_CONTROL_BLOCK_BYTES`]; the kernel initializes it.
#[repr(C, align(8))]
pub struct RtThreadControlBlock([u8; RT_THREAD_CONTROL_BLOCK_BYTES]);

// Only the kernel touches the block once the thread is initialized.
unsafe impl Send for RtThreadControlBlock {}

impl RtThreadControlBlock {
    pub const fn new() -> Self {
        Self([0; RT_THREAD_CONTROL_BLOCK_BYTES])
    }

    fn as_mut_ptr(&mut self) -> *mut c_void {
        self as *mut Self as *mut c_void
    }
}

impl Default for RtThreadControlBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadPort for RtThread {
    type ControlBlock = RtThreadControlBlock;

    const CONTROL_BLOCK_INIT: RtThreadControlBlock = RtThreadControlBlock::new();

    unsafe fn spawn_static(
        name: &'static CStr,
        entry: ThreadEntry,
        param: *mut c_void,
        stack: &'static mut [StackWord],
        tcb: &'static mut RtThreadControlBlock,
        priority: Priority,
        tick: Ticks,
    ) -> Result<&'static mut RtThreadControlBlock, PortError> {
        let stack_bytes = size_of_val(stack) as u32;

        let err = rt_thread_init(
            tcb.as_mut_ptr(),
            name.as_ptr(),
            entry,
            param,
            stack.as_mut_ptr() as *mut c_void,
            stack_bytes,
            priority,
            tick,
        );
        if err != RT_EOK {
            return Err(PortError::ThreadInit(err as i32));
        }

        let err = rt_thread_startup(tcb.as_mut_ptr());
        if err != RT_EOK {
            return Err(PortError::ThreadStartup(err as i32));
        }

        Ok(tcb)
    }

    #[inline(always)]
    fn idle() {
        core::hint::spin_loop();
    }
}
