/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * Base types shared by every port. The C side of the Arm-2D helper only
 * ever sees these as plain integers (`uintptr_t`, `uint8_t`, `uint32_t`).
 */

//! Port Base Types
//!
//! - [`SemaphoreHandle`] - opaque pointer-sized semaphore identifier
//! - [`StackWord`] - one slot of a statically allocated thread stack
//! - [`Priority`] / [`Ticks`] - RTOS thread scheduling parameters
//! - [`BackendState`] - lifecycle of the backend render thread

use core::ffi::c_void;
use core::fmt;

// =============================================================================
// Semaphore handle
// =============================================================================

/// Opaque identifier of one RTOS semaphore object.
///
/// The handle is either null (never created, or already freed) or refers to
/// exactly one live semaphore. It is `Copy` because the C side passes it
/// around as `uintptr_t`; nothing stops a copy from outliving
/// [`SemaphorePort::free_semaphore`](crate::port::SemaphorePort::free_semaphore).
/// Using a handle after it was freed is undefined. Use
/// [`Semaphore`](crate::sync::Semaphore) for ownership checked by the compiler.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct SemaphoreHandle(usize);

impl SemaphoreHandle {
    /// The null handle. Every operation on it is a no-op.
    pub const NULL: Self = Self(0);

    #[inline(always)]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub fn from_ptr<T>(ptr: *mut T) -> Self {
        Self(ptr as usize)
    }

    #[inline(always)]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    #[inline(always)]
    pub fn as_ptr<T>(self) -> *mut T {
        self.0 as *mut T
    }

    #[inline(always)]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for SemaphoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "SemaphoreHandle(null)")
        } else {
            write!(f, "SemaphoreHandle({:#x})", self.0)
        }
    }
}

// =============================================================================
// Thread parameters
// =============================================================================

/// Stack element type. The backend stack is declared in 8-byte words so
/// it is 8-byte aligned on every target.
pub type StackWord = u64;

/// RTOS thread priority (lower value = more urgent on RT-Thread).
pub type Priority = u8;

/// Time slice in RTOS ticks.
pub type Ticks = u32;

/// Thread entry signature shared by every port.
///
/// The parameter is whatever was handed to
/// [`ThreadPort::spawn_static`](crate::port::ThreadPort::spawn_static).
pub type ThreadEntry = extern "C" fn(*mut c_void);

// =============================================================================
// Backend thread state
// =============================================================================

/// Lifecycle of the backend render thread.
///
/// `Unstarted -> Starting -> Running -> Parked`. On target the thread stays
/// in `Parked` for the rest of the process; `Stopped` is only reached after
/// [`BackendContext::request_exit`](crate::backend::BackendContext::request_exit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BackendState {
    Unstarted = 0,
    /// Claimed by a `start` call; the thread has not run yet.
    Starting = 1,
    /// Inside the render dispatch loop.
    Running = 2,
    /// Dispatch returned; idling instead of exiting.
    Parked = 3,
    Stopped = 4,
}

impl BackendState {
    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => BackendState::Starting,
            2 => BackendState::Running,
            3 => BackendState::Parked,
            4 => BackendState::Stopped,
            _ => BackendState::Unstarted,
        }
    }
}

impl fmt::Display for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendState::Unstarted => write!(f, "unstarted"),
            BackendState::Starting => write!(f, "starting"),
            BackendState::Running => write!(f, "running"),
            BackendState::Parked => write!(f, "parked"),
            BackendState::Stopped => write!(f, "stopped"),
        }
    }
}
