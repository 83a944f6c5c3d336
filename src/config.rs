/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * Configuration is done via:
 * - Cargo features for major toggles (port selection, async, perf-counter)
 * - Constants in this module for numeric values
 */

//! Port Configuration
//!
//! Fixed values the port hands to the RTOS. They match what the Arm-2D
//! helper expects from an RT-Thread integration.

use core::ffi::CStr;
use core::mem::size_of;

use crate::types::*;

// =============================================================================
// Semaphores
// =============================================================================

/// Kernel object name given to every helper semaphore
pub const SEMAPHORE_NAME: &CStr = c"dsem";

/// Initial count of a freshly created semaphore
pub const SEMAPHORE_INITIAL_COUNT: u32 = 0;

// =============================================================================
// Backend thread
// =============================================================================

/// Kernel object name of the backend render thread
pub const BACKEND_THREAD_NAME: &CStr = c"Arm2dBackend";

/// Backend thread priority
pub const BACKEND_THREAD_PRIORITY: Priority = 25;

/// Backend thread time slice (ticks)
pub const BACKEND_THREAD_TICK: Ticks = 100;

/// Backend stack depth (in words, not bytes)
pub const BACKEND_STACK_WORDS: usize = 2048;

/// Backend stack size in bytes (16 KiB)
pub const BACKEND_STACK_BYTES: usize = BACKEND_STACK_WORDS * size_of::<StackWord>();

// =============================================================================
// Port-specific sizing
// =============================================================================

/// Storage reserved for RT-Thread's `struct rt_thread`.
///
/// The real size depends on `rtconfig.h` (object name length, SMP, signals,
/// ...). This is an upper bound for common configurations; raise it if the
/// kernel is built with larger options.
pub const RT_THREAD_CONTROL_BLOCK_BYTES: usize = 512;

/// Smallest stack handed to a host thread. Host threads run the Rust test
/// harness and `log` machinery, which need more than the target budget.
pub const HOST_MIN_STACK_BYTES: usize = 64 * 1024;

// =============================================================================
// Arm-2D helper
// =============================================================================

/// Whether the helper runs 2D tasks asynchronously (`__ARM_2D_HAS_ASYNC__`)
pub const ARM_2D_HAS_ASYNC: bool = cfg!(feature = "async");

/// Index of the render cycle-info object in the helper's perf counter table
/// (`ARM_2D_PERFC_RENDER`)
pub const ARM_2D_PERFC_RENDER: core::ffi::c_int = 0;
