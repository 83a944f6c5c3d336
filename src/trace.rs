/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * Trace hooks called at the port's event points. They forward to the `log`
 * facade; with no logger installed (or `log`'s `max_level_off` features)
 * they cost nothing.
 */

//! Trace Hooks
//!
//! ## Categories
//!
//! - `semaphore_*` - semaphore create/delete/take/give
//! - `backend_*` - backend thread lifecycle
//! - `perf_*` - cycle counter registration
//! - `runtime_*` - runtime feature record

use log::{debug, info, trace, warn};

use crate::types::*;

// =============================================================================
// Semaphore tracing
// =============================================================================

#[inline(always)]
pub fn semaphore_create(handle: SemaphoreHandle) {
    trace!("sem create {:?}", handle);
}

#[inline(always)]
pub fn semaphore_create_failed() {
    warn!("sem create failed: out of kernel objects");
}

#[inline(always)]
pub fn semaphore_delete(handle: SemaphoreHandle) {
    trace!("sem delete {:?}", handle);
}

#[inline(always)]
pub fn semaphore_take(handle: SemaphoreHandle) {
    trace!("sem take {:?}", handle);
}

#[inline(always)]
pub fn semaphore_give(handle: SemaphoreHandle) {
    trace!("sem give {:?}", handle);
}

// =============================================================================
// Backend thread tracing
// =============================================================================

#[inline(always)]
pub fn backend_create(priority: Priority, tick: Ticks, stack_bytes: usize) {
    debug!(
        "backend thread: prio {} tick {} stack {} bytes",
        priority, tick, stack_bytes
    );
}

#[inline(always)]
pub fn backend_create_failed(err: crate::PortError) {
    warn!("backend thread: {}", err);
}

#[inline(always)]
pub fn backend_start() {
    info!("backend thread started");
}

#[inline(always)]
pub fn backend_park() {
    warn!("backend dispatch returned, parking thread");
}

#[inline(always)]
pub fn backend_stop() {
    debug!("backend thread stopped");
}

// =============================================================================
// Perf counter tracing
// =============================================================================

#[inline(always)]
pub fn perf_register(has_render_info: bool) {
    debug!("perf counter: task registered (render info: {})", has_render_info);
}

// =============================================================================
// Runtime feature tracing
// =============================================================================

#[inline(always)]
pub fn runtime_feature_frozen(feature: crate::RuntimeFeature) {
    debug!(
        "runtime feature: out-of-range complete {}, dedicated 2D thread {}",
        feature.treat_out_of_range_as_complete, feature.has_dedicated_thread_for_2d_task
    );
}
