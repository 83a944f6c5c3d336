/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of
 * this software and associated documentation files (the "Software"), to deal in
 * the Software without restriction, including without limitation the rights to
 * use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
 * the Software, and to permit persons to whom the Software is furnished to do so,
 * subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
 * FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
 * COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
 * IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
 * CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
 */

//! # arm2d-rtos-port - RTOS port layer for the Arm-2D helper
//!
//! The Arm-2D helper needs two things from the operating system: a semaphore
//! and a background thread that runs its render dispatch loop. This crate
//! provides both on top of RT-Thread, plus a host port for tests.
//!
//! ## Features
//!
//! - `port-host` - `std` threads and condvars (default)
//! - `port-rt-thread` - RT-Thread kernel; wins over `port-host`
//! - `std` - Enable std (implied by `port-host`)
//! - `async` - the helper has a dedicated thread for 2D tasks
//! - `perf-counter` - register the backend thread with the cycle counter
//! - `c-abi` - export the C symbols the helper links against

#![no_std]

#[cfg(feature = "std")]
extern crate std;

// Core modules
pub mod config;
pub mod error;
pub mod trace;
pub mod types;

// Port layer
pub mod port;

// Helper-facing services
pub mod backend;
#[cfg(feature = "perf-counter")]
pub mod perf;
pub mod runtime;
pub mod sync;

#[cfg(feature = "c-abi")]
pub mod abi;

pub use error::PortError;
pub use runtime::{runtime_feature, RuntimeFeature};
pub use types::*;
