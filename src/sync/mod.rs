//! Safe synchronization primitives
//!
//! Rust-idiomatic wrappers around the port's raw semaphore handles. The
//! wrappers use RAII: the underlying RTOS object is freed when the wrapper
//! drops.
//!
//! # Example
//!
//! ```ignore
//! use arm2d_rtos_port::sync::Semaphore;
//!
//! let frame_done: Semaphore = Semaphore::new();
//! frame_done.give();
//! frame_done.take();
//! ```

mod semaphore;

pub use semaphore::Semaphore;
