//! Safe Semaphore wrapper
//!
//! Owns one port semaphore and frees it on drop. Ownership moves with the
//! value, so a handle can neither be freed twice nor used after free from
//! safe code.

use core::marker::PhantomData;
use core::mem::ManuallyDrop;

use crate::error::PortError;
use crate::port::{Port, SemaphorePort};
use crate::trace;
use crate::types::*;

/// A semaphore for signaling between threads.
///
/// Starts with count 0: the first [`take`](Self::take) blocks until another
/// thread (or ISR) calls [`give`](Self::give).
///
/// # Example
///
/// ```ignore
/// use arm2d_rtos_port::sync::Semaphore;
///
/// let sem: Semaphore = Semaphore::new();
///
/// // In one thread: wait for signal
/// sem.take();  // Blocks until signaled
///
/// // In another thread or ISR: signal
/// sem.give();
/// ```
pub struct Semaphore<P: SemaphorePort = Port> {
    handle: SemaphoreHandle,
    _port: PhantomData<P>,
}

// Safety: the RTOS semaphore object does its own synchronization
unsafe impl<P: SemaphorePort> Sync for Semaphore<P> {}
unsafe impl<P: SemaphorePort> Send for Semaphore<P> {}

impl<P: SemaphorePort> Semaphore<P> {
    /// Creates a new semaphore in the "not given" state.
    ///
    /// # Panics
    ///
    /// Panics if the RTOS is out of semaphore objects.
    pub fn new() -> Self {
        Self {
            handle: P::new_semaphore(),
            _port: PhantomData,
        }
    }

    /// Creates a new semaphore, reporting exhaustion instead of panicking.
    pub fn try_new() -> Result<Self, PortError> {
        match P::create_raw().filter(|h| !h.is_null()) {
            Some(handle) => {
                trace::semaphore_create(handle);
                Ok(Self {
                    handle,
                    _port: PhantomData,
                })
            }
            None => {
                trace::semaphore_create_failed();
                Err(PortError::SemaphoreExhausted)
            }
        }
    }

    /// Takes the semaphore, blocking indefinitely.
    ///
    /// Always returns `true`; the port does not report wait errors.
    pub fn take(&self) -> bool {
        unsafe { P::wait_for_semaphore(self.handle) }
    }

    /// Gives the semaphore, waking one waiter if any.
    pub fn give(&self) {
        unsafe { P::set_semaphore(self.handle) }
    }

    /// Returns the raw handle for interop with raw APIs.
    ///
    /// The handle stays owned by `self`.
    pub fn raw_handle(&self) -> SemaphoreHandle {
        self.handle
    }

    /// Gives up ownership; the caller must eventually pass the handle to
    /// [`SemaphorePort::free_semaphore`].
    pub fn into_raw(self) -> SemaphoreHandle {
        let this = ManuallyDrop::new(self);
        this.handle
    }

    /// Takes ownership of a raw handle.
    ///
    /// # Safety
    ///
    /// `handle` must be null or a live semaphore of port `P` that nothing
    /// else will free.
    pub unsafe fn from_raw(handle: SemaphoreHandle) -> Self {
        Self {
            handle,
            _port: PhantomData,
        }
    }
}

impl<P: SemaphorePort> Default for Semaphore<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: SemaphorePort> Drop for Semaphore<P> {
    fn drop(&mut self) {
        unsafe { P::free_semaphore(self.handle) }
    }
}

impl<P: SemaphorePort> core::fmt::Debug for Semaphore<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Semaphore").field("handle", &self.handle).finish()
    }
}
