/*
 * arm2d-rtos-port
 * Copyright (C) 2024 The arm2d-rtos-port Authors. All Rights Reserved.
 *
 * SPDX-License-Identifier: MIT
 *
 * The backend thread services the helper's render dispatch for the lifetime
 * of the process. Its stack and control block are static; nothing is ever
 * torn down on target.
 */

//! Backend Render Thread
//!
//! Lifecycle: `Unstarted -> Starting -> Running -> Parked`. The dispatch
//! entry point (normally `arm_2d_helper_backend_task`) does not return under
//! normal operation; if it does, the thread idles instead of exiting because
//! the RTOS thread-exit call is never used.
//!
//! # Task Creation
//!
//! - [`rtos_init`]: bring-up helper using the crate's static stack and
//!   control block; call exactly once
//! - [`start`]: same, on caller-provided static storage

use core::ffi::c_void;
use core::mem::size_of_val;
use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use static_cell::ConstStaticCell;

use crate::config::*;
use crate::error::PortError;
use crate::port::{Port, ThreadPort};
#[cfg(feature = "perf-counter")]
use crate::perf::CycleCounter;
use crate::trace;
use crate::types::*;

/// Render dispatch entry point; does not return under normal operation.
pub type DispatchFn = fn();

/// Explicit state shared between the bring-up code and the backend thread.
///
/// Constructed before any other component starts and never destroyed, so
/// it normally lives in a `static`.
pub struct BackendContext {
    dispatch: DispatchFn,
    state: AtomicU8,
    exit: AtomicBool,
    #[cfg(feature = "perf-counter")]
    cycle_counter: Option<&'static dyn CycleCounter>,
}

impl BackendContext {
    pub const fn new(dispatch: DispatchFn) -> Self {
        Self {
            dispatch,
            state: AtomicU8::new(BackendState::Unstarted as u8),
            exit: AtomicBool::new(false),
            #[cfg(feature = "perf-counter")]
            cycle_counter: None,
        }
    }

    /// Registers the backend thread with `counter` before dispatch starts.
    #[cfg(feature = "perf-counter")]
    pub const fn with_cycle_counter(mut self, counter: &'static dyn CycleCounter) -> Self {
        self.cycle_counter = Some(counter);
        self
    }

    pub fn state(&self) -> BackendState {
        BackendState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Lets a parked backend thread return from its body.
    ///
    /// Nothing calls this on target; it exists so tests and simulations can
    /// wind the thread down. It does not interrupt a dispatch in progress.
    pub fn request_exit(&self) {
        self.exit.store(true, Ordering::Release);
    }

    pub fn exit_requested(&self) -> bool {
        self.exit.load(Ordering::Acquire)
    }

    fn set_state(&self, state: BackendState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Body of the backend thread.
///
/// Registers with the cycle counter (if compiled in), runs the dispatch
/// entry point and, should it return, idles on `P::idle` until an exit is
/// requested. On target no exit is ever requested.
pub fn backend_thread_body<P: ThreadPort>(ctx: &BackendContext) {
    #[cfg(feature = "perf-counter")]
    if let Some(counter) = ctx.cycle_counter {
        trace::perf_register(counter.register_current_task());
    }

    ctx.set_state(BackendState::Running);
    trace::backend_start();
    (ctx.dispatch)();

    ctx.set_state(BackendState::Parked);
    trace::backend_park();
    while !ctx.exit_requested() {
        P::idle();
    }

    ctx.set_state(BackendState::Stopped);
    trace::backend_stop();
}

extern "C" fn backend_entry<P: ThreadPort>(param: *mut c_void) {
    // start() always passes a &'static BackendContext
    let ctx = unsafe { &*(param as *const BackendContext) };
    backend_thread_body::<P>(ctx);
}

/// Creates and starts the backend thread for `ctx` on the given static
/// storage.
///
/// Fails with [`PortError::AlreadyStarted`] if `ctx` already has a thread.
/// If the RTOS rejects the thread the context is left unstarted.
pub fn start<P: ThreadPort>(
    ctx: &'static BackendContext,
    stack: &'static mut [StackWord],
    tcb: &'static mut P::ControlBlock,
) -> Result<&'static mut P::ControlBlock, PortError> {
    // The thread itself moves Starting -> Running.
    ctx.state
        .compare_exchange(
            BackendState::Unstarted as u8,
            BackendState::Starting as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        )
        .map_err(|_| PortError::AlreadyStarted)?;

    trace::backend_create(
        BACKEND_THREAD_PRIORITY,
        BACKEND_THREAD_TICK,
        size_of_val(stack),
    );

    let param = ctx as *const BackendContext as *mut c_void;
    let spawned = unsafe {
        P::spawn_static(
            BACKEND_THREAD_NAME,
            backend_entry::<P>,
            param,
            stack,
            tcb,
            BACKEND_THREAD_PRIORITY,
            BACKEND_THREAD_TICK,
        )
    };

    spawned.map_err(|err| {
        trace::backend_create_failed(err);
        ctx.set_state(BackendState::Unstarted);
        err
    })
}

// =============================================================================
// Static storage
// =============================================================================

static BACKEND_STACK: ConstStaticCell<[StackWord; BACKEND_STACK_WORDS]> =
    ConstStaticCell::new([0; BACKEND_STACK_WORDS]);

static BACKEND_TCB: ConstStaticCell<<Port as ThreadPort>::ControlBlock> =
    ConstStaticCell::new(<Port as ThreadPort>::CONTROL_BLOCK_INIT);

/// Brings up the backend thread on the crate's static stack and control
/// block.
///
/// Single-call contract: the static storage can only be taken once.
///
/// # Panics
///
/// Panics when called a second time, or when the RTOS refuses the thread.
/// Both are boot-time configuration bugs.
pub fn rtos_init(ctx: &'static BackendContext) -> &'static mut <Port as ThreadPort>::ControlBlock {
    let stack = BACKEND_STACK.take();
    let tcb = BACKEND_TCB.take();

    match start::<Port>(ctx, stack, tcb) {
        Ok(tcb) => tcb,
        Err(err) => panic!("backend thread: {}", err),
    }
}

#[cfg(all(test, feature = "port-host", not(feature = "port-rt-thread")))]
mod tests {
    use super::*;
    use crate::port::Host;
    use core::sync::atomic::AtomicUsize;
    use std::boxed::Box;

    fn leak_storage() -> (&'static mut [StackWord], &'static mut <Host as ThreadPort>::ControlBlock) {
        let stack: &'static mut [StackWord] = Box::leak(Box::new([0 as StackWord; 64]));
        let tcb = Box::leak(Box::new(Host::CONTROL_BLOCK_INIT));
        (stack, tcb)
    }

    fn wait_for(ctx: &BackendContext, state: BackendState) {
        while ctx.state() != state {
            std::thread::yield_now();
        }
    }

    static RETURNING_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn returning_dispatch() {
        RETURNING_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn body_parks_until_exit_requested() {
        static CTX: BackendContext = BackendContext::new(returning_dispatch);
        let (stack, tcb) = leak_storage();

        assert_eq!(CTX.state(), BackendState::Unstarted);
        let tcb = start::<Host>(&CTX, stack, tcb).expect("start");
        assert_eq!(tcb.name(), Some("Arm2dBackend"));

        // dispatch returned; the thread must not exit on its own
        wait_for(&CTX, BackendState::Parked);
        assert!(tcb.is_spawned());

        CTX.request_exit();
        assert!(matches!(tcb.join(), Some(Ok(()))));
        assert_eq!(CTX.state(), BackendState::Stopped);
        assert_eq!(RETURNING_CALLS.load(Ordering::SeqCst), 1);
    }

    fn idle_dispatch() {}

    #[test]
    fn second_start_is_rejected() {
        static CTX: BackendContext = BackendContext::new(idle_dispatch);
        let (stack, tcb) = leak_storage();
        let first = start::<Host>(&CTX, stack, tcb).expect("start");

        let (stack, tcb) = leak_storage();
        let second = start::<Host>(&CTX, stack, tcb);
        assert!(matches!(second, Err(PortError::AlreadyStarted)));

        CTX.request_exit();
        assert!(matches!(first.join(), Some(Ok(()))));
    }

    // Accepts the thread but never runs it, like a kernel that has not
    // scheduled it yet.
    struct Deferred;

    impl ThreadPort for Deferred {
        type ControlBlock = ();
        const CONTROL_BLOCK_INIT: () = ();

        unsafe fn spawn_static(
            _name: &'static core::ffi::CStr,
            _entry: ThreadEntry,
            _param: *mut c_void,
            _stack: &'static mut [StackWord],
            tcb: &'static mut (),
            _priority: Priority,
            _tick: Ticks,
        ) -> Result<&'static mut (), PortError> {
            Ok(tcb)
        }

        fn idle() {}
    }

    #[test]
    fn started_but_unscheduled_thread_is_not_running() {
        static CTX: BackendContext = BackendContext::new(idle_dispatch);
        let stack = Box::leak(Box::new([0 as StackWord; 8]));

        assert!(start::<Deferred>(&CTX, stack, Box::leak(Box::new(()))).is_ok());
        assert_eq!(CTX.state(), BackendState::Starting);

        // still claimed
        let stack = Box::leak(Box::new([0 as StackWord; 8]));
        let again = start::<Deferred>(&CTX, stack, Box::leak(Box::new(())));
        assert!(matches!(again, Err(PortError::AlreadyStarted)));
    }

    struct Refused;

    impl ThreadPort for Refused {
        type ControlBlock = ();
        const CONTROL_BLOCK_INIT: () = ();

        unsafe fn spawn_static(
            _name: &'static core::ffi::CStr,
            _entry: ThreadEntry,
            _param: *mut c_void,
            _stack: &'static mut [StackWord],
            _tcb: &'static mut (),
            _priority: Priority,
            _tick: Ticks,
        ) -> Result<&'static mut (), PortError> {
            Err(PortError::ThreadInit(-2))
        }

        fn idle() {}
    }

    #[test]
    fn refused_thread_leaves_context_unstarted() {
        static CTX: BackendContext = BackendContext::new(idle_dispatch);
        let stack = Box::leak(Box::new([0 as StackWord; 8]));

        let err = start::<Refused>(&CTX, stack, Box::leak(Box::new(())));
        assert!(matches!(err, Err(PortError::ThreadInit(-2))));
        assert_eq!(CTX.state(), BackendState::Unstarted);
    }

    #[cfg(feature = "perf-counter")]
    #[test]
    fn registers_with_cycle_counter_before_dispatch() {
        use crate::perf::CycleCounter;

        static REGISTERED: AtomicBool = AtomicBool::new(false);
        static DISPATCHED_AFTER_REGISTER: AtomicBool = AtomicBool::new(false);

        struct Recorder;
        impl CycleCounter for Recorder {
            fn register_current_task(&self) -> bool {
                REGISTERED.store(true, Ordering::SeqCst);
                true
            }
        }
        static RECORDER: Recorder = Recorder;

        fn dispatch() {
            DISPATCHED_AFTER_REGISTER.store(REGISTERED.load(Ordering::SeqCst), Ordering::SeqCst);
        }

        static CTX: BackendContext = BackendContext::new(dispatch).with_cycle_counter(&RECORDER);
        CTX.request_exit();
        backend_thread_body::<Host>(&CTX);

        assert!(DISPATCHED_AFTER_REGISTER.load(Ordering::SeqCst));
        assert_eq!(CTX.state(), BackendState::Stopped);
    }
}
