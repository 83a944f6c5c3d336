//! System bring-up on the host port: one backend thread on the crate's
//! static storage.

#![cfg(all(feature = "port-host", not(feature = "port-rt-thread")))]

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use arm2d_rtos_port::backend::{rtos_init, BackendContext};
use arm2d_rtos_port::sync::Semaphore;
use arm2d_rtos_port::BackendState;

static DISPATCH_CALLS: AtomicUsize = AtomicUsize::new(0);
static FRAME: OnceLock<Semaphore> = OnceLock::new();

fn frame() -> &'static Semaphore {
    FRAME.get_or_init(Semaphore::new)
}

// Stands in for the helper's dispatch loop: serve one frame, then return.
fn dispatch() {
    DISPATCH_CALLS.fetch_add(1, Ordering::SeqCst);
    frame().take();
}

fn noop() {}

static BACKEND: BackendContext = BackendContext::new(dispatch);
static SECOND: BackendContext = BackendContext::new(noop);

#[test]
fn backend_thread_is_created_once() {
    frame();
    let thread = rtos_init(&BACKEND);
    assert_eq!(thread.name(), Some("Arm2dBackend"));

    while BACKEND.state() != BackendState::Running {
        std::thread::yield_now();
    }

    // static storage is gone; a second bring-up is a contract violation
    let again = panic::catch_unwind(AssertUnwindSafe(|| {
        rtos_init(&SECOND);
    }));
    assert!(again.is_err());
    assert_eq!(SECOND.state(), BackendState::Unstarted);

    // dispatch returns: the thread parks instead of exiting
    frame().give();
    while BACKEND.state() != BackendState::Parked {
        std::thread::yield_now();
    }
    assert!(thread.is_spawned());

    BACKEND.request_exit();
    assert!(matches!(thread.join(), Some(Ok(()))));
    assert_eq!(BACKEND.state(), BackendState::Stopped);
    assert_eq!(DISPATCH_CALLS.load(Ordering::SeqCst), 1);
}

#[cfg(feature = "c-abi")]
#[no_mangle]
extern "C" fn arm_2d_helper_backend_task() {}
