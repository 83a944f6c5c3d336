//! The exported C symbols, called the way the Arm-2D helper calls them.
//!
//! Run with `--features c-abi`.

#![cfg(all(feature = "c-abi", feature = "port-host", not(feature = "port-rt-thread")))]

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use arm2d_rtos_port::abi::{
    arm_2d_port_free_semaphore, arm_2d_port_new_semaphore, arm_2d_port_set_semaphoret,
    arm_2d_port_wait_for_semaphore,
};
use arm2d_rtos_port::runtime::install_runtime_feature;
use arm2d_rtos_port::{runtime_feature, RuntimeFeature};

// Resolved by symbol name, as the helper sees it.
mod helper {
    extern "C" {
        pub static ARM_2D_RUNTIME_FEATURE: [u8; 4];
    }
}

#[no_mangle]
extern "C" fn arm_2d_helper_backend_task() {}

#[test]
fn semaphore_exports_rendezvous() {
    let sem = arm_2d_port_new_semaphore();
    assert_ne!(sem, 0);

    let (tx, rx) = mpsc::channel();
    let waiter = thread::spawn(move || {
        tx.send(unsafe { arm_2d_port_wait_for_semaphore(sem) }).ok();
    });

    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    unsafe { arm_2d_port_set_semaphoret(sem) };
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    assert!(waiter.join().is_ok());

    unsafe { arm_2d_port_free_semaphore(sem) };
}

#[test]
fn zero_handle_is_a_no_op() {
    unsafe {
        assert!(arm_2d_port_wait_for_semaphore(0));
        arm_2d_port_set_semaphoret(0);
        arm_2d_port_free_semaphore(0);
    }
}

#[test]
fn installed_feature_is_what_the_helper_reads() {
    let custom = RuntimeFeature {
        treat_out_of_range_as_complete: false,
        has_dedicated_thread_for_2d_task: true,
    };
    assert_eq!(install_runtime_feature(custom), Ok(custom));
    assert_eq!(runtime_feature(), custom);

    let raw = unsafe { std::ptr::addr_of!(helper::ARM_2D_RUNTIME_FEATURE).read_volatile() };
    assert_eq!(raw, [0b10, 0, 0, 0]);
}
