//! Binary rendezvous between the render dispatch side and an event source,
//! driven through the public port API on the host port.

#![cfg(all(feature = "port-host", not(feature = "port-rt-thread")))]

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use arm2d_rtos_port::port::{Port, SemaphorePort};
use arm2d_rtos_port::sync::Semaphore;
use arm2d_rtos_port::SemaphoreHandle;

#[test]
fn wait_returns_once_signalled() {
    let sem = Port::new_semaphore();
    assert!(!sem.is_null());

    let (tx, rx) = mpsc::channel();
    let raw = sem.as_raw();
    let waiter = thread::spawn(move || {
        let ok = unsafe { Port::wait_for_semaphore(SemaphoreHandle::from_raw(raw)) };
        tx.send(ok).ok();
    });

    assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    unsafe { Port::set_semaphore(sem) };
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    assert!(waiter.join().is_ok());

    // `sem` must not be used after this point
    unsafe { Port::free_semaphore(sem) };
}

#[test]
fn null_wait_does_not_block() {
    let started = Instant::now();
    assert!(unsafe { Port::wait_for_semaphore(SemaphoreHandle::NULL) });
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn one_wakeup_per_signal() {
    const ROUNDS: usize = 200;

    let request: Semaphore = Semaphore::new();
    let done: Semaphore = Semaphore::new();

    thread::scope(|s| {
        s.spawn(|| {
            for _ in 0..ROUNDS {
                assert!(request.take());
                done.give();
            }
        });

        for _ in 0..ROUNDS {
            request.give();
            assert!(done.take());
        }
    });

    // every signal was consumed: one more give lets exactly one take through
    done.give();
    assert!(done.take());
}

#[cfg(feature = "c-abi")]
#[no_mangle]
extern "C" fn arm_2d_helper_backend_task() {}
