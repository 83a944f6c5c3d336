//! Port errors
//!
//! The C-facing contract has no error path: allocation failure at boot is
//! fatal and everything else either succeeds or no-ops. These errors belong
//! to the fallible Rust-facing variants (`try_new`, `backend::start`, ...).

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortError {
    /// The RTOS could not allocate another semaphore object
    SemaphoreExhausted,
    /// Thread initialization failed with this RTOS error code
    ThreadInit(i32),
    /// Thread startup failed with this RTOS error code
    ThreadStartup(i32),
    /// The backend context already owns a running thread
    AlreadyStarted,
    /// The runtime feature record was already set
    FeatureAlreadyInstalled,
}

impl fmt::Display for PortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortError::SemaphoreExhausted => write!(f, "no semaphore object available"),
            PortError::ThreadInit(code) => write!(f, "thread init failed ({})", code),
            PortError::ThreadStartup(code) => write!(f, "thread startup failed ({})", code),
            PortError::AlreadyStarted => write!(f, "backend thread already started"),
            PortError::FeatureAlreadyInstalled => {
                write!(f, "runtime feature flags already installed")
            }
        }
    }
}
