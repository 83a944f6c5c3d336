//! Cycle counter registration for the backend thread
//!
//! With the `perf-counter` feature the backend thread registers itself with
//! a per-task cycle counting facility before it enters render dispatch, so
//! the helper's render statistics only count cycles spent on that thread.

/// Per-task cycle accounting facility.
pub trait CycleCounter: Sync {
    /// Registers the calling thread for cycle accounting.
    ///
    /// Returns `true` if the helper's render cycle-info object was found and
    /// attached to the thread.
    fn register_current_task(&self) -> bool;
}

#[cfg(feature = "port-rt-thread")]
pub use self::perf_counter::PerfCounter;

/// Binding to the `perf_counter` C library and the helper's perf table.
#[cfg(feature = "port-rt-thread")]
mod perf_counter {
    use core::ffi::{c_int, c_void};

    use static_cell::ConstStaticCell;

    use super::CycleCounter;
    use crate::config::ARM_2D_PERFC_RENDER;

    // sizeof(task_cycle_info_agent_t): three pointers (info, list prev/next)
    #[repr(C)]
    struct TaskCycleInfoAgent([usize; 3]);

    static AGENT: ConstStaticCell<TaskCycleInfoAgent> =
        ConstStaticCell::new(TaskCycleInfoAgent([0; 3]));

    extern "C" {
        fn init_task_cycle_counter();
        fn init_task_cycle_info(info: *mut c_void) -> *mut c_void;
        fn register_task_cycle_agent(info: *mut c_void, agent: *mut c_void) -> *mut c_void;
        fn __arm_2d_helper_perf_counter_get(kind: c_int) -> *mut c_void;
    }

    /// The `perf_counter` library as linked into the firmware.
    pub struct PerfCounter;

    impl CycleCounter for PerfCounter {
        fn register_current_task(&self) -> bool {
            unsafe {
                init_task_cycle_counter();

                let info = __arm_2d_helper_perf_counter_get(ARM_2D_PERFC_RENDER);
                if info.is_null() {
                    return false;
                }
                // The agent is linked into the info object for the rest of
                // the process; a second registration would relink it.
                let Some(agent) = AGENT.try_take() else {
                    return false;
                };

                init_task_cycle_info(info);
                register_task_cycle_agent(info, agent as *mut TaskCycleInfoAgent as *mut c_void);
            }
            true
        }
    }
}
