//! Runtime feature flags of the Arm-2D helper
//!
//! The helper reads a small record describing optional policies. It is set
//! once, before any reader thread starts, and is read-only afterwards.
//!
//! There is exactly one process-wide record, [`ARM_2D_RUNTIME_FEATURE`].
//! With the `c-abi` feature it is exported under that name, so the C helper
//! reads the same bytes that [`install_runtime_feature`] writes.

use core::sync::atomic::{AtomicU8, Ordering};

use spin::Once;

use crate::config::ARM_2D_HAS_ASYNC;
use crate::error::PortError;

/// Behavioural policies the helper consults at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeFeature {
    /// Treat operations whose target region is out of range as complete
    /// instead of reporting an error.
    pub treat_out_of_range_as_complete: bool,
    /// 2D tasks are serviced by the dedicated backend thread.
    pub has_dedicated_thread_for_2d_task: bool,
}

impl RuntimeFeature {
    pub const DEFAULT: Self = Self {
        treat_out_of_range_as_complete: true,
        has_dedicated_thread_for_2d_task: ARM_2D_HAS_ASYNC,
    };

    /// Bit layout of the first byte of `arm_2d_runtime_feature_t`:
    /// `TREAT_OUT_OF_RANGE_AS_COMPLETE` in bit 0 and
    /// `HAS_DEDICATED_THREAD_FOR_2D_TASK` in bit 1.
    pub const fn to_bits(self) -> u8 {
        (self.treat_out_of_range_as_complete as u8)
            | ((self.has_dedicated_thread_for_2d_task as u8) << 1)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self {
            treat_out_of_range_as_complete: bits & 0b01 != 0,
            has_dedicated_thread_for_2d_task: bits & 0b10 != 0,
        }
    }
}

impl Default for RuntimeFeature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =============================================================================
// C record
// =============================================================================

/// Storage laid out as `arm_2d_runtime_feature_t`.
///
/// The C type is a 32-bit block of `uint8_t` bit fields: the two flags
/// in the first byte, the rest reserved and zero.
#[repr(C, align(4))]
pub struct RawRuntimeFeature {
    bits: AtomicU8,
    _reserved: [u8; 3],
}

impl RawRuntimeFeature {
    pub const fn new(feature: RuntimeFeature) -> Self {
        Self {
            bits: AtomicU8::new(feature.to_bits()),
            _reserved: [0; 3],
        }
    }

    pub fn load(&self) -> RuntimeFeature {
        RuntimeFeature::from_bits(self.bits.load(Ordering::Acquire))
    }

    fn store(&self, feature: RuntimeFeature) {
        self.bits.store(feature.to_bits(), Ordering::Release);
    }
}

// =============================================================================
// Write-once access
// =============================================================================

/// Write-once access to a [`RawRuntimeFeature`] record.
///
/// The record starts out holding [`RuntimeFeature::DEFAULT`]. The first
/// `install` or `get` freezes it.
pub struct RuntimeFeatureCell<'a> {
    record: &'a RawRuntimeFeature,
    frozen: Once,
}

impl<'a> RuntimeFeatureCell<'a> {
    pub const fn new(record: &'a RawRuntimeFeature) -> Self {
        Self {
            record,
            frozen: Once::new(),
        }
    }

    /// Sets the record. Only the first call (or first read) wins.
    pub fn install(&self, feature: RuntimeFeature) -> Result<RuntimeFeature, PortError> {
        let mut installed = false;
        self.frozen.call_once(|| {
            self.record.store(feature);
            installed = true;
        });
        if installed {
            Ok(feature)
        } else {
            Err(PortError::FeatureAlreadyInstalled)
        }
    }

    /// The installed record, or whatever the record held before the first
    /// read. Either way it is frozen from here on.
    pub fn get(&self) -> RuntimeFeature {
        self.frozen.call_once(|| ());
        self.record.load()
    }

    pub fn is_installed(&self) -> bool {
        self.frozen.is_completed()
    }
}

/// The process-wide record, `ARM_2D_RUNTIME_FEATURE` on the C side.
#[cfg_attr(feature = "c-abi", no_mangle)]
pub static ARM_2D_RUNTIME_FEATURE: RawRuntimeFeature =
    RawRuntimeFeature::new(RuntimeFeature::DEFAULT);

static RUNTIME_FEATURE: RuntimeFeatureCell<'static> =
    RuntimeFeatureCell::new(&ARM_2D_RUNTIME_FEATURE);

/// Process-wide runtime feature record. Freezes it.
pub fn runtime_feature() -> RuntimeFeature {
    RUNTIME_FEATURE.get()
}

/// Overrides the process-wide defaults. Must run during bring-up, before
/// the helper (or anything else) reads the record.
pub fn install_runtime_feature(feature: RuntimeFeature) -> Result<RuntimeFeature, PortError> {
    RUNTIME_FEATURE.install(feature)
}
