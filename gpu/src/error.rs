//! Error kinds surfaced by the public API (§7).
//!
//! Policy follows §7 exactly: constructors of native resources that fail
//! return `Err` and log the underlying native error verbatim at category
//! `GPU` (the logging itself happens in `gpu-hal`, one layer down, where
//! the native error is still in scope); non-creating operations that hit a
//! validation failure log and return without effect rather than panic.

use thiserror::Error;

/// Top-level error returned by resource-creating and device-level
/// operations.
#[derive(Debug, Error)]
pub enum GpuError {
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    #[error("out of memory")]
    OutOfMemory,
    #[error("device lost")]
    DeviceLost,
}

impl From<gpu_hal::DeviceError> for GpuError {
    fn from(err: gpu_hal::DeviceError) -> Self {
        match err {
            gpu_hal::DeviceError::OutOfMemory => GpuError::OutOfMemory,
            gpu_hal::DeviceError::Lost => GpuError::DeviceLost,
        }
    }
}

impl From<gpu_hal::InstanceError> for GpuError {
    fn from(err: gpu_hal::InstanceError) -> Self {
        GpuError::InvalidOperation(err.to_string())
    }
}

impl From<gpu_hal::SurfaceError> for GpuError {
    fn from(err: gpu_hal::SurfaceError) -> Self {
        match err {
            gpu_hal::SurfaceError::Lost => GpuError::DeviceLost,
            gpu_hal::SurfaceError::OutOfMemory => GpuError::OutOfMemory,
            other => GpuError::InvalidOperation(other.to_string()),
        }
    }
}

/// Re-export of the closed acquire/present outcome set (§4.6, §4.10, §7);
/// `gpu` doesn't wrap it further, it's already the right shape.
pub use gpu_hal::SurfaceError;
pub use gpu_types::AcquireSurfaceResult;
