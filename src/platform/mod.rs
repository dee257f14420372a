//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the GPIO, PWM and
//! edge-notification services the chassis depends on. All transport-specific
//! code (daemon connections, MCU HALs) lives behind these traits.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{EdgeError, GpioError, PlatformError, PwmError, Result};
pub use traits::{
    EdgeEvent, EdgeInterface, EdgeKind, EdgeToken, GpioInterface, GpioMode, Level, Platform,
    PwmConfig, PwmInterface,
};
