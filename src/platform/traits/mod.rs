//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod edge;
pub mod gpio;
pub mod platform;
pub mod pwm;

// Re-export trait interfaces
pub use edge::{EdgeEvent, EdgeInterface, EdgeKind, EdgeToken};
pub use gpio::{GpioInterface, GpioMode, Level};
pub use platform::Platform;
pub use pwm::{PwmConfig, PwmInterface};
