//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their transport-specific errors to these
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// GPIO operation failed
    Gpio(GpioError),
    /// PWM operation failed
    Pwm(PwmError),
    /// Edge subscription operation failed
    Edge(EdgeError),
    /// Session establishment with the GPIO service failed
    ConnectionFailed,
    /// Platform initialization failed
    InitializationFailed,
    /// Resource not available
    ResourceUnavailable,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid pin number
    InvalidPin,
    /// Invalid mode for operation
    InvalidMode,
    /// Pin already in use
    PinInUse,
    /// Underlying pin access failed
    HardwareError,
}

/// PWM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Duty value exceeds the configured range
    InvalidDutyCycle,
    /// Invalid frequency
    InvalidFrequency,
    /// Invalid duty-cycle range
    InvalidRange,
    /// Channel not available on this pin
    ChannelUnavailable,
}

/// Edge-subscription errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeError {
    /// Invalid pin number
    InvalidPin,
    /// No subscription slot left
    Exhausted,
    /// Token does not name an active subscription
    UnknownToken,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Pwm(e) => write!(f, "PWM error: {:?}", e),
            PlatformError::Edge(e) => write!(f, "edge subscription error: {:?}", e),
            PlatformError::ConnectionFailed => write!(f, "GPIO service connection failed"),
            PlatformError::InitializationFailed => write!(f, "platform initialization failed"),
            PlatformError::ResourceUnavailable => write!(f, "resource not available"),
        }
    }
}
