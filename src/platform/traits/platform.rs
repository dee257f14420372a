//! Root platform trait
//!
//! This module defines the root Platform trait that aggregates the peripheral
//! interfaces the chassis consumes.

use super::{EdgeInterface, GpioInterface, PwmConfig, PwmInterface};
use crate::platform::Result;

/// Root platform trait
///
/// A platform is a session with the GPIO service (a daemon connection, or the
/// MCU peripherals themselves) that hands out pin resources. Implementations
/// provide concrete types for each peripheral interface via associated types,
/// enabling compile-time dispatch.
///
/// Resources are claimed once and owned by the caller; the platform refuses
/// to hand out the same pin twice.
pub trait Platform: Sized {
    /// GPIO pin type
    type Gpio: GpioInterface;

    /// PWM channel type
    type Pwm: PwmInterface;

    /// Edge-subscription service type
    type Edges: EdgeInterface;

    /// Establish the session with the GPIO service
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ConnectionFailed` if the service cannot be
    /// reached.
    fn connect() -> Result<Self>;

    /// Claim a GPIO pin
    ///
    /// The pin is handed out in input mode; the caller configures it further
    /// via [`GpioInterface::set_mode`].
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Gpio` if the pin number is invalid or the pin
    /// is already claimed.
    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio>;

    /// Claim a PWM channel on a pin
    ///
    /// Claiming a PWM channel configures the pin as an output.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm` or `PlatformError::Gpio` if the pin does
    /// not support PWM, is already claimed, or the pin number is invalid.
    fn create_pwm(&mut self, pin: u8, config: PwmConfig) -> Result<Self::Pwm>;

    /// Take ownership of the edge-subscription service
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the service was
    /// already taken.
    fn take_edges(&mut self) -> Result<Self::Edges>;
}
