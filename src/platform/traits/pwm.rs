//! PWM interface trait
//!
//! This module defines the PWM output interface that platform implementations
//! must provide. Duty values are integers against a configurable range, the
//! way GPIO daemons expose PWM (`set_PWM_range` / `set_PWM_dutycycle`), so a
//! duty of `range` means 100%.

use crate::platform::Result;

/// PWM configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmConfig {
    /// PWM frequency in Hz
    pub frequency: u32,
    /// Full-scale duty value (duty `range` = 100%)
    pub range: u16,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000, // 1 kHz for DC motor bridges
            range: 255,
        }
    }
}

/// PWM interface trait
///
/// Platform implementations must provide this interface for PWM output
/// control. Claiming a PWM channel configures the underlying pin as an
/// output.
///
/// # Safety Invariants
///
/// - Only one owner per PWM channel
/// - No concurrent access to the same PWM channel from multiple contexts
/// - Duty must be in range [0, range]
pub trait PwmInterface {
    /// Set PWM frequency
    ///
    /// # Arguments
    ///
    /// * `frequency` - Frequency in Hz
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidFrequency)` if the
    /// frequency cannot be achieved.
    fn set_frequency(&mut self, frequency: u32) -> Result<()>;

    /// Get current frequency in Hz
    fn frequency(&self) -> u32;

    /// Set the full-scale duty value
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidRange)` if the range is
    /// zero or not supported.
    fn set_range(&mut self, range: u16) -> Result<()>;

    /// Get the full-scale duty value
    fn range(&self) -> u16;

    /// Set PWM duty
    ///
    /// # Arguments
    ///
    /// * `duty` - Duty value in [0, range]
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` if `duty`
    /// exceeds the configured range.
    fn set_duty(&mut self, duty: u16) -> Result<()>;

    /// Get current duty value
    fn duty(&self) -> u16;

    /// Enable PWM output
    fn enable(&mut self);

    /// Disable PWM output
    fn disable(&mut self);

    /// Check if PWM is enabled
    fn is_enabled(&self) -> bool;
}
