//! Dual-pin H-bridge wheel drive
//!
//! This module implements motor control for H-bridge drivers that take two
//! PWM inputs (IN1, IN2) to set motor direction and speed.
//!
//! ## Truth table
//!
//! | IN1  | IN2  | Motor state                                 |
//! |------|------|---------------------------------------------|
//! | PWM  | 0    | Forward (speed = duty)                      |
//! | 0    | PWM  | Reverse (speed = duty)                      |
//! | 0    | 0    | Idle (high-Z, motor freewheels)             |
//! | 255  | 255  | Brake (both terminals driven, abrupt stop)  |

use core::fmt;

use crate::platform::{PlatformError, PwmInterface};

/// PWM frequency applied to both bridge inputs at init
pub const PWM_FREQUENCY_HZ: u32 = 1_000;

/// Full-scale duty value; drive commands are clamped to it
pub const DUTY_RANGE: u16 = 255;

/// GPIO line pair of one wheel's bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrivePins {
    /// Bridge input 1 (forward side)
    pub in1: u8,
    /// Bridge input 2 (reverse side)
    pub in2: u8,
}

/// Wheel drive lifecycle and output errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveError {
    /// `init` called on a wheel that is already set up
    AlreadyInitialized,
    /// Operation requires a prior successful `init`
    Uninitialized,
    /// An underlying PWM call failed
    InvalidOperation(PlatformError),
}

impl From<PlatformError> for DriveError {
    fn from(err: PlatformError) -> Self {
        DriveError::InvalidOperation(err)
    }
}

impl fmt::Display for DriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveError::AlreadyInitialized => write!(f, "wheel already initialized"),
            DriveError::Uninitialized => write!(f, "wheel not initialized"),
            DriveError::InvalidOperation(e) => write!(f, "wheel operation failed: {}", e),
        }
    }
}

/// One wheel's motor bridge
///
/// The record persists for the life of the chassis; all state it carries
/// beyond the pin resources is the initialization flag. Duty cycles are
/// written through, never stored.
pub struct WheelDrive<P: PwmInterface> {
    pins: DrivePins,
    in1: P,
    in2: P,
    initialized: bool,
    label: &'static str,
    verbose: bool,
}

impl<P: PwmInterface> WheelDrive<P> {
    /// Build the record around its claimed PWM channels
    ///
    /// Nothing is configured until [`WheelDrive::init`].
    pub fn new(pins: DrivePins, in1: P, in2: P, label: &'static str) -> Self {
        Self {
            pins,
            in1,
            in2,
            initialized: false,
            label,
            verbose: false,
        }
    }

    /// GPIO line pair
    pub fn pins(&self) -> DrivePins {
        self.pins
    }

    /// Diagnostic label ("FL", "FR", ...)
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Enable or disable runtime diagnostics for this record
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Whether `init` has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Configure both bridge inputs for drive: 1 kHz PWM, 0-255 duty range,
    /// outputs enabled, zero duty written.
    ///
    /// On failure already-applied configuration is not rolled back; the
    /// record stays unusable until a retry succeeds.
    ///
    /// # Errors
    ///
    /// - `DriveError::AlreadyInitialized` if already set up
    /// - `DriveError::InvalidOperation` if any PWM call fails
    pub fn init(&mut self) -> Result<(), DriveError> {
        if self.initialized {
            if self.verbose {
                crate::log_warn!(
                    "wheel {} gpio ({}, {}) already initialized",
                    self.label,
                    self.pins.in1,
                    self.pins.in2
                );
            }
            return Err(DriveError::AlreadyInitialized);
        }

        self.in1.set_frequency(PWM_FREQUENCY_HZ)?;
        self.in2.set_frequency(PWM_FREQUENCY_HZ)?;
        self.in1.set_range(DUTY_RANGE)?;
        self.in2.set_range(DUTY_RANGE)?;
        self.in1.enable();
        self.in2.enable();

        self.initialized = true;
        self.write_pair(0, 0)
    }

    fn check_init(&self) -> Result<(), DriveError> {
        if !self.initialized {
            if self.verbose {
                crate::log_warn!(
                    "wheel {} gpio ({}, {}) is not initialized",
                    self.label,
                    self.pins.in1,
                    self.pins.in2
                );
            }
            return Err(DriveError::Uninitialized);
        }
        Ok(())
    }

    fn write_pair(&mut self, in1_duty: u16, in2_duty: u16) -> Result<(), DriveError> {
        self.in1.set_duty(in1_duty)?;
        self.in2.set_duty(in2_duty)?;
        Ok(())
    }

    /// Drive forward at `duty`, clamped to [0, 255]
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Uninitialized` before `init`, or
    /// `DriveError::InvalidOperation` if the PWM write fails.
    pub fn forward(&mut self, duty: u16) -> Result<(), DriveError> {
        self.check_init()?;
        self.write_pair(duty.min(DUTY_RANGE), 0)
    }

    /// Drive in reverse at `duty`, clamped to [0, 255]
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Uninitialized` before `init`, or
    /// `DriveError::InvalidOperation` if the PWM write fails.
    pub fn reverse(&mut self, duty: u16) -> Result<(), DriveError> {
        self.check_init()?;
        self.write_pair(0, duty.min(DUTY_RANGE))
    }

    /// Release the motor: both inputs to zero, wheel freewheels.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Uninitialized` before `init`, or
    /// `DriveError::InvalidOperation` if the PWM write fails.
    pub fn idle(&mut self) -> Result<(), DriveError> {
        self.check_init()?;
        self.write_pair(0, 0)
    }

    /// Short-brake the motor: both terminals driven high for an abrupt
    /// electromechanical stop.
    ///
    /// Emergency use only; frequent braking stresses the driver hardware.
    ///
    /// # Errors
    ///
    /// Returns `DriveError::Uninitialized` before `init`, or
    /// `DriveError::InvalidOperation` if the PWM write fails.
    pub fn brake(&mut self) -> Result<(), DriveError> {
        self.check_init()?;
        self.write_pair(DUTY_RANGE, DUTY_RANGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPwm;
    use crate::platform::PwmConfig;

    const PINS: DrivePins = DrivePins { in1: 23, in2: 24 };

    struct Rig {
        drive: WheelDrive<MockPwm>,
        in1: MockPwm,
        in2: MockPwm,
    }

    fn rig() -> Rig {
        let in1 = MockPwm::new(PwmConfig::default());
        let in2 = MockPwm::new(PwmConfig::default());
        Rig {
            drive: WheelDrive::new(PINS, in1.clone(), in2.clone(), "FL"),
            in1,
            in2,
        }
    }

    #[test]
    fn test_init_configures_both_channels() {
        let mut r = rig();
        r.drive.init().unwrap();

        assert!(r.drive.is_initialized());
        for pwm in [&r.in1, &r.in2] {
            assert_eq!(pwm.frequency(), PWM_FREQUENCY_HZ);
            assert_eq!(pwm.range(), DUTY_RANGE);
            assert!(pwm.is_enabled());
            assert_eq!(pwm.duty(), 0);
        }
    }

    #[test]
    fn test_reinit_is_refused() {
        let mut r = rig();
        r.drive.init().unwrap();
        assert_eq!(r.drive.init(), Err(DriveError::AlreadyInitialized));
    }

    #[test]
    fn test_init_failure_has_no_rollback() {
        let mut r = rig();
        // Frequency setup succeeds, range setup fails.
        r.in2.fail_range(true);
        assert!(matches!(
            r.drive.init(),
            Err(DriveError::InvalidOperation(_))
        ));
        assert!(!r.drive.is_initialized());

        // The frequency applied before the failure stays applied.
        assert_eq!(r.in1.frequency(), PWM_FREQUENCY_HZ);
        assert_eq!(r.in2.frequency(), PWM_FREQUENCY_HZ);
        assert_eq!(r.in1.range(), DUTY_RANGE);

        // Retry from scratch succeeds once the fault is gone.
        r.in2.fail_range(false);
        r.drive.init().unwrap();
        assert!(r.drive.is_initialized());
    }

    #[test]
    fn test_forward_writes_duty_and_zero() {
        let mut r = rig();
        r.drive.init().unwrap();
        r.drive.forward(100).unwrap();
        assert_eq!(r.in1.duty(), 100);
        assert_eq!(r.in2.duty(), 0);
    }

    #[test]
    fn test_reverse_writes_zero_and_duty() {
        let mut r = rig();
        r.drive.init().unwrap();
        r.drive.reverse(80).unwrap();
        assert_eq!(r.in1.duty(), 0);
        assert_eq!(r.in2.duty(), 80);
    }

    #[test]
    fn test_duty_is_clamped_to_range() {
        let mut r = rig();
        r.drive.init().unwrap();

        r.drive.forward(300).unwrap();
        assert_eq!(r.in1.duty(), 255);

        r.drive.reverse(1_000).unwrap();
        assert_eq!(r.in2.duty(), 255);
    }

    #[test]
    fn test_idle_zeroes_both() {
        let mut r = rig();
        r.drive.init().unwrap();
        r.drive.forward(200).unwrap();

        r.drive.idle().unwrap();
        assert_eq!(r.in1.duty(), 0);
        assert_eq!(r.in2.duty(), 0);
    }

    #[test]
    fn test_brake_drives_both_high() {
        let mut r = rig();
        r.drive.init().unwrap();

        r.drive.brake().unwrap();
        assert_eq!(r.in1.duty(), 255);
        assert_eq!(r.in2.duty(), 255);
    }

    #[test]
    fn test_uninitialized_guard_blocks_all_commands() {
        let mut r = rig();

        assert_eq!(r.drive.forward(100), Err(DriveError::Uninitialized));
        assert_eq!(r.drive.reverse(100), Err(DriveError::Uninitialized));
        assert_eq!(r.drive.idle(), Err(DriveError::Uninitialized));
        assert_eq!(r.drive.brake(), Err(DriveError::Uninitialized));

        // No pin writes happened
        assert_eq!(r.in1.duty_writes(), 0);
        assert_eq!(r.in2.duty_writes(), 0);
    }

    #[test]
    fn test_write_failure_surfaces_invalid_operation() {
        let mut r = rig();
        r.drive.init().unwrap();
        r.in1.fail_duty(true);
        assert!(matches!(
            r.drive.forward(50),
            Err(DriveError::InvalidOperation(_))
        ));
    }
}
