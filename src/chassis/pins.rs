//! Static pin assignment
//!
//! The chassis takes its GPIO map as one value, fixed at construction. Pin
//! numbers come from the wiring of the target robot; nothing here is read
//! from hardware.

use super::WHEEL_COUNT;
use crate::devices::encoder::EncoderPins;
use crate::libraries::motor_driver::DrivePins;

/// Complete GPIO map of the chassis
///
/// Wheel order is front-left, front-right, rear-left, rear-right, matching
/// [`WheelId`](super::WheelId). Every pin must be distinct; the platform
/// refuses double claims.
///
/// # Example
///
/// ```
/// use mecanum_chassis::chassis::pins::ChassisPins;
/// use mecanum_chassis::devices::encoder::EncoderPins;
/// use mecanum_chassis::libraries::motor_driver::DrivePins;
///
/// const PINS: ChassisPins = ChassisPins {
///     encoders: [
///         EncoderPins { cha: 4, chb: 5 },
///         EncoderPins { cha: 6, chb: 7 },
///         EncoderPins { cha: 8, chb: 9 },
///         EncoderPins { cha: 10, chb: 11 },
///     ],
///     drives: [
///         DrivePins { in1: 12, in2: 13 },
///         DrivePins { in1: 14, in2: 15 },
///         DrivePins { in1: 16, in2: 17 },
///         DrivePins { in1: 18, in2: 19 },
///     ],
/// };
/// assert_eq!(PINS.encoders[0].cha, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChassisPins {
    /// Encoder channel pairs, one per wheel
    pub encoders: [EncoderPins; WHEEL_COUNT],
    /// Bridge input pairs, one per wheel
    pub drives: [DrivePins; WHEEL_COUNT],
}
