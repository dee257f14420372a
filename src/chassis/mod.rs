//! Per-wheel composition of encoders and drives
//!
//! A [`Chassis`] owns the four wheel encoders and the four wheel drives of a
//! mecanum base, claims their pin resources from the platform in one step,
//! and addresses them by [`WheelId`]. It also owns the edge-subscription
//! service and routes delivered [`EdgeEvent`]s to the encoder that listens on
//! the event's pin.

pub mod pins;

pub use pins::ChassisPins;

use crate::devices::encoder::{EncoderError, EncoderPins, Multiplication, WheelEncoder};
use crate::libraries::motor_driver::{DriveError, DrivePins, WheelDrive};
use crate::platform::{EdgeEvent, Platform, PlatformError, PwmConfig};

/// Number of managed wheels
pub const WHEEL_COUNT: usize = 4;

/// Wheel position on the chassis, also the index into its collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WheelId {
    /// Front left wheel (index 0)
    FrontLeft = 0,
    /// Front right wheel (index 1)
    FrontRight = 1,
    /// Rear left wheel (index 2)
    RearLeft = 2,
    /// Rear right wheel (index 3)
    RearRight = 3,
}

impl WheelId {
    /// All wheels in index order
    pub const ALL: [WheelId; WHEEL_COUNT] = [
        WheelId::FrontLeft,
        WheelId::FrontRight,
        WheelId::RearLeft,
        WheelId::RearRight,
    ];

    /// Collection index of this wheel
    pub fn index(self) -> usize {
        self as usize
    }

    /// Diagnostic label of the wheel drive
    pub fn wheel_label(self) -> &'static str {
        match self {
            WheelId::FrontLeft => "FL",
            WheelId::FrontRight => "FR",
            WheelId::RearLeft => "RL",
            WheelId::RearRight => "RR",
        }
    }

    /// Diagnostic label of the wheel's encoder
    pub fn encoder_label(self) -> &'static str {
        match self {
            WheelId::FrontLeft => "EFL",
            WheelId::FrontRight => "EFR",
            WheelId::RearLeft => "ERL",
            WheelId::RearRight => "ERR",
        }
    }
}

/// The four-wheel chassis hardware context
///
/// All wheel records live in one owned collection: every operation goes
/// through a `Chassis` reference, and the records persist exactly as long
/// as it does.
pub struct Chassis<P: Platform> {
    encoders: [WheelEncoder<P::Gpio>; WHEEL_COUNT],
    drives: [WheelDrive<P::Pwm>; WHEEL_COUNT],
    edges: P::Edges,
}

impl<P: Platform> Chassis<P> {
    /// Claim every encoder pin, bridge pin and the edge service from the
    /// platform.
    ///
    /// Nothing is initialized yet; each encoder and drive waits for its own
    /// `init` call.
    ///
    /// # Errors
    ///
    /// Returns the platform error of the first resource that cannot be
    /// claimed (invalid or doubly-assigned pin, edge service taken).
    pub fn new(platform: &mut P, pins: &ChassisPins) -> Result<Self, PlatformError> {
        let edges = platform.take_edges()?;
        let [efl, efr, erl, err] = pins.encoders;
        let encoders = [
            Self::claim_encoder(platform, efl, WheelId::FrontLeft)?,
            Self::claim_encoder(platform, efr, WheelId::FrontRight)?,
            Self::claim_encoder(platform, erl, WheelId::RearLeft)?,
            Self::claim_encoder(platform, err, WheelId::RearRight)?,
        ];
        let [dfl, dfr, drl, drr] = pins.drives;
        let drives = [
            Self::claim_drive(platform, dfl, WheelId::FrontLeft)?,
            Self::claim_drive(platform, dfr, WheelId::FrontRight)?,
            Self::claim_drive(platform, drl, WheelId::RearLeft)?,
            Self::claim_drive(platform, drr, WheelId::RearRight)?,
        ];
        Ok(Self {
            encoders,
            drives,
            edges,
        })
    }

    fn claim_encoder(
        platform: &mut P,
        pins: EncoderPins,
        id: WheelId,
    ) -> Result<WheelEncoder<P::Gpio>, PlatformError> {
        let cha = platform.create_gpio(pins.cha)?;
        let chb = platform.create_gpio(pins.chb)?;
        Ok(WheelEncoder::new(pins, cha, chb, id.encoder_label()))
    }

    fn claim_drive(
        platform: &mut P,
        pins: DrivePins,
        id: WheelId,
    ) -> Result<WheelDrive<P::Pwm>, PlatformError> {
        let in1 = platform.create_pwm(pins.in1, PwmConfig::default())?;
        let in2 = platform.create_pwm(pins.in2, PwmConfig::default())?;
        Ok(WheelDrive::new(pins, in1, in2, id.wheel_label()))
    }

    /// Enable or disable runtime diagnostics on every record
    pub fn set_verbose(&mut self, verbose: bool) {
        for encoder in self.encoders.iter_mut() {
            encoder.set_verbose(verbose);
        }
        for drive in self.drives.iter_mut() {
            drive.set_verbose(verbose);
        }
    }

    /// Shared access to one wheel's encoder
    pub fn encoder(&self, id: WheelId) -> &WheelEncoder<P::Gpio> {
        &self.encoders[id.index()]
    }

    /// Shared access to one wheel's drive
    pub fn drive(&self, id: WheelId) -> &WheelDrive<P::Pwm> {
        &self.drives[id.index()]
    }

    /// Start decoding one wheel's encoder in `mode`
    ///
    /// # Errors
    ///
    /// See [`WheelEncoder::init`].
    pub fn init_encoder(&mut self, id: WheelId, mode: Multiplication) -> Result<(), EncoderError> {
        self.encoders[id.index()].init(&mut self.edges, mode)
    }

    /// Stop decoding one wheel's encoder
    ///
    /// # Errors
    ///
    /// See [`WheelEncoder::deinit`].
    pub fn deinit_encoder(&mut self, id: WheelId, clear: bool) -> Result<(), EncoderError> {
        self.encoders[id.index()].deinit(&mut self.edges, clear)
    }

    /// One wheel's position count
    pub fn position(&self, id: WheelId) -> i32 {
        self.encoders[id.index()].position()
    }

    /// Overwrite one wheel's position count
    pub fn set_position(&self, id: WheelId, value: i32) {
        self.encoders[id.index()].set_position(value);
    }

    /// Set up one wheel's drive
    ///
    /// # Errors
    ///
    /// See [`WheelDrive::init`].
    pub fn init_drive(&mut self, id: WheelId) -> Result<(), DriveError> {
        self.drives[id.index()].init()
    }

    /// Drive one wheel forward at `duty` (clamped to [0, 255])
    ///
    /// # Errors
    ///
    /// See [`WheelDrive::forward`].
    pub fn forward(&mut self, id: WheelId, duty: u16) -> Result<(), DriveError> {
        self.drives[id.index()].forward(duty)
    }

    /// Drive one wheel in reverse at `duty` (clamped to [0, 255])
    ///
    /// # Errors
    ///
    /// See [`WheelDrive::reverse`].
    pub fn reverse(&mut self, id: WheelId, duty: u16) -> Result<(), DriveError> {
        self.drives[id.index()].reverse(duty)
    }

    /// Let one wheel freewheel
    ///
    /// # Errors
    ///
    /// See [`WheelDrive::idle`].
    pub fn idle(&mut self, id: WheelId) -> Result<(), DriveError> {
        self.drives[id.index()].idle()
    }

    /// Short-brake one wheel (emergency use)
    ///
    /// # Errors
    ///
    /// See [`WheelDrive::brake`].
    pub fn brake(&mut self, id: WheelId) -> Result<(), DriveError> {
        self.drives[id.index()].brake()
    }

    /// Let every wheel freewheel
    ///
    /// # Errors
    ///
    /// Returns the first failing wheel's error; later wheels are still
    /// commanded.
    pub fn idle_all(&mut self) -> Result<(), DriveError> {
        let mut result = Ok(());
        for drive in self.drives.iter_mut() {
            if let Err(e) = drive.idle() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Short-brake every wheel (emergency stop)
    ///
    /// # Errors
    ///
    /// Returns the first failing wheel's error; later wheels are still
    /// commanded.
    pub fn brake_all(&mut self) -> Result<(), DriveError> {
        let mut result = Ok(());
        for drive in self.drives.iter_mut() {
            if let Err(e) = drive.brake() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    /// Route one delivered edge event to the encoder listening on its pin.
    ///
    /// Called from the platform's notification context. Events on pins no
    /// encoder listens to are discarded.
    pub fn dispatch_edge(&self, event: &EdgeEvent) {
        for encoder in self.encoders.iter() {
            if encoder.listens_to(event.pin) {
                encoder.handle_edge(event);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockPlatform;
    use crate::platform::{EdgeKind, GpioError, Level, PwmInterface};

    fn pins() -> ChassisPins {
        ChassisPins {
            encoders: [
                EncoderPins { cha: 4, chb: 5 },
                EncoderPins { cha: 6, chb: 7 },
                EncoderPins { cha: 8, chb: 9 },
                EncoderPins { cha: 10, chb: 11 },
            ],
            drives: [
                DrivePins { in1: 12, in2: 13 },
                DrivePins { in1: 14, in2: 15 },
                DrivePins { in1: 16, in2: 17 },
                DrivePins { in1: 18, in2: 19 },
            ],
        }
    }

    fn setup() -> (MockPlatform, Chassis<MockPlatform>) {
        let mut platform = MockPlatform::connect().unwrap();
        let chassis = Chassis::new(&mut platform, &pins()).unwrap();
        (platform, chassis)
    }

    fn edge(pin: u8, level: Level, timestamp_us: u32) -> EdgeEvent {
        EdgeEvent {
            pin,
            level,
            timestamp_us,
        }
    }

    #[test]
    fn test_wheel_id_indexing() {
        assert_eq!(WheelId::ALL.len(), WHEEL_COUNT);
        for (index, id) in WheelId::ALL.iter().enumerate() {
            assert_eq!(id.index(), index);
        }
        assert_eq!(WheelId::FrontLeft.wheel_label(), "FL");
        assert_eq!(WheelId::RearRight.encoder_label(), "ERR");
    }

    #[test]
    fn test_new_claims_every_pin() {
        let (platform, chassis) = setup();
        for pin in 4..=11 {
            assert!(platform.gpio(pin).is_some(), "encoder pin {} missing", pin);
        }
        for pin in 12..=19 {
            assert!(platform.pwm(pin).is_some(), "drive pin {} missing", pin);
        }
        assert_eq!(chassis.encoder(WheelId::RearLeft).pins().cha, 8);
        assert_eq!(chassis.drive(WheelId::FrontRight).pins().in2, 15);
    }

    #[test]
    fn test_new_rejects_overlapping_pins() {
        let mut platform = MockPlatform::connect().unwrap();
        let mut overlapping = pins();
        overlapping.drives[0].in1 = overlapping.encoders[0].cha;
        assert_eq!(
            Chassis::new(&mut platform, &overlapping).err(),
            Some(PlatformError::Gpio(GpioError::PinInUse))
        );
    }

    #[test]
    fn test_encoder_lifecycle_through_chassis() {
        let (platform, mut chassis) = setup();
        chassis
            .init_encoder(WheelId::FrontLeft, Multiplication::X1)
            .unwrap();
        assert_eq!(platform.edges().active(), vec![(4, EdgeKind::Rising)]);

        chassis.deinit_encoder(WheelId::FrontLeft, true).unwrap();
        assert_eq!(platform.edges().active_count(), 0);
    }

    #[test]
    fn test_dispatch_routes_by_pin() {
        let (_platform, mut chassis) = setup();
        chassis
            .init_encoder(WheelId::FrontLeft, Multiplication::X1)
            .unwrap();
        chassis
            .init_encoder(WheelId::RearRight, Multiplication::X1)
            .unwrap();

        // Front-left channel A is pin 4, rear-right channel A is pin 10
        chassis.dispatch_edge(&edge(4, Level::High, 100));
        chassis.dispatch_edge(&edge(10, Level::High, 100));
        chassis.dispatch_edge(&edge(10, Level::High, 200));

        assert_eq!(chassis.position(WheelId::FrontLeft), 1);
        assert_eq!(chassis.position(WheelId::RearRight), 2);
        assert_eq!(chassis.position(WheelId::FrontRight), 0);

        // Unknown pins are discarded
        chassis.dispatch_edge(&edge(30, Level::High, 300));
        assert_eq!(chassis.position(WheelId::FrontLeft), 1);
    }

    #[test]
    fn test_x4_forward_cycle_through_dispatch() {
        let (platform, mut chassis) = setup();
        chassis
            .init_encoder(WheelId::FrontLeft, Multiplication::X4)
            .unwrap();

        let cha = platform.gpio(4).unwrap();
        let chb = platform.gpio(5).unwrap();

        // A up, B up, A down, B down: one full forward quadrature cycle,
        // edges spaced beyond the debounce window.
        cha.set_input_level(Level::High);
        chassis.dispatch_edge(&edge(4, Level::High, 100));
        chb.set_input_level(Level::High);
        chassis.dispatch_edge(&edge(5, Level::High, 200));
        cha.set_input_level(Level::Low);
        chassis.dispatch_edge(&edge(4, Level::Low, 300));
        chb.set_input_level(Level::Low);
        chassis.dispatch_edge(&edge(5, Level::Low, 400));

        assert_eq!(chassis.position(WheelId::FrontLeft), 4);
    }

    #[test]
    fn test_debounced_chatter_through_dispatch() {
        let (_platform, mut chassis) = setup();
        chassis
            .init_encoder(WheelId::FrontLeft, Multiplication::X1)
            .unwrap();

        chassis.dispatch_edge(&edge(4, Level::High, 100));
        chassis.dispatch_edge(&edge(4, Level::High, 120));
        assert_eq!(chassis.position(WheelId::FrontLeft), 1);
    }

    #[test]
    fn test_drive_through_chassis() {
        let (platform, mut chassis) = setup();
        chassis.init_drive(WheelId::FrontLeft).unwrap();

        chassis.forward(WheelId::FrontLeft, 300).unwrap();
        assert_eq!(platform.pwm(12).unwrap().duty(), 255);
        assert_eq!(platform.pwm(13).unwrap().duty(), 0);

        chassis.reverse(WheelId::FrontLeft, 90).unwrap();
        assert_eq!(platform.pwm(12).unwrap().duty(), 0);
        assert_eq!(platform.pwm(13).unwrap().duty(), 90);

        chassis.idle(WheelId::FrontLeft).unwrap();
        assert_eq!(platform.pwm(13).unwrap().duty(), 0);

        chassis.brake(WheelId::FrontLeft).unwrap();
        assert_eq!(platform.pwm(12).unwrap().duty(), 255);
        assert_eq!(platform.pwm(13).unwrap().duty(), 255);
    }

    #[test]
    fn test_idle_all_and_brake_all() {
        let (platform, mut chassis) = setup();
        for id in WheelId::ALL {
            chassis.init_drive(id).unwrap();
            chassis.forward(id, 100).unwrap();
        }

        chassis.idle_all().unwrap();
        for pin in 12..=19 {
            assert_eq!(platform.pwm(pin).unwrap().duty(), 0);
        }

        chassis.brake_all().unwrap();
        for pin in 12..=19 {
            assert_eq!(platform.pwm(pin).unwrap().duty(), 255);
        }
    }

    #[test]
    fn test_all_commands_report_uninitialized_wheels() {
        let (_platform, mut chassis) = setup();
        // Only the rear wheels are set up
        chassis.init_drive(WheelId::RearLeft).unwrap();
        chassis.init_drive(WheelId::RearRight).unwrap();

        assert_eq!(
            chassis.forward(WheelId::FrontLeft, 50),
            Err(DriveError::Uninitialized)
        );
        // The group command reports the first failure but still reaches the
        // initialized wheels.
        assert_eq!(chassis.idle_all(), Err(DriveError::Uninitialized));
    }
}
