//! Mock Platform implementation for testing

use std::vec::Vec;

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{Platform, PwmConfig},
    Result,
};

use super::{MockEdges, MockGpio, MockPwm};

/// Mock Platform implementation
///
/// Hands out mock peripherals and keeps a shared handle to every resource it
/// created, so tests can inject input levels and observe PWM writes after the
/// resources have been moved into the chassis.
///
/// # Example
///
/// ```ignore
/// use mecanum_chassis::platform::mock::MockPlatform;
/// use mecanum_chassis::platform::traits::{GpioInterface, Level, Platform};
///
/// let mut platform = MockPlatform::connect().unwrap();
/// let gpio = platform.create_gpio(4).unwrap();
/// platform.gpio(4).unwrap().set_input_level(Level::High);
/// assert_eq!(gpio.read(), Level::High);
/// ```
#[derive(Debug, Default)]
pub struct MockPlatform {
    gpios: Vec<(u8, MockGpio)>,
    pwms: Vec<(u8, MockPwm)>,
    edges: MockEdges,
    edges_taken: bool,
}

impl MockPlatform {
    /// Highest valid pin number
    pub const MAX_GPIO: u8 = 31;

    /// Create a new mock platform
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to a previously claimed GPIO pin
    pub fn gpio(&self, pin: u8) -> Option<MockGpio> {
        self.gpios
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, g)| g.clone())
    }

    /// Handle to a previously claimed PWM channel
    pub fn pwm(&self, pin: u8) -> Option<MockPwm> {
        self.pwms
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, w)| w.clone())
    }

    /// Handle to the edge-subscription ledger
    pub fn edges(&self) -> MockEdges {
        self.edges.clone()
    }

    fn claimed(&self, pin: u8) -> bool {
        self.gpios.iter().any(|(p, _)| *p == pin) || self.pwms.iter().any(|(p, _)| *p == pin)
    }
}

impl Platform for MockPlatform {
    type Gpio = MockGpio;
    type Pwm = MockPwm;
    type Edges = MockEdges;

    fn connect() -> Result<Self> {
        Ok(Self::new())
    }

    fn create_gpio(&mut self, pin: u8) -> Result<Self::Gpio> {
        if pin > Self::MAX_GPIO {
            return Err(PlatformError::Gpio(GpioError::InvalidPin));
        }
        if self.claimed(pin) {
            return Err(PlatformError::Gpio(GpioError::PinInUse));
        }
        let gpio = MockGpio::new_input();
        self.gpios.push((pin, gpio.clone()));
        Ok(gpio)
    }

    fn create_pwm(&mut self, pin: u8, config: PwmConfig) -> Result<Self::Pwm> {
        if pin > Self::MAX_GPIO {
            return Err(PlatformError::Gpio(GpioError::InvalidPin));
        }
        if self.claimed(pin) {
            return Err(PlatformError::Gpio(GpioError::PinInUse));
        }
        let pwm = MockPwm::new(config);
        self.pwms.push((pin, pwm.clone()));
        Ok(pwm)
    }

    fn take_edges(&mut self) -> Result<Self::Edges> {
        if self.edges_taken {
            return Err(PlatformError::ResourceUnavailable);
        }
        self.edges_taken = true;
        Ok(self.edges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::traits::{EdgeInterface, EdgeKind, GpioInterface, Level};

    #[test]
    fn test_mock_platform_gpio_claiming() {
        let mut platform = MockPlatform::new();
        let gpio = platform.create_gpio(4).unwrap();

        // Same pin cannot be claimed twice
        assert_eq!(
            platform.create_gpio(4).err(),
            Some(PlatformError::Gpio(GpioError::PinInUse))
        );

        // Invalid pin number is rejected
        assert_eq!(
            platform.create_gpio(100).err(),
            Some(PlatformError::Gpio(GpioError::InvalidPin))
        );

        // The retained handle shares state with the claimed pin
        platform.gpio(4).unwrap().set_input_level(Level::High);
        assert_eq!(gpio.read(), Level::High);
    }

    #[test]
    fn test_mock_platform_pwm_claiming() {
        let mut platform = MockPlatform::new();
        let _pwm = platform.create_pwm(12, PwmConfig::default()).unwrap();

        // PWM and GPIO share the pin namespace
        assert_eq!(
            platform.create_gpio(12).err(),
            Some(PlatformError::Gpio(GpioError::PinInUse))
        );
        assert!(platform.pwm(12).is_some());
        assert!(platform.pwm(13).is_none());
    }

    #[test]
    fn test_mock_platform_edges_taken_once() {
        let mut platform = MockPlatform::new();
        let mut edges = platform.take_edges().unwrap();
        assert_eq!(
            platform.take_edges().err(),
            Some(PlatformError::ResourceUnavailable)
        );

        // The platform's probe observes subscriptions made on the taken service
        edges.subscribe(5, EdgeKind::Rising).unwrap();
        assert_eq!(platform.edges().active_count(), 1);
    }
}
