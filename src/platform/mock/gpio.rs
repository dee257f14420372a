//! Mock GPIO implementation for testing

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode, Level},
    Result,
};

fn encode_mode(mode: GpioMode) -> u8 {
    match mode {
        GpioMode::Input => 0,
        GpioMode::InputPullUp => 1,
        GpioMode::InputPullDown => 2,
        GpioMode::OutputPushPull => 3,
    }
}

fn decode_mode(raw: u8) -> GpioMode {
    match raw {
        1 => GpioMode::InputPullUp,
        2 => GpioMode::InputPullDown,
        3 => GpioMode::OutputPushPull,
        _ => GpioMode::Input,
    }
}

#[derive(Debug, Default)]
struct GpioShared {
    level_high: AtomicBool,
    mode: AtomicU8,
    fail_set_mode: AtomicBool,
}

/// Mock GPIO implementation
///
/// Tracks pin level and mode for test verification. Clones share state, so a
/// test can keep a handle and inject input levels after the pin itself has
/// been moved into a consumer.
#[derive(Debug, Clone)]
pub struct MockGpio {
    shared: Arc<GpioShared>,
}

impl MockGpio {
    /// Create a new mock GPIO in input mode, reading low
    pub fn new_input() -> Self {
        Self {
            shared: Arc::new(GpioShared::default()),
        }
    }

    /// Set the input level (for simulating an external signal)
    pub fn set_input_level(&self, level: Level) {
        self.shared.level_high.store(level.is_high(), Ordering::SeqCst);
    }

    /// Force subsequent `set_mode` calls to fail
    pub fn fail_set_mode(&self, fail: bool) {
        self.shared.fail_set_mode.store(fail, Ordering::SeqCst);
    }
}

impl GpioInterface for MockGpio {
    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if self.shared.fail_set_mode.load(Ordering::SeqCst) {
            return Err(PlatformError::Gpio(GpioError::HardwareError));
        }
        self.shared.mode.store(encode_mode(mode), Ordering::SeqCst);
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        decode_mode(self.shared.mode.load(Ordering::SeqCst))
    }

    fn read(&self) -> Level {
        Level::from(self.shared.level_high.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_gpio_input_level() {
        let gpio = MockGpio::new_input();
        assert_eq!(gpio.read(), Level::Low);

        // Simulate external signal
        gpio.set_input_level(Level::High);
        assert_eq!(gpio.read(), Level::High);

        gpio.set_input_level(Level::Low);
        assert_eq!(gpio.read(), Level::Low);
    }

    #[test]
    fn test_mock_gpio_shared_between_clones() {
        let gpio = MockGpio::new_input();
        let mut owned = gpio.clone();

        gpio.set_input_level(Level::High);
        assert_eq!(owned.read(), Level::High);

        owned.set_mode(GpioMode::InputPullUp).unwrap();
        assert_eq!(gpio.mode(), GpioMode::InputPullUp);
    }

    #[test]
    fn test_mock_gpio_mode() {
        let mut gpio = MockGpio::new_input();
        assert_eq!(gpio.mode(), GpioMode::Input);

        gpio.set_mode(GpioMode::InputPullUp).unwrap();
        assert_eq!(gpio.mode(), GpioMode::InputPullUp);
    }

    #[test]
    fn test_mock_gpio_forced_failure() {
        let mut gpio = MockGpio::new_input();
        gpio.fail_set_mode(true);
        assert_eq!(
            gpio.set_mode(GpioMode::InputPullUp),
            Err(PlatformError::Gpio(GpioError::HardwareError))
        );

        gpio.fail_set_mode(false);
        assert!(gpio.set_mode(GpioMode::InputPullUp).is_ok());
    }
}
