//! Mock PWM implementation for testing

use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};
use std::sync::Arc;

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PwmConfig, PwmInterface},
    Result,
};

#[derive(Debug)]
struct PwmShared {
    frequency: AtomicU32,
    range: AtomicU16,
    duty: AtomicU16,
    enabled: AtomicBool,
    duty_writes: AtomicU32,
    fail_frequency: AtomicBool,
    fail_range: AtomicBool,
    fail_duty: AtomicBool,
}

/// Mock PWM implementation
///
/// Tracks PWM state (duty, frequency, range, enabled) for test verification.
/// Clones share state, so a test can keep a handle and observe writes after
/// the channel has been moved into a consumer.
#[derive(Debug, Clone)]
pub struct MockPwm {
    shared: Arc<PwmShared>,
}

impl MockPwm {
    /// Create a new mock PWM
    pub fn new(config: PwmConfig) -> Self {
        Self {
            shared: Arc::new(PwmShared {
                frequency: AtomicU32::new(config.frequency),
                range: AtomicU16::new(config.range),
                duty: AtomicU16::new(0),
                enabled: AtomicBool::new(false),
                duty_writes: AtomicU32::new(0),
                fail_frequency: AtomicBool::new(false),
                fail_range: AtomicBool::new(false),
                fail_duty: AtomicBool::new(false),
            }),
        }
    }

    /// Number of `set_duty` calls that reached the channel
    pub fn duty_writes(&self) -> u32 {
        self.shared.duty_writes.load(Ordering::SeqCst)
    }

    /// Force subsequent `set_frequency` calls to fail
    pub fn fail_frequency(&self, fail: bool) {
        self.shared.fail_frequency.store(fail, Ordering::SeqCst);
    }

    /// Force subsequent `set_range` calls to fail
    pub fn fail_range(&self, fail: bool) {
        self.shared.fail_range.store(fail, Ordering::SeqCst);
    }

    /// Force subsequent `set_duty` calls to fail
    pub fn fail_duty(&self, fail: bool) {
        self.shared.fail_duty.store(fail, Ordering::SeqCst);
    }
}

impl PwmInterface for MockPwm {
    fn set_frequency(&mut self, frequency: u32) -> Result<()> {
        if frequency == 0 || self.shared.fail_frequency.load(Ordering::SeqCst) {
            return Err(PlatformError::Pwm(PwmError::InvalidFrequency));
        }
        self.shared.frequency.store(frequency, Ordering::SeqCst);
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.shared.frequency.load(Ordering::SeqCst)
    }

    fn set_range(&mut self, range: u16) -> Result<()> {
        if range == 0 || self.shared.fail_range.load(Ordering::SeqCst) {
            return Err(PlatformError::Pwm(PwmError::InvalidRange));
        }
        self.shared.range.store(range, Ordering::SeqCst);
        Ok(())
    }

    fn range(&self) -> u16 {
        self.shared.range.load(Ordering::SeqCst)
    }

    fn set_duty(&mut self, duty: u16) -> Result<()> {
        if self.shared.fail_duty.load(Ordering::SeqCst) {
            return Err(PlatformError::Pwm(PwmError::ChannelUnavailable));
        }
        if duty > self.range() {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.shared.duty.store(duty, Ordering::SeqCst);
        self.shared.duty_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn duty(&self) -> u16 {
        self.shared.duty.load(Ordering::SeqCst)
    }

    fn enable(&mut self) {
        self.shared.enabled.store(true, Ordering::SeqCst);
    }

    fn disable(&mut self) {
        self.shared.enabled.store(false, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::SeqCst)
    }
}
