//! Mock platform implementations for testing
//!
//! Mocks share their state between clones, so a test can keep a handle to a
//! pin or to the subscription ledger after the resource has been moved into
//! the chassis.

pub mod edge;
pub mod gpio;
pub mod platform;
pub mod pwm;

pub use edge::MockEdges;
pub use gpio::MockGpio;
pub use platform::MockPlatform;
pub use pwm::MockPwm;
