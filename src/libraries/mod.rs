//! Reusable driver libraries
//!
//! ## Modules
//!
//! - `motor_driver`: Dual-pin H-bridge wheel drive over PWM

pub mod motor_driver;
