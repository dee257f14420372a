#![cfg_attr(not(test), no_std)]

//! mecanum-chassis - Wheel-level hardware layer for a four-wheel mecanum robot
//!
//! This library provides quadrature encoder decoding (X1/X2/X4 with debounce
//! filtering) and dual-pin PWM motor drive for the four wheels of a mecanum
//! chassis, behind a platform abstraction so the same logic runs against real
//! GPIO hardware or the mock platform used in host tests.

// The mock platform is std-based; link std for non-test builds that ask for it
#[cfg(all(not(test), feature = "mock"))]
extern crate std;

// Platform abstraction layer (pin I/O, PWM, edge subscription)
pub mod platform;

// Encoder device driver using platform abstraction
pub mod devices;

// Core infrastructure (logging, synchronized state)
pub mod core;

// Wheel drive library (dual-pin H-bridge PWM control)
pub mod libraries;

// Per-wheel composition: encoders + drives indexed by wheel position
pub mod chassis;
