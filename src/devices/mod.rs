//! Device drivers
//!
//! This module contains device drivers that use platform abstraction traits.
//!
//! ## Modules
//!
//! - `encoder`: Quadrature rotary encoder decoding (X1/X2/X4)

pub mod encoder;
