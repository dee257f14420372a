//! Edge-notification interface trait
//!
//! This module defines the edge-subscription interface that platform
//! implementations must provide. A subscription registers interest in level
//! transitions on one pin; the platform's notification context then delivers
//! [`EdgeEvent`]s, which the application routes to the consumer (see
//! `Chassis::dispatch_edge`). Delivery is push-based and fire-and-forget:
//! handlers have no return path to the platform.

use crate::platform::{Level, Result};

/// Which level transitions a subscription reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeKind {
    /// Low-to-high transitions only
    Rising,
    /// High-to-low transitions only
    Falling,
    /// Both transitions
    Either,
}

/// One delivered edge notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeEvent {
    /// Pin the transition occurred on
    pub pin: u8,
    /// Level after the transition
    pub level: Level,
    /// Monotonic microsecond tick of the transition. Wraps at `u32::MAX`;
    /// consumers must compare with wrapping arithmetic.
    pub timestamp_us: u32,
}

/// Opaque handle naming an active subscription
///
/// Returned by [`EdgeInterface::subscribe`]; the owner must hand it back via
/// [`EdgeInterface::unsubscribe`] to stop delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeToken(u32);

impl EdgeToken {
    /// Build a token from a platform-assigned identifier
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Platform-assigned identifier
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Edge-subscription interface trait
///
/// # Safety Invariants
///
/// - After `unsubscribe` returns, no further events for that token are
///   delivered
/// - Event timestamps come from a single monotonic wrapping tick source
pub trait EdgeInterface {
    /// Register interest in transitions on `pin`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Edge` if the pin is invalid or no
    /// subscription slot is available.
    fn subscribe(&mut self, pin: u8, kind: EdgeKind) -> Result<EdgeToken>;

    /// Cancel an active subscription
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Edge(EdgeError::UnknownToken)` if the token
    /// does not name an active subscription.
    fn unsubscribe(&mut self, token: EdgeToken) -> Result<()>;
}
