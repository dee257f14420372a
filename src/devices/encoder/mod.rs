//! Quadrature encoder device driver
//!
//! A [`WheelEncoder`] owns the two channel input pins of one wheel's rotary
//! encoder and decodes their edge events into a signed position count. The
//! decoding itself lives in [`decoder`]; this module manages the resource
//! lifecycle: pin configuration, edge subscription per multiplication mode,
//! and teardown.
//!
//! Edge events are delivered by the platform's notification context through
//! [`WheelEncoder::handle_edge`], concurrently with the owning context's
//! calls. All decoder state is behind a per-encoder [`CriticalState`] lock,
//! so the two channel subscriptions of X4 mode cannot interleave, and a
//! handler that fires after `deinit` finds `initialized == false` and leaves
//! the record untouched.

pub mod decoder;

pub use decoder::{DecoderCore, EncoderChannel, Multiplication, MIN_PULSE_US};

use core::fmt;

use heapless::Vec;

use crate::core::sync::CriticalState;
use crate::platform::{
    EdgeEvent, EdgeInterface, EdgeKind, EdgeToken, GpioInterface, GpioMode, PlatformError,
};

/// GPIO line pair of one encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderPins {
    /// Channel A line
    pub cha: u8,
    /// Channel B line
    pub chb: u8,
}

/// Encoder lifecycle and decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderError {
    /// `init` called on an encoder that is already running
    AlreadyInitialized,
    /// Operation requires a prior successful `init`
    Uninitialized,
    /// Multiplication mode is not one of X1/X2/X4
    UnknownMode,
    /// An underlying pin or subscription call failed
    InvalidOperation(PlatformError),
}

impl From<PlatformError> for EncoderError {
    fn from(err: PlatformError) -> Self {
        EncoderError::InvalidOperation(err)
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderError::AlreadyInitialized => write!(f, "encoder already initialized"),
            EncoderError::Uninitialized => write!(f, "encoder not initialized"),
            EncoderError::UnknownMode => write!(f, "unknown multiplication mode"),
            EncoderError::InvalidOperation(e) => write!(f, "encoder operation failed: {}", e),
        }
    }
}

/// One wheel's quadrature encoder
///
/// The record persists for the life of the chassis; `deinit` releases the
/// subscriptions and returns it to the uninitialized state for reuse.
pub struct WheelEncoder<G: GpioInterface> {
    pins: EncoderPins,
    cha: G,
    chb: G,
    tokens: Vec<EdgeToken, 2>,
    state: CriticalState<DecoderCore>,
    label: &'static str,
    verbose: bool,
}

impl<G: GpioInterface> WheelEncoder<G> {
    /// Build the record around its claimed channel pins
    ///
    /// Nothing is configured or subscribed until [`WheelEncoder::init`].
    pub fn new(pins: EncoderPins, cha: G, chb: G, label: &'static str) -> Self {
        Self {
            pins,
            cha,
            chb,
            tokens: Vec::new(),
            state: CriticalState::new(DecoderCore::new()),
            label,
            verbose: false,
        }
    }

    /// GPIO line pair
    pub fn pins(&self) -> EncoderPins {
        self.pins
    }

    /// Diagnostic label ("EFL", "EFR", ...)
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Enable or disable runtime diagnostics for this record
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Whether `init` has completed and events are being decoded
    pub fn is_initialized(&self) -> bool {
        self.state.with(|s| s.initialized())
    }

    /// Current multiplication mode (`Unset` while uninitialized)
    pub fn mode(&self) -> Multiplication {
        self.state.with(|s| s.mode())
    }

    /// Whether this encoder's subscriptions cover `pin`
    pub fn listens_to(&self, pin: u8) -> bool {
        pin == self.pins.cha || pin == self.pins.chb
    }

    /// Configure the channel pins, subscribe to their edges and start
    /// decoding in `mode`.
    ///
    /// Both channels are configured as pull-up inputs and sampled once to
    /// seed the channel state. Which edges get subscribed depends on the
    /// mode: X1 takes rising edges of A, X2 both edges of A, X4 both edges
    /// of both channels.
    ///
    /// On failure the record stays uninitialized but already-applied pin
    /// configuration is not rolled back; retrying `init` from scratch is the
    /// supported recovery.
    ///
    /// # Errors
    ///
    /// - `EncoderError::AlreadyInitialized` if already running
    /// - `EncoderError::UnknownMode` for `Multiplication::Unset`
    /// - `EncoderError::InvalidOperation` if pin configuration or edge
    ///   subscription fails
    pub fn init<E: EdgeInterface>(
        &mut self,
        edges: &mut E,
        mode: Multiplication,
    ) -> Result<(), EncoderError> {
        if self.is_initialized() {
            if self.verbose {
                crate::log_warn!(
                    "encoder {} gpio ({}, {}) already initialized",
                    self.label,
                    self.pins.cha,
                    self.pins.chb
                );
            }
            return Err(EncoderError::AlreadyInitialized);
        }

        self.cha.set_mode(GpioMode::InputPullUp)?;
        self.chb.set_mode(GpioMode::InputPullUp)?;

        let level_a = self.cha.read();
        let level_b = self.chb.read();

        // A failed attempt may have left stale tokens; this registration
        // replaces them.
        self.tokens.clear();
        match mode {
            Multiplication::X1 => {
                let token = edges.subscribe(self.pins.cha, EdgeKind::Rising)?;
                let _ = self.tokens.push(token);
            }
            Multiplication::X2 => {
                let token = edges.subscribe(self.pins.cha, EdgeKind::Either)?;
                let _ = self.tokens.push(token);
            }
            Multiplication::X4 => {
                let token_a = edges.subscribe(self.pins.cha, EdgeKind::Either)?;
                let _ = self.tokens.push(token_a);
                let token_b = edges.subscribe(self.pins.chb, EdgeKind::Either)?;
                let _ = self.tokens.push(token_b);
            }
            Multiplication::Unset => return Err(EncoderError::UnknownMode),
        }

        // Publish last, under the handlers' lock: an event that sneaks in
        // between subscription and here is dropped by the initialized check.
        self.state.with_mut(|s| s.begin(mode, level_a, level_b));

        if self.verbose {
            crate::log_info!(
                "encoder {} gpio ({}, {}) initialized",
                self.label,
                self.pins.cha,
                self.pins.chb
            );
        }
        Ok(())
    }

    /// Cancel the edge subscriptions and stop decoding.
    ///
    /// Unsubscription is best-effort; a failing cancellation is logged when
    /// verbose and otherwise swallowed. With `clear`, position and edge
    /// history are reset to zero; otherwise they survive for a later `init`.
    ///
    /// # Errors
    ///
    /// Returns `EncoderError::Uninitialized` if the encoder is not running.
    pub fn deinit<E: EdgeInterface>(
        &mut self,
        edges: &mut E,
        clear: bool,
    ) -> Result<(), EncoderError> {
        if !self.is_initialized() {
            if self.verbose {
                crate::log_warn!(
                    "encoder {} gpio ({}, {}) is not initialized",
                    self.label,
                    self.pins.cha,
                    self.pins.chb
                );
            }
            return Err(EncoderError::Uninitialized);
        }

        while let Some(token) = self.tokens.pop() {
            if edges.unsubscribe(token).is_err() && self.verbose {
                crate::log_warn!(
                    "encoder {} failed to cancel subscription {}",
                    self.label,
                    token.raw()
                );
            }
        }

        self.state.with_mut(|s| s.end(clear));
        Ok(())
    }

    /// Current position count
    pub fn position(&self) -> i32 {
        self.state.with(|s| s.position())
    }

    /// Overwrite the position count
    ///
    /// No initialization check: pre-seeding before `init` and recalibration
    /// while running are both supported.
    pub fn set_position(&self, value: i32) {
        self.state.with_mut(|s| s.set_position(value));
    }

    /// Decode one delivered edge event.
    ///
    /// Called from the platform's notification context. The opposite channel
    /// is sampled live, then the decoder steps under the state lock. Events
    /// for pins this encoder does not own, and events arriving while not
    /// initialized, are discarded.
    pub fn handle_edge(&self, event: &EdgeEvent) {
        let channel = if event.pin == self.pins.cha {
            EncoderChannel::A
        } else if event.pin == self.pins.chb {
            EncoderChannel::B
        } else {
            return;
        };
        let other = match channel {
            EncoderChannel::A => self.chb.read(),
            EncoderChannel::B => self.cha.read(),
        };
        self.state
            .with_mut(|s| s.step(channel, event.level, other, event.timestamp_us));
    }
}
