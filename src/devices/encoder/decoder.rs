//! Quadrature decoding state machine
//!
//! Pure, hardware-free core of the encoder driver: it turns a stream of
//! debounced channel transitions into a signed position count at the selected
//! resolution. The driver in the parent module feeds it events sampled from
//! the pins; everything here is deterministic and runs under the encoder's
//! state lock.
//!
//! With the lower two bits holding (A << 1 | B), a forward (clockwise)
//! rotation walks the Gray-code cycle
//!
//! ```text
//!   00 -> 10 -> 11 -> 01 -> 00 -> ...
//! ```
//!
//! and a reverse rotation walks it the other way:
//!
//! ```text
//!   00 -> 01 -> 11 -> 10 -> 00 -> ...
//! ```
//!
//! Consequences used by the mode handlers below:
//! - on a rising edge of A, B is low when turning forward and high in reverse
//! - on a falling edge of A, B is high when turning forward and low in reverse

use crate::platform::Level;

/// Edges closer together than this (in microsecond ticks) are treated as
/// contact chatter and discarded.
pub const MIN_PULSE_US: u32 = 50;

const MASK_LOWER2: u8 = 0b11;

/// Direction per (levelA, levelB) after an accepted edge of channel A.
const LOOKUP_X2: [[i8; 2]; 2] = [[-1, 1], [1, -1]];

/// Direction per (previous state, current state) transition, states encoded
/// (A << 1 | B). Transitions that are not Gray-code adjacent count 0.
const LOOKUP_X4: [[i8; 4]; 4] = [
    [0, -1, 1, 0],
    [1, 0, 0, -1],
    [-1, 0, 0, 1],
    [0, 1, -1, 0],
];

/// Resolution multiplication mode
///
/// Selects how many edge events per physical encoder cycle are counted,
/// trading notification load for resolution. `Unset` is the mode of an
/// uninitialized decoder; starting a decoder in `Unset` is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Multiplication {
    /// Not initialized
    #[default]
    Unset,
    /// Rising edges of channel A only (1x resolution)
    X1,
    /// Both edges of channel A (2x resolution)
    X2,
    /// Both edges of both channels (4x resolution)
    X4,
}

/// Which encoder channel an event fired on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncoderChannel {
    /// Channel A
    A,
    /// Channel B
    B,
}

/// Per-encoder decoding state
///
/// Mutated only under the owning encoder's state lock: from edge handlers
/// while initialized, and from the lifecycle operations of the owner.
#[derive(Debug)]
pub struct DecoderCore {
    mode: Multiplication,
    position: i32,
    last_edge_us: u32,
    prev_state: u8,
    initialized: bool,
}

impl DecoderCore {
    /// Decoder in its uninitialized rest state
    pub const fn new() -> Self {
        Self {
            mode: Multiplication::Unset,
            position: 0,
            last_edge_us: 0,
            prev_state: 0,
            initialized: false,
        }
    }

    /// Current mode (`Unset` while uninitialized)
    pub fn mode(&self) -> Multiplication {
        self.mode
    }

    /// Accumulated tick count
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Overwrite the accumulated tick count
    ///
    /// Callable in any lifecycle state: pre-seeding before `begin` and
    /// recalibration while running are both intended uses.
    pub fn set_position(&mut self, value: i32) {
        self.position = value;
    }

    /// Whether the decoder is accepting events
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Last accepted edge tick
    pub fn last_edge_us(&self) -> u32 {
        self.last_edge_us
    }

    /// Previous (A << 1 | B) channel state, tracked in X4 mode
    pub fn prev_state(&self) -> u8 {
        self.prev_state
    }

    /// Start decoding in `mode`, seeding the channel state from the given
    /// live levels.
    ///
    /// Publishing `initialized` here, under the same lock the handlers take,
    /// means an event delivered between subscription and this call is
    /// discarded by the `initialized` check in [`DecoderCore::step`] instead
    /// of racing the setup writes.
    pub fn begin(&mut self, mode: Multiplication, level_a: Level, level_b: Level) {
        self.prev_state = ((level_a.bit() << 1) | level_b.bit()) & MASK_LOWER2;
        self.mode = mode;
        self.initialized = true;
    }

    /// Stop decoding; with `clear`, also reset position and edge history.
    pub fn end(&mut self, clear: bool) {
        self.initialized = false;
        self.mode = Multiplication::Unset;
        if clear {
            self.position = 0;
            self.last_edge_us = 0;
            self.prev_state = 0;
        }
    }

    /// Apply one edge event.
    ///
    /// `level` is the post-transition level of the channel the event fired
    /// on; `other` is the level of the opposite channel, sampled live by the
    /// caller. Events are discarded while uninitialized and events inside the
    /// debounce window are discarded without any state change.
    pub fn step(&mut self, channel: EncoderChannel, level: Level, other: Level, timestamp_us: u32) {
        if !self.initialized {
            return;
        }
        // Wraparound-safe: the tick source wraps at u32::MAX.
        if timestamp_us.wrapping_sub(self.last_edge_us) < MIN_PULSE_US {
            return;
        }

        let delta = match self.mode {
            Multiplication::Unset => return,
            Multiplication::X1 => {
                // Subscribed to rising edges of A only; B gives the direction.
                debug_assert!(channel == EncoderChannel::A);
                if channel != EncoderChannel::A {
                    return;
                }
                if other.is_low() {
                    1
                } else {
                    -1
                }
            }
            Multiplication::X2 => {
                debug_assert!(channel == EncoderChannel::A);
                if channel != EncoderChannel::A {
                    return;
                }
                LOOKUP_X2[level.idx()][other.idx()]
            }
            Multiplication::X4 => {
                let (level_a, level_b) = match channel {
                    EncoderChannel::A => (level, other),
                    EncoderChannel::B => (other, level),
                };
                let current = ((level_a.bit() << 1) | level_b.bit()) & MASK_LOWER2;
                let delta = LOOKUP_X4[self.prev_state as usize][current as usize];
                self.prev_state = current;
                delta
            }
        };

        self.position = self.position.wrapping_add(delta as i32);
        self.last_edge_us = timestamp_us;
    }
}

impl Default for DecoderCore {
    fn default() -> Self {
        Self::new()
    }
}
