//! Channel mask and device constants for the PCA9546A I2C switch.
//!
//! The chip has a single 8-bit control register. Bits 0–3 each enable one
//! downstream channel; bits 4–7 carry no meaning and must be written as
//! zero:
//!
//! | Bit | Channel |
//! |-----|---------|
//! | 0   | 1 (SC0/SD0) |
//! | 1   | 2 (SC1/SD1) |
//! | 2   | 3 (SC2/SD2) |
//! | 3   | 4 (SC3/SD3) |
//!
//! Any combination may be set at once; the switch then joins several
//! downstream branches to the upstream bus simultaneously.

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};

// ---------------------------------------------------------------------------
// Device constants
// ---------------------------------------------------------------------------

/// Default 7-bit I2C address (A0–A2 tied low).
///
/// The address pins select anything in `0x70..=0x77`.
pub const DEFAULT_ADDRESS: u8 = 0x70;

/// Number of downstream channels on the switch.
pub const CHANNEL_COUNT: usize = 4;

/// Highest value accepted for the control register.
pub const MAX_CHANNEL_MASK: u8 = 0x0F;

/// Value returned by the lossy register read when the bus delivers no byte.
pub const NO_DATA: u8 = 0xFF;

/// Control register bit for channel 1.
pub const CHANNEL_1: u8 = 0x01;
/// Control register bit for channel 2.
pub const CHANNEL_2: u8 = 0x02;
/// Control register bit for channel 3.
pub const CHANNEL_3: u8 = 0x04;
/// Control register bit for channel 4.
pub const CHANNEL_4: u8 = 0x08;

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// A validated set of enabled channels.
///
/// Always holds a value in `0..=MAX_CHANNEL_MASK`, so it can be written to
/// the switch without a range check.
///
/// # Example
///
/// ```
/// use pca9546::Channels;
///
/// let ch = Channels::CHANNEL_1 | Channels::CHANNEL_3;
/// assert_eq!(ch.bits(), 0b0101);
/// assert!(ch.is_enabled(2));
/// assert!(Channels::from_bits(0x10).is_none());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Channels(u8);

impl Channels {
    /// All channels disconnected. This is also the power-on state.
    pub const NONE: Self = Self(0);
    pub const CHANNEL_1: Self = Self(CHANNEL_1);
    pub const CHANNEL_2: Self = Self(CHANNEL_2);
    pub const CHANNEL_3: Self = Self(CHANNEL_3);
    pub const CHANNEL_4: Self = Self(CHANNEL_4);
    /// Every channel connected.
    pub const ALL: Self = Self(MAX_CHANNEL_MASK);

    /// Build a channel set from a raw register value.
    ///
    /// Returns `None` if any of bits 4–7 is set.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits <= MAX_CHANNEL_MASK {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Build a channel set from a raw register value, dropping bits 4–7.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & MAX_CHANNEL_MASK)
    }

    /// Raw register value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// `true` if every channel in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check a single channel by 0-based index (0–3).
    ///
    /// Indexes outside the switch's range are never enabled.
    pub const fn is_enabled(self, index: u8) -> bool {
        index < CHANNEL_COUNT as u8 && self.0 & (1 << index) != 0
    }
}

impl BitOr for Channels {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for Channels {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Channels {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & MAX_CHANNEL_MASK)
    }
}

impl From<Channels> for u8 {
    fn from(channels: Channels) -> u8 {
        channels.0
    }
}

impl fmt::Debug for Channels {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Channels({:#06b})", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Channels {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Channels({=u8:#b})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Outcome of the most recent selection attempt.
///
/// Only the last attempt is kept; every call to a selecting method
/// overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub const fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bits_accepts_exactly_low_nibble() {
        for bits in 0..=MAX_CHANNEL_MASK {
            assert_eq!(Channels::from_bits(bits).map(Channels::bits), Some(bits));
        }
        for bits in (MAX_CHANNEL_MASK + 1)..=u8::MAX {
            assert!(Channels::from_bits(bits).is_none());
        }
    }

    #[test]
    fn truncate_drops_high_bits() {
        assert_eq!(Channels::from_bits_truncate(0xF5), Channels::CHANNEL_1 | Channels::CHANNEL_3);
        assert_eq!(Channels::from_bits_truncate(0xF0), Channels::NONE);
    }

    #[test]
    fn channel_bits_follow_register_layout() {
        assert!(Channels::CHANNEL_1.is_enabled(0));
        assert!(Channels::CHANNEL_2.is_enabled(1));
        assert!(Channels::CHANNEL_3.is_enabled(2));
        assert!(Channels::CHANNEL_4.is_enabled(3));
        assert!(!Channels::ALL.is_enabled(4));
        assert!(!Channels::ALL.is_enabled(7));
        assert_eq!(
            Channels::CHANNEL_1 | Channels::CHANNEL_2 | Channels::CHANNEL_3 | Channels::CHANNEL_4,
            Channels::ALL
        );
    }

    #[test]
    fn complement_stays_in_range() {
        assert_eq!(!Channels::NONE, Channels::ALL);
        assert_eq!(!Channels::CHANNEL_2, Channels::from_bits_truncate(0b1101));
        assert!((!Channels::ALL).is_empty());
    }

    #[test]
    fn contains_checks_subset() {
        let ch = Channels::CHANNEL_1 | Channels::CHANNEL_4;
        assert!(ch.contains(Channels::CHANNEL_4));
        assert!(ch.contains(Channels::NONE));
        assert!(!ch.contains(Channels::CHANNEL_2 | Channels::CHANNEL_4));
        assert_eq!(ch & Channels::CHANNEL_4, Channels::CHANNEL_4);
    }
}
