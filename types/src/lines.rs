//! Six-line compositions and their trigram halves.
//!
//! Line 1 is the bottom line and occupies bit 0. Lines 1–3 form the lower
//! trigram, lines 4–6 the upper trigram.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::LinePosition;

/// Polarity of a single line or trait bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Solid line (yang).
    Positive,
    /// Broken line (yin).
    Negative,
}

impl Polarity {
    #[must_use]
    pub const fn from_bit(bit: bool) -> Self {
        if bit { Self::Positive } else { Self::Negative }
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Positive)
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

/// The eight three-line figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigram {
    Qian,
    Dui,
    Li,
    Zhen,
    Xun,
    Kan,
    Gen,
    Kun,
}

impl Trigram {
    /// Trigrams in Fu Xi order.
    pub const ALL: [Trigram; 8] = [
        Trigram::Qian,
        Trigram::Dui,
        Trigram::Li,
        Trigram::Zhen,
        Trigram::Xun,
        Trigram::Kan,
        Trigram::Gen,
        Trigram::Kun,
    ];

    /// Three-bit value with the bottom line in bit 0.
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Trigram::Qian => 0b111,
            Trigram::Dui => 0b011,
            Trigram::Li => 0b101,
            Trigram::Zhen => 0b001,
            Trigram::Xun => 0b110,
            Trigram::Kan => 0b010,
            Trigram::Gen => 0b100,
            Trigram::Kun => 0b000,
        }
    }

    /// Inverse of [`Trigram::bits`]. Only the low three bits are read.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0b111 => Trigram::Qian,
            0b011 => Trigram::Dui,
            0b101 => Trigram::Li,
            0b001 => Trigram::Zhen,
            0b110 => Trigram::Xun,
            0b010 => Trigram::Kan,
            0b100 => Trigram::Gen,
            _ => Trigram::Kun,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Trigram::Qian => "qian",
            Trigram::Dui => "dui",
            Trigram::Li => "li",
            Trigram::Zhen => "zhen",
            Trigram::Xun => "xun",
            Trigram::Kan => "kan",
            Trigram::Gen => "gen",
            Trigram::Kun => "kun",
        }
    }

    /// Natural image of the trigram.
    #[must_use]
    pub const fn image(self) -> &'static str {
        match self {
            Trigram::Qian => "Heaven",
            Trigram::Dui => "Lake",
            Trigram::Li => "Fire",
            Trigram::Zhen => "Thunder",
            Trigram::Xun => "Wind",
            Trigram::Kan => "Water",
            Trigram::Gen => "Mountain",
            Trigram::Kun => "Earth",
        }
    }

    /// Every line inverted.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self::from_bits(!self.bits())
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A six-line composition.
///
/// Invariant: only the low six bits are ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lines(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("line composition {0:#b} has bits above line 6")]
pub struct LinesRangeError(pub u8);

impl Lines {
    pub const MASK: u8 = 0b11_1111;

    pub fn new(bits: u8) -> Result<Self, LinesRangeError> {
        if bits & !Self::MASK != 0 {
            return Err(LinesRangeError(bits));
        }
        Ok(Self(bits))
    }

    /// Keep only the low six bits of `bits`.
    #[must_use]
    pub const fn from_low_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    #[must_use]
    pub const fn from_trigrams(upper: Trigram, lower: Trigram) -> Self {
        Self((upper.bits() << 3) | lower.bits())
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn lower(self) -> Trigram {
        Trigram::from_bits(self.0)
    }

    #[must_use]
    pub const fn upper(self) -> Trigram {
        Trigram::from_bits(self.0 >> 3)
    }

    #[must_use]
    pub const fn line(self, position: LinePosition) -> Polarity {
        Polarity::from_bit(self.0 & position.mask() != 0)
    }

    /// Polarities from line 1 (bottom) to line 6 (top).
    #[must_use]
    pub fn polarities(self) -> [Polarity; 6] {
        std::array::from_fn(|i| Polarity::from_bit(self.0 & (1 << i) != 0))
    }

    /// Flip every line set in `mask`. Bits above line 6 are ignored.
    #[must_use]
    pub const fn flip_mask(self, mask: u8) -> Self {
        Self((self.0 ^ mask) & Self::MASK)
    }

    #[must_use]
    pub const fn flip(self, position: LinePosition) -> Self {
        self.flip_mask(position.mask())
    }

    /// Every line inverted.
    #[must_use]
    pub const fn complement(self) -> Self {
        self.flip_mask(Self::MASK)
    }

    /// Line order reversed (the figure turned upside down).
    #[must_use]
    pub const fn reversed(self) -> Self {
        let mut out = 0u8;
        let mut i = 0;
        while i < 6 {
            if self.0 & (1 << i) != 0 {
                out |= 1 << (5 - i);
            }
            i += 1;
        }
        Self(out)
    }

    /// Interlocked inner figure: lines 2–4 below, lines 3–5 above.
    #[must_use]
    pub const fn nuclear(self) -> Self {
        let lower = (self.0 >> 1) & 0b111;
        let upper = (self.0 >> 2) & 0b111;
        Self((upper << 3) | lower)
    }

    /// Positions at which `self` and `other` differ, bottom first.
    #[must_use]
    pub fn differing_lines(self, other: Lines) -> Vec<LinePosition> {
        let diff = self.0 ^ other.0;
        LinePosition::all()
            .filter(|position| diff & position.mask() != 0)
            .collect()
    }
}

impl TryFrom<u8> for Lines {
    type Error = LinesRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Lines> for u8 {
    fn from(value: Lines) -> Self {
        value.0
    }
}

impl fmt::Display for Lines {
    /// Renders bottom line first, `1` for solid and `0` for broken.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for polarity in self.polarities() {
            f.write_str(if polarity.is_positive() { "1" } else { "0" })?;
        }
        Ok(())
    }
}
