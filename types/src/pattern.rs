//! Pattern ids: the canonical integer form of a trait vector.
//!
//! A pattern id packs eight polarity bits, vector index `i` in bit `i`.
//! Bits 0–5 are lines 1–6 and bits 6–7 are the auxiliary pair. The declared
//! domain is exactly `0..=255`; nothing outside it is ever wrapped back in.
//!
//! ```text
//!  bit:    7   6 | 5   4   3 | 2   1   0
//!          aux   |  upper    |  lower
//!  octal:  d2    |  d1       |  d0
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::LinePosition;
use crate::lines::{Lines, Polarity};

/// Number of polarity bits in a trait vector.
pub const TRAIT_WIDTH: usize = 8;

/// Eight polarity bits in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitBits([Polarity; TRAIT_WIDTH]);

impl TraitBits {
    #[must_use]
    pub const fn new(bits: [Polarity; TRAIT_WIDTH]) -> Self {
        Self(bits)
    }

    #[must_use]
    pub fn from_bools(bits: [bool; TRAIT_WIDTH]) -> Self {
        Self(bits.map(Polarity::from_bit))
    }

    #[must_use]
    pub const fn uniform(polarity: Polarity) -> Self {
        Self([polarity; TRAIT_WIDTH])
    }

    #[must_use]
    pub const fn as_array(&self) -> &[Polarity; TRAIT_WIDTH] {
        &self.0
    }

    /// Polarity at vector index `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Polarity> {
        self.0.get(index).copied()
    }

    /// A copy with the bit at `index` flipped. Out-of-range indexes are a no-op.
    #[must_use]
    pub fn flipped(mut self, index: usize) -> Self {
        if let Some(bit) = self.0.get_mut(index) {
            *bit = bit.flipped();
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pattern id {value} is outside the declared domain 0..=255")]
pub struct ClassificationDomainError {
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Binary,
    Octal,
    Decimal,
}

impl Radix {
    #[must_use]
    pub const fn base(self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Decimal => 10,
        }
    }
}

impl fmt::Display for Radix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Radix::Binary => "binary",
            Radix::Octal => "octal",
            Radix::Decimal => "decimal",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternParseError {
    #[error("pattern id must not be empty")]
    Empty,
    #[error("invalid {radix} digit in pattern id {input:?}")]
    InvalidDigit { radix: Radix, input: String },
    #[error(transparent)]
    Domain(#[from] ClassificationDomainError),
}

/// Canonical pattern id in `0..=255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u8")]
pub struct PatternId(u8);

impl PatternId {
    pub const DOMAIN_SIZE: u32 = 256;
    pub const MIN: PatternId = PatternId(0);
    pub const MAX: PatternId = PatternId(u8::MAX);

    /// Defined result for input that failed shape checks.
    ///
    /// Lines alternate solid/broken from the bottom with an agreeing
    /// auxiliary pair, which classifies to the balanced "After Completion"
    /// figure.
    pub const NEUTRAL: PatternId = PatternId(0b0001_0101);

    const AUX_LOW: u8 = 1 << 6;
    const AUX_HIGH: u8 = 1 << 7;

    pub fn new(value: u64) -> Result<Self, ClassificationDomainError> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_err| ClassificationDomainError { value })
    }

    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Every pattern id in the domain, ascending.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=u8::MAX).map(Self)
    }

    /// Pack trait bits, vector index `i` into bit `i`.
    #[must_use]
    pub fn encode(bits: &TraitBits) -> Self {
        let packed = bits
            .as_array()
            .iter()
            .enumerate()
            .fold(0u8, |acc, (i, polarity)| {
                if polarity.is_positive() {
                    acc | (1 << i)
                } else {
                    acc
                }
            });
        Self(packed)
    }

    /// Exact inverse of [`PatternId::encode`].
    #[must_use]
    pub fn decode(self) -> TraitBits {
        TraitBits::new(std::array::from_fn(|i| {
            Polarity::from_bit(self.0 & (1 << i) != 0)
        }))
    }

    /// The two auxiliary bits (vector indexes 6 and 7).
    #[must_use]
    pub const fn auxiliary(self) -> (Polarity, Polarity) {
        (
            Polarity::from_bit(self.0 & Self::AUX_LOW != 0),
            Polarity::from_bit(self.0 & Self::AUX_HIGH != 0),
        )
    }

    /// Whether the auxiliary pair disagrees and therefore moves line 6.
    #[must_use]
    pub const fn auxiliary_unsettled(self) -> bool {
        (self.0 & Self::AUX_LOW != 0) != (self.0 & Self::AUX_HIGH != 0)
    }

    /// Six-line composition this pattern classifies to.
    ///
    /// Bits 0–5 are taken as lines 1–6. An unsettled auxiliary pair flips
    /// line 6, so every composition is reached by exactly four pattern ids.
    #[must_use]
    pub fn lines(self) -> Lines {
        let base = Lines::from_low_bits(self.0);
        if self.auxiliary_unsettled() {
            base.flip(LinePosition::TOP)
        } else {
            base
        }
    }

    /// Eight binary digits, most significant first.
    #[must_use]
    pub fn to_binary(self) -> String {
        format!("{:08b}", self.0)
    }

    /// Three octal digits: auxiliary pair, upper trigram, lower trigram.
    #[must_use]
    pub fn to_octal(self) -> String {
        format!("{:03o}", self.0)
    }

    #[must_use]
    pub fn to_decimal(self) -> String {
        self.0.to_string()
    }

    /// Parse a binary form; a leading `0b` is optional.
    pub fn parse_binary(input: &str) -> Result<Self, PatternParseError> {
        parse_radix(input, Radix::Binary, "0b")
    }

    /// Parse an octal form; a leading `0o` is optional.
    pub fn parse_octal(input: &str) -> Result<Self, PatternParseError> {
        parse_radix(input, Radix::Octal, "0o")
    }

    pub fn parse_decimal(input: &str) -> Result<Self, PatternParseError> {
        parse_radix(input, Radix::Decimal, "")
    }
}

fn parse_radix(input: &str, radix: Radix, prefix: &str) -> Result<PatternId, PatternParseError> {
    let trimmed = input.trim();
    let digits = if prefix.is_empty() {
        trimmed
    } else {
        trimmed
            .strip_prefix(prefix)
            .or_else(|| trimmed.strip_prefix(&prefix.to_ascii_uppercase()))
            .unwrap_or(trimmed)
    };
    if digits.is_empty() {
        return Err(PatternParseError::Empty);
    }
    if !digits.chars().all(|c| c.is_digit(radix.base())) {
        return Err(PatternParseError::InvalidDigit {
            radix,
            input: input.to_string(),
        });
    }
    // All digits are valid, so the only possible failure is overflow; those
    // values are out of domain and saturate.
    let value = u64::from_str_radix(digits, radix.base()).unwrap_or(u64::MAX);
    Ok(PatternId::new(value)?)
}

impl TryFrom<u64> for PatternId {
    type Error = ClassificationDomainError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u8> for PatternId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<PatternId> for u8 {
    fn from(value: PatternId) -> Self {
        value.0
    }
}

impl FromStr for PatternId {
    type Err = PatternParseError;

    /// Accepts `0b…` binary, `0o…` octal, or plain decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("0b") {
            Self::parse_binary(trimmed)
        } else if lower.starts_with("0o") {
            Self::parse_octal(trimmed)
        } else {
            Self::parse_decimal(trimmed)
        }
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
