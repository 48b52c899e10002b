//! Range-checked identifiers.
//!
//! Every identifier in the taxonomy is a small 1-based ordinal. Zero is
//! structurally unrepresentable via `NonZeroU8`, and the upper bound is
//! checked at construction, so holding an id proves it is in range.

use std::fmt;
use std::num::NonZeroU8;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} must be in 1..={max}, got {value}")]
pub struct IdRangeError {
    pub kind: &'static str,
    pub value: u32,
    pub max: u8,
}

macro_rules! bounded_id {
    ($(#[$meta:meta])* $name:ident, $max:literal, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u32", into = "u8")]
        pub struct $name(NonZeroU8);

        impl $name {
            pub const MAX: u8 = $max;
            pub const FIRST: Self = Self(NonZeroU8::MIN);

            pub fn try_new(value: u32) -> Result<Self, IdRangeError> {
                if value == 0 || value > u32::from(Self::MAX) {
                    return Err(IdRangeError {
                        kind: $kind,
                        value,
                        max: Self::MAX,
                    });
                }
                NonZeroU8::new(value as u8).map(Self).ok_or(IdRangeError {
                    kind: $kind,
                    value,
                    max: Self::MAX,
                })
            }

            /// Build from a zero-based index (`0` maps to id `1`).
            #[must_use]
            pub fn from_index(index: usize) -> Option<Self> {
                let value = u32::try_from(index).ok()?.checked_add(1)?;
                Self::try_new(value).ok()
            }

            #[must_use]
            pub const fn get(self) -> u8 {
                self.0.get()
            }

            /// Zero-based index, suitable for table lookups.
            #[must_use]
            pub const fn index(self) -> usize {
                (self.0.get() - 1) as usize
            }

            /// Every id in ascending order.
            pub fn all() -> impl Iterator<Item = Self> {
                (1..=u32::from(Self::MAX)).filter_map(|value| Self::try_new(value).ok())
            }
        }

        impl TryFrom<u32> for $name {
            type Error = IdRangeError;

            fn try_from(value: u32) -> Result<Self, Self::Error> {
                Self::try_new(value)
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> Self {
                value.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

bounded_id!(
    /// One of the 64 archetypes, numbered in traditional sequence order.
    ArchetypeId,
    64,
    "archetype id"
);

bounded_id!(
    /// One of the 8 palaces.
    PalaceId,
    8,
    "palace id"
);

bounded_id!(
    /// Slot of an archetype within its palace.
    PalacePosition,
    8,
    "palace position"
);

bounded_id!(
    /// Line position within a composition; line 1 is the bottom line.
    LinePosition,
    6,
    "line position"
);

bounded_id!(
    /// Ordinal of a developmental sequence stage.
    StageOrdinal,
    8,
    "stage ordinal"
);

impl PalaceId {
    /// The palace on the opposite side of the palace ring.
    #[must_use]
    pub fn antipode(self) -> Self {
        Self(nz(Self::MAX + 1 - self.get()))
    }
}

impl PalacePosition {
    /// The mirrored slot within a palace.
    #[must_use]
    pub fn antipode(self) -> Self {
        Self(nz(Self::MAX + 1 - self.get()))
    }
}

impl LinePosition {
    pub const BOTTOM: Self = Self(NonZeroU8::new(1).unwrap());
    pub const TOP: Self = Self(NonZeroU8::new(6).unwrap());

    /// Bit mask of this line inside a six-line composition.
    #[must_use]
    pub const fn mask(self) -> u8 {
        1 << (self.0.get() - 1)
    }
}

fn nz(value: u8) -> NonZeroU8 {
    NonZeroU8::new(value).expect("antipode of an in-range id is non-zero")
}
