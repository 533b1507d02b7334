//! Fixed-width bit value.
//!
//! `BitField` is the value type that flows through every block of the model: crossbar
//! outputs, Galois matrix rows, seeds, parity masks, and gateway match words. It provides:
//! 1. **Width Tracking:** Every value carries its width (0 to 64 bits).
//! 2. **Normalization:** Bits at or above the width are always zero.
//! 3. **GF(2) Operations:** XOR, AND, complement, and parity, the only arithmetic the blocks use.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

use super::error::BitsError;

/// Widest value a `BitField` can hold.
pub const MAX_WIDTH: usize = 64;

/// A fixed-width unsigned value of up to 64 bits.
///
/// Bit 0 is the least significant bit. Binary operators on two fields produce a field
/// as wide as the wider operand; the narrower operand is zero-extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitField {
    value: u64,
    width: u8,
}

impl BitField {
    /// Creates a field, rejecting values with bits set at or above `width`.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw value.
    /// * `width` - Width in bits, at most [`MAX_WIDTH`].
    ///
    /// # Errors
    ///
    /// Returns [`BitsError::WidthTooLarge`] if `width` exceeds 64 and
    /// [`BitsError::ValueTooWide`] if `value` does not fit.
    pub fn new(value: u64, width: usize) -> Result<Self, BitsError> {
        let field = Self::truncated(value, width)?;
        if field.value != value {
            return Err(BitsError::ValueTooWide { value, width });
        }
        Ok(field)
    }

    /// Creates a field, discarding bits of `value` at or above `width`.
    ///
    /// # Errors
    ///
    /// Returns [`BitsError::WidthTooLarge`] if `width` exceeds 64.
    pub fn truncated(value: u64, width: usize) -> Result<Self, BitsError> {
        if width > MAX_WIDTH {
            return Err(BitsError::WidthTooLarge(width));
        }
        Ok(Self::from_raw(value, width))
    }

    /// Creates an all-zero field.
    ///
    /// # Errors
    ///
    /// Returns [`BitsError::WidthTooLarge`] if `width` exceeds 64.
    pub fn zero(width: usize) -> Result<Self, BitsError> {
        Self::truncated(0, width)
    }

    /// Builds a field for a width the caller has already validated.
    #[inline(always)]
    pub(crate) fn from_raw(value: u64, width: usize) -> Self {
        debug_assert!(width <= MAX_WIDTH);
        Self {
            value: value & Self::mask(width),
            width: width as u8,
        }
    }

    /// Returns a mask with the low `width` bits set.
    #[inline(always)]
    pub const fn mask(width: usize) -> u64 {
        if width >= MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << width) - 1
        }
    }

    /// Returns the raw value.
    #[inline(always)]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the width in bits.
    #[inline(always)]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    /// Returns `true` if no bit is set.
    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Returns bit `index`; bits beyond the width read as zero.
    #[inline(always)]
    pub const fn bit(&self, index: usize) -> bool {
        index < MAX_WIDTH && (self.value >> index) & 1 == 1
    }

    /// Returns a copy with bit `index` set to `bit`.
    ///
    /// # Errors
    ///
    /// Returns [`BitsError::BitOutOfRange`] if `index` is not below the width.
    pub fn with_bit(self, index: usize, bit: bool) -> Result<Self, BitsError> {
        if index >= self.width() {
            return Err(BitsError::BitOutOfRange {
                index,
                width: self.width(),
            });
        }
        let value = if bit {
            self.value | (1 << index)
        } else {
            self.value & !(1 << index)
        };
        Ok(Self { value, ..self })
    }

    /// XOR-reduction of all bits (1 when an odd number of bits is set).
    #[inline(always)]
    pub const fn parity(&self) -> bool {
        self.value.count_ones() & 1 == 1
    }

    /// Extracts `width` bits starting at bit `lo`.
    ///
    /// # Errors
    ///
    /// Returns [`BitsError::BitOutOfRange`] if the slice extends past this field.
    pub fn slice(&self, lo: usize, width: usize) -> Result<Self, BitsError> {
        if lo + width > self.width() {
            return Err(BitsError::BitOutOfRange {
                index: lo + width,
                width: self.width(),
            });
        }
        let shifted = if lo >= MAX_WIDTH { 0 } else { self.value >> lo };
        Ok(Self::from_raw(shifted, width))
    }

    /// Concatenates `high` above this field.
    ///
    /// # Errors
    ///
    /// Returns [`BitsError::WidthTooLarge`] if the combined width exceeds 64.
    pub fn concat(self, high: Self) -> Result<Self, BitsError> {
        let width = self.width() + high.width();
        if width > MAX_WIDTH {
            return Err(BitsError::WidthTooLarge(width));
        }
        let upper = if self.width() >= MAX_WIDTH {
            0
        } else {
            high.value << self.width()
        };
        Ok(Self::from_raw(self.value | upper, width))
    }

    /// Iterates over the indices of set bits, lowest first.
    pub fn ones(&self) -> impl Iterator<Item = usize> + use<> {
        let mut rest = self.value;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let idx = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(idx)
        })
    }
}

impl BitXor for BitField {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self::from_raw(self.value ^ rhs.value, self.width().max(rhs.width()))
    }
}

impl BitAnd for BitField {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::from_raw(self.value & rhs.value, self.width().max(rhs.width()))
    }
}

impl BitOr for BitField {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from_raw(self.value | rhs.value, self.width().max(rhs.width()))
    }
}

impl Not for BitField {
    type Output = Self;

    /// Complements every bit inside the width.
    fn not(self) -> Self {
        Self::from_raw(!self.value, self.width())
    }
}

impl fmt::Display for BitField {
    /// Formats as a Verilog-style sized literal, e.g. `20'h602a8`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'h{:x}", self.width, self.value)
    }
}

impl fmt::LowerHex for BitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}
