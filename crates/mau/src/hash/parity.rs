//! Parity-group reduction.
//!
//! A parity mask selects a subset of hash bits; the group bit is the XOR of that subset.
//! A multi-bit group is an ordered list of masks, one output bit per mask. Masks are
//! independent and may overlap, which yields correlated sub-hashes.

use crate::common::BitField;

/// XOR-reduces the bits of `hash` selected by `mask`.
#[inline(always)]
pub fn reduce(hash: BitField, mask: BitField) -> bool {
    (hash & mask).parity()
}

/// Ordered list of parity masks forming one multi-bit group value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParityGroupMask {
    masks: Vec<BitField>,
}

impl ParityGroupMask {
    /// Creates an empty mask list.
    pub const fn new() -> Self {
        Self { masks: Vec::new() }
    }

    /// Number of output bits (L).
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Returns `true` if no mask is configured.
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Mask driving output bit `bit`.
    pub fn mask(&self, bit: usize) -> Option<BitField> {
        self.masks.get(bit).copied()
    }

    /// Sets the mask for output bit `bit`, growing the list with zero masks as needed.
    ///
    /// Width and range checks are the caller's; see `HashEngine::set_parity_mask`.
    pub(crate) fn set(&mut self, bit: usize, mask: BitField) {
        if bit >= self.masks.len() {
            self.masks.resize(bit + 1, BitField::from_raw(0, mask.width()));
        }
        self.masks[bit] = mask;
    }

    /// Computes the L-bit group value: bit `j` is `reduce(hash, mask_j)`.
    pub fn value(&self, hash: BitField) -> BitField {
        let out = self
            .masks
            .iter()
            .enumerate()
            .fold(0u64, |acc, (j, m)| acc | (u64::from(reduce(hash, *m)) << j));
        BitField::from_raw(out, self.masks.len())
    }
}
