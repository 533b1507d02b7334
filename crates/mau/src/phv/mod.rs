//! Packet Header Vector.
//!
//! The PHV is the per-packet array of extracted header fields that feeds hashing and
//! gateway evaluation. This module provides:
//! 1. **Containers:** 224 containers in three size classes (64x32-bit, 64x8-bit, 96x16-bit).
//! 2. **Access:** Masked reads and writes, whole-container `BitField` views, and byte access.
//! 3. **Extraction:** A fixed-offset extractor that fills containers from raw packet bytes.

/// Fixed-offset field extraction.
pub mod extract;

pub use extract::{Extraction, PhvExtractor};

use std::fmt;

use serde::Deserialize;

use crate::common::{BitField, ConfigError, EvalError};

/// Number of 32-bit containers (indices 0..64).
pub const WORD_CONTAINERS: u16 = 64;
/// Number of 8-bit containers (indices 64..128).
pub const BYTE_CONTAINERS: u16 = 64;
/// Number of 16-bit containers (indices 128..224).
pub const HALF_CONTAINERS: u16 = 96;
/// Total number of containers.
pub const PHV_CONTAINERS: usize = (WORD_CONTAINERS + BYTE_CONTAINERS + HALF_CONTAINERS) as usize;

const BYTE_BASE: u16 = WORD_CONTAINERS;
const HALF_BASE: u16 = WORD_CONTAINERS + BYTE_CONTAINERS;

/// Size class of a PHV container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerSize {
    /// 8-bit container.
    Byte,
    /// 16-bit container.
    Half,
    /// 32-bit container.
    Word,
}

impl ContainerSize {
    /// Width of the size class in bits.
    pub const fn bits(self) -> usize {
        match self {
            Self::Byte => 8,
            Self::Half => 16,
            Self::Word => 32,
        }
    }

    /// Width of the size class in bytes.
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }
}

/// Flat index of a PHV container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct PhvContainer(pub u16);

impl PhvContainer {
    /// The `i`-th 32-bit container.
    pub const fn word(i: u16) -> Self {
        Self(i)
    }

    /// The `i`-th 8-bit container.
    pub const fn byte(i: u16) -> Self {
        Self(BYTE_BASE + i)
    }

    /// The `i`-th 16-bit container.
    pub const fn half(i: u16) -> Self {
        Self(HALF_BASE + i)
    }

    /// Size class, or `None` for an index past the last container.
    pub const fn size(self) -> Option<ContainerSize> {
        match self.0 {
            i if i < BYTE_BASE => Some(ContainerSize::Word),
            i if i < HALF_BASE => Some(ContainerSize::Byte),
            i if (i as usize) < PHV_CONTAINERS => Some(ContainerSize::Half),
            _ => None,
        }
    }

    /// Size class, rejecting nonexistent containers at configuration time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ContainerOutOfRange`] for an index past the last container.
    pub fn checked_size(self) -> Result<ContainerSize, ConfigError> {
        self.size().ok_or(ConfigError::ContainerOutOfRange(self.0))
    }
}

impl fmt::Display for PhvContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size() {
            Some(ContainerSize::Word) => write!(f, "W{}", self.0),
            Some(ContainerSize::Byte) => write!(f, "B{}", self.0 - BYTE_BASE),
            Some(ContainerSize::Half) => write!(f, "H{}", self.0 - HALF_BASE),
            None => write!(f, "?{}", self.0),
        }
    }
}

/// Per-packet header vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phv {
    values: Vec<u32>,
}

impl Default for Phv {
    fn default() -> Self {
        Self::new()
    }
}

impl Phv {
    /// Creates a PHV with every container zeroed.
    pub fn new() -> Self {
        Self {
            values: vec![0; PHV_CONTAINERS],
        }
    }

    fn size_of(container: PhvContainer) -> Result<ContainerSize, EvalError> {
        container
            .size()
            .ok_or(EvalError::UnknownContainer(container.0))
    }

    /// Reads a container.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownContainer`] for an index past the last container.
    pub fn get(&self, container: PhvContainer) -> Result<u32, EvalError> {
        let _ = Self::size_of(container)?;
        Ok(self.values[container.0 as usize])
    }

    /// Writes a container; bits beyond the container size are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownContainer`] for an index past the last container.
    pub fn set(&mut self, container: PhvContainer, value: u32) -> Result<(), EvalError> {
        let size = Self::size_of(container)?;
        self.values[container.0 as usize] = (u64::from(value) & BitField::mask(size.bits())) as u32;
        Ok(())
    }

    /// Reads a container as a `BitField` of its natural width.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownContainer`] for an index past the last container.
    pub fn field(&self, container: PhvContainer) -> Result<BitField, EvalError> {
        let size = Self::size_of(container)?;
        Ok(BitField::from_raw(
            u64::from(self.values[container.0 as usize]),
            size.bits(),
        ))
    }

    /// Reads byte `byte` (0 = least significant) of a container.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownContainer`] for an index past the last container.
    /// Bytes beyond the container size read as zero.
    pub fn byte(&self, container: PhvContainer, byte: usize) -> Result<u8, EvalError> {
        let value = self.get(container)?;
        Ok(value.checked_shr(8 * byte as u32).unwrap_or(0) as u8)
    }
}
