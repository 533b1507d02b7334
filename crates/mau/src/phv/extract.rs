//! Fixed-offset field extraction.
//!
//! Stands in for the parser at its interface boundary: each extraction copies a
//! container-sized big-endian field from a byte offset in the packet into a container.

use serde::Deserialize;

use super::{Phv, PhvContainer};
use crate::common::{ConfigError, EvalError};

/// One field copy from packet bytes into a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Extraction {
    /// Byte offset of the field in the packet.
    pub offset: usize,
    /// Destination container; its size sets the field length.
    pub container: PhvContainer,
}

/// Ordered list of extractions applied to every packet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhvExtractor {
    extractions: Vec<Extraction>,
}

impl PhvExtractor {
    /// Creates an extractor after checking every destination container exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ContainerOutOfRange`] for a nonexistent destination.
    pub fn new(extractions: Vec<Extraction>) -> Result<Self, ConfigError> {
        for e in &extractions {
            let _ = e.container.checked_size()?;
        }
        Ok(Self { extractions })
    }

    /// Configured extractions, in application order.
    pub fn extractions(&self) -> &[Extraction] {
        &self.extractions
    }

    /// Builds a PHV from packet bytes. Later extractions overwrite earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::PacketTooShort`] if a field runs past the end of the packet.
    pub fn extract(&self, packet: &[u8]) -> Result<Phv, EvalError> {
        let mut phv = Phv::new();
        for e in &self.extractions {
            let size = e
                .container
                .size()
                .ok_or(EvalError::UnknownContainer(e.container.0))?;
            let needed = size.bytes();
            let field = e
                .offset
                .checked_add(needed)
                .and_then(|end| packet.get(e.offset..end))
                .ok_or(EvalError::PacketTooShort {
                    offset: e.offset,
                    needed,
                    len: packet.len(),
                })?;
            let value = field.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            phv.set(e.container, value)?;
        }
        Ok(phv)
    }
}
