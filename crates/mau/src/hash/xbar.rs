//! Hash input crossbar.
//!
//! Routes PHV container bytes onto a hash unit's input lines. The unit's M input lines
//! are split into byte lanes; lane `l` drives lines `8l..8l+8` (bit 0 of the byte on the
//! lowest line). An unselected lane drives zeros.

use serde::Deserialize;

use crate::common::{BitField, ConfigError, EvalError, UnitId};
use crate::phv::{Phv, PhvContainer};

/// Source of one crossbar byte lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct ByteSelect {
    /// Source container.
    pub container: PhvContainer,
    /// Byte within the container, 0 = least significant.
    #[serde(default)]
    pub byte: u8,
}

/// Byte-lane selection for one hash unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputXbar {
    unit: UnitId,
    lanes: Vec<Option<ByteSelect>>,
    input_lines: usize,
}

impl InputXbar {
    /// Creates a crossbar with every lane unselected.
    pub fn new(unit: UnitId, input_lines: usize) -> Self {
        Self {
            unit,
            lanes: vec![None; input_lines.div_ceil(8)],
            input_lines,
        }
    }

    /// Number of byte lanes.
    pub fn lanes(&self) -> usize {
        self.lanes.len()
    }

    /// Selection for `lane`, if any.
    pub fn lane(&self, lane: usize) -> Option<ByteSelect> {
        self.lanes.get(lane).copied().flatten()
    }

    /// Selects (or with `None`, clears) the source of a lane.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::LaneOutOfRange`], [`ConfigError::ContainerOutOfRange`], or
    /// [`ConfigError::ByteOutOfRange`].
    pub fn set_lane(&mut self, lane: usize, select: Option<ByteSelect>) -> Result<(), ConfigError> {
        if lane >= self.lanes.len() {
            return Err(ConfigError::LaneOutOfRange {
                unit: self.unit,
                lane,
                lanes: self.lanes.len(),
            });
        }
        if let Some(sel) = select {
            let size = sel.container.checked_size()?;
            if sel.byte as usize >= size.bytes() {
                return Err(ConfigError::ByteOutOfRange {
                    container: sel.container.0,
                    byte: sel.byte as usize,
                    bytes: size.bytes(),
                });
            }
        }
        self.lanes[lane] = select;
        Ok(())
    }

    /// Assembles the M-bit input vector for a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownContainer`] if a selected container is missing.
    pub fn assemble(&self, phv: &Phv) -> Result<BitField, EvalError> {
        let mut value = 0u64;
        for (lane, sel) in self.lanes.iter().enumerate() {
            if let Some(sel) = sel {
                let byte = phv.byte(sel.container, sel.byte as usize)?;
                value |= u64::from(byte) << (8 * lane);
            }
        }
        Ok(BitField::from_raw(value, self.input_lines))
    }
}
