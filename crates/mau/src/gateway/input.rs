//! Gateway input selection.
//!
//! A gateway compares a live word assembled from two inputs: input 0 fills the low bits
//! and input 1 sits directly above it. Each input is a bit slice of a PHV container or of
//! a hash group value, or unused (zero bits wide).

use serde::Deserialize;

use crate::common::{BitField, ConfigError, EvalError, HashGroupId};
use crate::hash::{HashEngine, HashGroupSource};
use crate::phv::{Phv, PhvContainer};

/// Source of one gateway input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum GatewayInput {
    /// Contributes no bits.
    #[default]
    Unused,
    /// Bits `shift..shift+width` of a PHV container.
    Phv {
        /// Source container.
        container: PhvContainer,
        /// First bit taken.
        #[serde(default)]
        shift: u8,
        /// Number of bits taken.
        width: u8,
    },
    /// Bits `shift..shift+width` of a hash group value.
    HashGroup {
        /// Source group.
        group: HashGroupId,
        /// First bit taken.
        #[serde(default)]
        shift: u8,
        /// Number of bits taken.
        width: u8,
    },
}

impl GatewayInput {
    /// Number of bits this input contributes.
    pub const fn width(&self) -> usize {
        match self {
            Self::Unused => 0,
            Self::Phv { width, .. } | Self::HashGroup { width, .. } => *width as usize,
        }
    }

    /// Checks that the slice lies inside its source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SliceOutOfRange`], [`ConfigError::ContainerOutOfRange`], or
    /// [`ConfigError::GroupOutOfRange`].
    pub fn validate(&self, hash: &HashEngine) -> Result<(), ConfigError> {
        let (shift, width, source_width) = match *self {
            Self::Unused => return Ok(()),
            Self::Phv {
                container,
                shift,
                width,
            } => (shift, width, container.checked_size()?.bits()),
            Self::HashGroup {
                group,
                shift,
                width,
            } => {
                let source_width =
                    hash.group_width(group)
                        .ok_or(ConfigError::GroupOutOfRange {
                            group,
                            count: hash.groups().len(),
                        })?;
                (shift, width, source_width)
            }
        };
        if shift as usize + width as usize > source_width {
            return Err(ConfigError::SliceOutOfRange {
                shift: shift as usize,
                width: width as usize,
                source_width,
            });
        }
        Ok(())
    }

    /// Reads the input's bits for a packet.
    ///
    /// # Errors
    ///
    /// Propagates PHV and hash errors; a slice past its source yields
    /// [`EvalError::ConfigMismatch`].
    pub fn resolve<S>(&self, phv: &Phv, hash: &S) -> Result<BitField, EvalError>
    where
        S: HashGroupSource + ?Sized,
    {
        let (source, shift, width) = match *self {
            Self::Unused => return Ok(BitField::from_raw(0, 0)),
            Self::Phv {
                container,
                shift,
                width,
            } => (phv.field(container)?, shift, width),
            Self::HashGroup {
                group,
                shift,
                width,
            } => (hash.hash_group(group, phv)?, shift, width),
        };
        source
            .slice(shift as usize, width as usize)
            .map_err(|_| EvalError::ConfigMismatch {
                expected: shift as usize + width as usize,
                got: source.width(),
            })
    }
}
