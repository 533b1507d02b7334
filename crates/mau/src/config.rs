//! Stage dimensions for the MAU model.
//!
//! This module defines the shape of one match-action stage. It provides:
//! 1. **Defaults:** Baseline hardware dimensions (hash bank, Galois matrix, gateway array).
//! 2. **Structures:** `MauShape`, deserializable from JSON with per-field defaults.
//! 3. **Validation:** Limits that keep every derived width within a 64-bit `BitField`.
//!
//! Shapes are supplied as part of a JSON stage description, or use `MauShape::default()`.

use serde::Deserialize;

use crate::common::{ConfigError, MAX_WIDTH};

/// Default dimension constants for a stage.
mod defaults {
    /// Number of independent hash units (Galois matrices).
    pub const HASH_UNITS: usize = 16;

    /// Input lines per hash unit (8 crossbar bytes).
    pub const INPUT_LINES: usize = 64;

    /// Output width of every hash unit.
    pub const HASH_WIDTH: usize = 52;

    /// Number of hash groups (parity mask lists).
    pub const HASH_GROUPS: usize = 8;

    /// Logical rows carrying gateway tables.
    pub const GATEWAY_ROWS: usize = 8;

    /// Gateway tables per logical row.
    pub const GATEWAY_TABLES_PER_ROW: usize = 2;

    /// Entries per gateway table.
    pub const GATEWAY_ENTRIES: usize = 4;

    /// Largest gateway depth the model accepts.
    pub const MAX_GATEWAY_ENTRIES: usize = 16;

    /// Largest bank sizes the `u8` identifiers can address.
    pub const MAX_BANK: usize = 256;
}

/// Dimensions of one match-action stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MauShape {
    /// Number of hash units
    #[serde(default = "MauShape::default_hash_units")]
    pub hash_units: usize,

    /// Input lines (matrix rows) per hash unit
    #[serde(default = "MauShape::default_input_lines")]
    pub input_lines: usize,

    /// Hash output width (matrix columns)
    #[serde(default = "MauShape::default_hash_width")]
    pub hash_width: usize,

    /// Number of hash groups
    #[serde(default = "MauShape::default_hash_groups")]
    pub hash_groups: usize,

    /// Logical rows with gateway tables
    #[serde(default = "MauShape::default_gateway_rows")]
    pub gateway_rows: usize,

    /// Gateway tables per row
    #[serde(default = "MauShape::default_gateway_tables")]
    pub gateway_tables_per_row: usize,

    /// Entries per gateway table
    #[serde(default = "MauShape::default_gateway_entries")]
    pub gateway_entries: usize,
}

impl MauShape {
    /// Returns the default number of hash units.
    fn default_hash_units() -> usize {
        defaults::HASH_UNITS
    }

    /// Returns the default number of input lines per unit.
    fn default_input_lines() -> usize {
        defaults::INPUT_LINES
    }

    /// Returns the default hash output width.
    fn default_hash_width() -> usize {
        defaults::HASH_WIDTH
    }

    /// Returns the default number of hash groups.
    fn default_hash_groups() -> usize {
        defaults::HASH_GROUPS
    }

    /// Returns the default number of gateway rows.
    fn default_gateway_rows() -> usize {
        defaults::GATEWAY_ROWS
    }

    /// Returns the default number of gateway tables per row.
    fn default_gateway_tables() -> usize {
        defaults::GATEWAY_TABLES_PER_ROW
    }

    /// Returns the default gateway depth.
    fn default_gateway_entries() -> usize {
        defaults::GATEWAY_ENTRIES
    }

    /// Checks that every dimension is supported.
    ///
    /// Input lines and hash width must fit a 64-bit `BitField`; gateway depth is limited to
    /// 16 entries; banks must be addressable by 8-bit identifiers. A gateway depth of zero
    /// is accepted (such tables always miss).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Shape`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("hash_units", self.hash_units, defaults::MAX_BANK),
            ("input_lines", self.input_lines, MAX_WIDTH),
            ("hash_width", self.hash_width, MAX_WIDTH),
            ("hash_groups", self.hash_groups, defaults::MAX_BANK),
            ("gateway_rows", self.gateway_rows, defaults::MAX_BANK),
            (
                "gateway_tables_per_row",
                self.gateway_tables_per_row,
                defaults::MAX_BANK,
            ),
        ];
        for (field, value, max) in checks {
            if value == 0 || value > max {
                return Err(ConfigError::Shape { field, value, max });
            }
        }
        if self.gateway_entries > defaults::MAX_GATEWAY_ENTRIES {
            return Err(ConfigError::Shape {
                field: "gateway_entries",
                value: self.gateway_entries,
                max: defaults::MAX_GATEWAY_ENTRIES,
            });
        }
        Ok(())
    }

    /// Number of crossbar byte lanes feeding each hash unit.
    pub const fn xbar_lanes(&self) -> usize {
        self.input_lines.div_ceil(8)
    }

    /// Total number of gateway tables in the stage.
    pub const fn gateway_count(&self) -> usize {
        self.gateway_rows * self.gateway_tables_per_row
    }
}

impl Default for MauShape {
    /// Creates the default stage shape.
    ///
    /// Sixteen 64x52 hash units, eight hash groups, and eight rows of two four-entry
    /// gateway tables.
    fn default() -> Self {
        Self {
            hash_units: defaults::HASH_UNITS,
            input_lines: defaults::INPUT_LINES,
            hash_width: defaults::HASH_WIDTH,
            hash_groups: defaults::HASH_GROUPS,
            gateway_rows: defaults::GATEWAY_ROWS,
            gateway_tables_per_row: defaults::GATEWAY_TABLES_PER_ROW,
            gateway_entries: defaults::GATEWAY_ENTRIES,
        }
    }
}
