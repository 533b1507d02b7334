//! Identifier newtypes.
//!
//! Logical identifiers replace raw register addresses. Strong types keep a hash unit index
//! from being passed where a hash group or gateway is expected.

use std::fmt;

use serde::Deserialize;

/// Index of a hash unit (one Galois matrix, seed, and crossbar selection).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct UnitId(pub u8);

/// Index of a hash group (an ordered list of parity masks over one unit's output).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct HashGroupId(pub u8);

/// Location of a gateway table: a logical row and the table slot within that row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct GatewayId {
    /// Logical row.
    pub row: u8,
    /// Table slot within the row.
    pub table: u8,
}

impl UnitId {
    /// Returns the index as `usize`.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl HashGroupId {
    /// Returns the index as `usize`.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl GatewayId {
    /// Creates a gateway identifier.
    pub const fn new(row: u8, table: u8) -> Self {
        Self { row, table }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hash unit {}", self.0)
    }
}

impl fmt::Display for HashGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hash group {}", self.0)
    }
}

impl fmt::Display for GatewayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gateway row {} table {}", self.row, self.table)
    }
}
