//! Gateway predicate tables.
//!
//! This module implements the gateway tables of a stage. It provides:
//! 1. **Entries:** Compare value, don't-care mask, validity, version set, and payload.
//! 2. **Inputs:** Live word assembly from PHV container slices and hash group slices.
//! 3. **Evaluation:** Strict ascending-priority ternary scan; first enabled match wins.
//! 4. **Array:** The row x table grid of gateways in one stage.

/// Entries, versions, and thread context.
pub mod entry;
/// Input selection.
pub mod input;
/// Table configuration and evaluation.
pub mod table;

pub use entry::{GatewayEntry, Thread, ThreadContext, VersionTag};
pub use input::GatewayInput;
pub use table::{GatewayResult, GatewayTableConfig, evaluate};

use crate::common::{ConfigError, GatewayId};
use crate::config::MauShape;
use crate::hash::HashEngine;

/// Every gateway table of a stage, indexed by row then table slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayArray {
    rows: usize,
    tables_per_row: usize,
    tables: Vec<GatewayTableConfig>,
}

impl GatewayArray {
    /// Creates an array of empty tables sized by `shape`.
    pub fn new(shape: &MauShape) -> Self {
        let tables = (0..shape.gateway_rows)
            .flat_map(|row| {
                (0..shape.gateway_tables_per_row).map(move |table| {
                    GatewayTableConfig::new(
                        GatewayId::new(row as u8, table as u8),
                        shape.gateway_entries,
                    )
                })
            })
            .collect();
        Self {
            rows: shape.gateway_rows,
            tables_per_row: shape.gateway_tables_per_row,
            tables,
        }
    }

    fn slot(&self, id: GatewayId) -> Option<usize> {
        let (row, table) = (id.row as usize, id.table as usize);
        (row < self.rows && table < self.tables_per_row).then_some(row * self.tables_per_row + table)
    }

    /// Looks up a table.
    pub fn get(&self, id: GatewayId) -> Option<&GatewayTableConfig> {
        self.slot(id).map(|s| &self.tables[s])
    }

    /// Looks up a table for modification.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GatewayOutOfRange`].
    pub fn get_mut(&mut self, id: GatewayId) -> Result<&mut GatewayTableConfig, ConfigError> {
        let slot = self.slot(id).ok_or(ConfigError::GatewayOutOfRange {
            gateway: id,
            rows: self.rows,
            tables: self.tables_per_row,
        })?;
        Ok(&mut self.tables[slot])
    }

    /// All tables in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &GatewayTableConfig> {
        self.tables.iter()
    }

    /// Validates and normalizes every table against the hash bank.
    ///
    /// # Errors
    ///
    /// Returns the first table's [`ConfigError`].
    pub fn normalize(&mut self, hash: &HashEngine) -> Result<(), ConfigError> {
        self.tables.iter_mut().try_for_each(|t| t.normalize(hash))
    }
}
