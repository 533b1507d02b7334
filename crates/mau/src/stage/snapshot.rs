//! Immutable stage configuration snapshot.
//!
//! A `StageConfig` is the complete hash and gateway configuration of one stage at one
//! epoch. Snapshots are never mutated once published; applying a transaction produces
//! a new snapshot with the next epoch.

use super::transaction::{ConfigTransaction, ConfigWrite};
use crate::common::{
    BitField, CommitError, ConfigError, EvalError, GatewayId, HashGroupId, UnitId,
};
use crate::config::MauShape;
use crate::gateway::{GatewayArray, GatewayResult, ThreadContext};
use crate::hash::HashEngine;
use crate::phv::Phv;

/// Hash and gateway configuration of one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    shape: MauShape,
    epoch: u64,
    hash: HashEngine,
    gateways: GatewayArray,
}

impl StageConfig {
    /// Creates the epoch-0 configuration: zero matrices and seeds, unselected crossbars,
    /// mask-less groups, and gateways with unused inputs and invalid entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Shape`] if the shape is unsupported.
    pub fn new(shape: MauShape) -> Result<Self, ConfigError> {
        Ok(Self {
            shape,
            epoch: 0,
            hash: HashEngine::new(&shape)?,
            gateways: GatewayArray::new(&shape),
        })
    }

    /// Stage dimensions.
    pub const fn shape(&self) -> &MauShape {
        &self.shape
    }

    /// Number of transactions applied since creation.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Hash units and groups.
    pub const fn hash(&self) -> &HashEngine {
        &self.hash
    }

    /// Gateway tables.
    pub const fn gateways(&self) -> &GatewayArray {
        &self.gateways
    }

    /// Applies a transaction to a copy of this snapshot.
    ///
    /// Every write is applied in order, then every gateway is validated and normalized
    /// against the resulting hash bank. The returned snapshot carries `epoch + 1`.
    ///
    /// # Errors
    ///
    /// Returns a [`CommitError`] naming the first failing write (or `tx.len()` when
    /// final validation fails). `self` is never modified.
    pub fn apply(&self, tx: &ConfigTransaction) -> Result<Self, CommitError> {
        let mut next = self.clone();
        for (index, write) in tx.writes().iter().enumerate() {
            next.apply_write(write)
                .map_err(|source| CommitError { index, source })?;
        }
        next.gateways
            .normalize(&next.hash)
            .map_err(|source| CommitError {
                index: tx.len(),
                source,
            })?;
        next.epoch = self.epoch + 1;
        Ok(next)
    }

    fn apply_write(&mut self, write: &ConfigWrite) -> Result<(), ConfigError> {
        match write {
            ConfigWrite::MatrixCoefficient {
                unit,
                row,
                col,
                bit,
            } => self.hash.set_matrix_coefficient(*unit, *row, *col, *bit),
            ConfigWrite::Matrix { unit, rows } => self.hash.load_matrix(*unit, rows),
            ConfigWrite::Seed { unit, value } => self.hash.set_seed(*unit, *value),
            ConfigWrite::XbarByte { unit, lane, select } => {
                self.hash.set_xbar_byte(*unit, *lane, *select)
            }
            ConfigWrite::ParityMask { group, bit, mask } => {
                self.hash.set_parity_mask(*group, *bit, *mask)
            }
            ConfigWrite::BindHashGroup { group, unit } => self.hash.bind_hash_group(*group, *unit),
            ConfigWrite::GatewayEntry {
                gateway,
                index,
                value,
                dont_care,
                valid,
                version,
            } => self
                .gateways
                .get_mut(*gateway)?
                .set_entry(*index, *value, *dont_care, *valid, *version),
            ConfigWrite::GatewayPayload {
                gateway,
                index,
                payload,
            } => self.gateways.get_mut(*gateway)?.set_payload(*index, *payload),
            ConfigWrite::GatewayInputs {
                gateway,
                input0,
                input1,
            } => {
                self.gateways.get_mut(*gateway)?.set_inputs(*input0, *input1);
                Ok(())
            }
            ConfigWrite::GatewayThread { gateway, thread } => {
                self.gateways.get_mut(*gateway)?.set_thread_mode(*thread);
                Ok(())
            }
        }
    }

    /// Seeded N-bit hash of a unit for a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownUnit`] for an unknown unit.
    pub fn compute_hash(&self, unit: UnitId, phv: &Phv) -> Result<BitField, EvalError> {
        self.hash.compute_hash(unit, phv)
    }

    /// Value of a hash group for a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownGroup`] for an unknown group.
    pub fn compute_hash_group(&self, group: HashGroupId, phv: &Phv) -> Result<BitField, EvalError> {
        self.hash.compute_hash_group(group, phv)
    }

    /// Live comparison word a gateway would see for a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownGateway`] for an unknown table.
    pub fn gateway_live(&self, gateway: GatewayId, phv: &Phv) -> Result<BitField, EvalError> {
        self.gateways
            .get(gateway)
            .ok_or(EvalError::UnknownGateway(gateway))?
            .live(phv, &self.hash)
    }

    /// Evaluates a gateway table for a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownGateway`] for an unknown table.
    pub fn evaluate_gateway(
        &self,
        gateway: GatewayId,
        phv: &Phv,
        ctx: ThreadContext,
    ) -> Result<GatewayResult, EvalError> {
        self.gateways
            .get(gateway)
            .ok_or(EvalError::UnknownGateway(gateway))?
            .evaluate_phv(phv, &self.hash, ctx)
    }
}
