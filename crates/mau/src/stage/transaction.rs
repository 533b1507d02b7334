//! Configuration writes and two-phase transactions.
//!
//! Writes are accumulated as plain intents and only touch a configuration when the
//! transaction is applied. Application happens on a private copy, so a rejected write
//! never leaves a partially applied configuration visible.

use crate::common::{BitField, GatewayId, HashGroupId, UnitId};
use crate::gateway::{GatewayInput, Thread, VersionTag};
use crate::hash::ByteSelect;

/// One logical configuration write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWrite {
    /// Set one Galois matrix coefficient.
    MatrixCoefficient {
        /// Target unit.
        unit: UnitId,
        /// Input line.
        row: usize,
        /// Output bit.
        col: usize,
        /// Coefficient.
        bit: bool,
    },
    /// Replace a whole matrix, one N-bit row mask per input line.
    Matrix {
        /// Target unit.
        unit: UnitId,
        /// Row masks.
        rows: Vec<u64>,
    },
    /// Set a unit's seed.
    Seed {
        /// Target unit.
        unit: UnitId,
        /// Seed value (N bits).
        value: u64,
    },
    /// Select or clear a crossbar byte lane.
    XbarByte {
        /// Target unit.
        unit: UnitId,
        /// Byte lane.
        lane: usize,
        /// Source, or `None` to clear.
        select: Option<ByteSelect>,
    },
    /// Set the parity mask of one group output bit.
    ParityMask {
        /// Target group.
        group: HashGroupId,
        /// Output bit.
        bit: usize,
        /// Mask over the N hash bits.
        mask: u64,
    },
    /// Bind a group to a unit.
    BindHashGroup {
        /// Target group.
        group: HashGroupId,
        /// Source unit.
        unit: UnitId,
    },
    /// Write a gateway entry's compare fields.
    GatewayEntry {
        /// Target table.
        gateway: GatewayId,
        /// Entry index.
        index: usize,
        /// Compare value.
        value: u64,
        /// Don't-care mask.
        dont_care: u64,
        /// Entry validity.
        valid: bool,
        /// Accepted packet versions.
        version: VersionTag,
    },
    /// Set or clear a gateway entry's payload.
    GatewayPayload {
        /// Target table.
        gateway: GatewayId,
        /// Entry index.
        index: usize,
        /// Payload returned on a hit.
        payload: Option<BitField>,
    },
    /// Select a gateway's inputs.
    GatewayInputs {
        /// Target table.
        gateway: GatewayId,
        /// Low input.
        input0: GatewayInput,
        /// High input.
        input1: GatewayInput,
    },
    /// Set the thread a gateway evaluates.
    GatewayThread {
        /// Target table.
        gateway: GatewayId,
        /// Thread.
        thread: Thread,
    },
}

/// An ordered batch of configuration writes, committed all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigTransaction {
    writes: Vec<ConfigWrite>,
}

impl ConfigTransaction {
    /// Creates an empty transaction.
    pub const fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Queued writes, in order.
    pub fn writes(&self) -> &[ConfigWrite] {
        &self.writes
    }

    /// Number of queued writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Queues an arbitrary write.
    pub fn push(&mut self, write: ConfigWrite) {
        self.writes.push(write);
    }

    /// Queues a coefficient write.
    pub fn set_matrix_coefficient(&mut self, unit: UnitId, row: usize, col: usize, bit: bool) {
        self.push(ConfigWrite::MatrixCoefficient {
            unit,
            row,
            col,
            bit,
        });
    }

    /// Queues a whole-matrix write.
    pub fn load_matrix(&mut self, unit: UnitId, rows: Vec<u64>) {
        self.push(ConfigWrite::Matrix { unit, rows });
    }

    /// Queues a seed write.
    pub fn set_seed(&mut self, unit: UnitId, value: u64) {
        self.push(ConfigWrite::Seed { unit, value });
    }

    /// Queues a crossbar lane write.
    pub fn set_xbar_byte(&mut self, unit: UnitId, lane: usize, select: Option<ByteSelect>) {
        self.push(ConfigWrite::XbarByte { unit, lane, select });
    }

    /// Queues a parity mask write.
    pub fn set_parity_mask(&mut self, group: HashGroupId, bit: usize, mask: u64) {
        self.push(ConfigWrite::ParityMask { group, bit, mask });
    }

    /// Queues a group binding.
    pub fn bind_hash_group(&mut self, group: HashGroupId, unit: UnitId) {
        self.push(ConfigWrite::BindHashGroup { group, unit });
    }

    /// Queues a gateway entry write.
    pub fn set_gateway_entry(
        &mut self,
        gateway: GatewayId,
        index: usize,
        value: u64,
        dont_care: u64,
        valid: bool,
        version: VersionTag,
    ) {
        self.push(ConfigWrite::GatewayEntry {
            gateway,
            index,
            value,
            dont_care,
            valid,
            version,
        });
    }

    /// Queues a gateway payload write.
    pub fn set_gateway_payload(&mut self, gateway: GatewayId, index: usize, payload: Option<BitField>) {
        self.push(ConfigWrite::GatewayPayload {
            gateway,
            index,
            payload,
        });
    }

    /// Queues a gateway input selection.
    pub fn set_gateway_inputs(&mut self, gateway: GatewayId, input0: GatewayInput, input1: GatewayInput) {
        self.push(ConfigWrite::GatewayInputs {
            gateway,
            input0,
            input1,
        });
    }

    /// Queues a gateway thread selection.
    pub fn set_gateway_thread(&mut self, gateway: GatewayId, thread: Thread) {
        self.push(ConfigWrite::GatewayThread { gateway, thread });
    }
}

impl Extend<ConfigWrite> for ConfigTransaction {
    fn extend<I: IntoIterator<Item = ConfigWrite>>(&mut self, iter: I) {
        self.writes.extend(iter);
    }
}

impl FromIterator<ConfigWrite> for ConfigTransaction {
    fn from_iter<I: IntoIterator<Item = ConfigWrite>>(iter: I) -> Self {
        Self {
            writes: iter.into_iter().collect(),
        }
    }
}
