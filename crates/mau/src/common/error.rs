//! Configuration and evaluation error definitions.
//!
//! This module defines the error taxonomy of the model. It provides:
//! 1. **Configuration Errors:** Shape, range, and width violations, reported when a write
//!    is committed and never deferred to packet evaluation.
//! 2. **Evaluation Errors:** Width mismatches and unknown identifiers at evaluation time.
//! 3. **Bit Errors:** Values that do not fit their declared width.
//!
//! A gateway miss is an ordinary result and is not represented here.

use thiserror::Error;

use super::ids::{GatewayId, HashGroupId, UnitId};

/// A value or index does not fit a `BitField` width.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BitsError {
    /// Requested width exceeds 64 bits.
    #[error("width {0} exceeds the 64-bit maximum")]
    WidthTooLarge(usize),
    /// Value has bits set at or above the declared width.
    #[error("value {value:#x} does not fit in {width} bits")]
    ValueTooWide {
        /// Offending value.
        value: u64,
        /// Declared width.
        width: usize,
    },
    /// Bit index is not below the width.
    #[error("bit {index} out of range for a {width}-bit field")]
    BitOutOfRange {
        /// Offending index.
        index: usize,
        /// Field width.
        width: usize,
    },
}

/// A configuration write was rejected.
///
/// Configuration errors fail the whole transaction they belong to; the published
/// snapshot is left untouched.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Hash unit index beyond the configured bank.
    #[error("{unit} out of range ({count} units)")]
    UnitOutOfRange {
        /// Offending unit.
        unit: UnitId,
        /// Number of units in the stage.
        count: usize,
    },
    /// Hash group index beyond the configured bank.
    #[error("{group} out of range ({count} groups)")]
    GroupOutOfRange {
        /// Offending group.
        group: HashGroupId,
        /// Number of groups in the stage.
        count: usize,
    },
    /// Gateway row or table slot beyond the configured array.
    #[error("{gateway} out of range ({rows} rows x {tables} tables)")]
    GatewayOutOfRange {
        /// Offending gateway.
        gateway: GatewayId,
        /// Number of rows.
        rows: usize,
        /// Tables per row.
        tables: usize,
    },
    /// Gateway entry index beyond the table depth.
    #[error("entry {index} out of range for {gateway} ({count} entries)")]
    EntryOutOfRange {
        /// Owning gateway.
        gateway: GatewayId,
        /// Offending entry index.
        index: usize,
        /// Table depth.
        count: usize,
    },
    /// Version tag with bits set above the four packet versions.
    #[error("version tag {tag:#x} for entry {index} of {gateway} exceeds 0xf")]
    VersionTagOutOfRange {
        /// Owning gateway.
        gateway: GatewayId,
        /// Entry index.
        index: usize,
        /// Offending tag.
        tag: u8,
    },
    /// Matrix row (input line) beyond the unit's input width.
    #[error("row {row} out of range for {unit} ({rows} input lines)")]
    RowOutOfRange {
        /// Owning unit.
        unit: UnitId,
        /// Offending row.
        row: usize,
        /// Input lines.
        rows: usize,
    },
    /// Matrix column (output bit) beyond the hash width.
    #[error("column {col} out of range for {unit} ({cols} output bits)")]
    ColumnOutOfRange {
        /// Owning unit.
        unit: UnitId,
        /// Offending column.
        col: usize,
        /// Hash width.
        cols: usize,
    },
    /// Bulk matrix load with the wrong number of rows.
    #[error("matrix for {unit} has {rows} rows, expected {expected}")]
    MatrixShape {
        /// Owning unit.
        unit: UnitId,
        /// Rows supplied.
        rows: usize,
        /// Rows required.
        expected: usize,
    },
    /// A value's width does not match the slot it is written to.
    #[error("{what} width mismatch: expected {expected}, got {got}")]
    WidthMismatch {
        /// What was being written.
        what: &'static str,
        /// Required width.
        expected: usize,
        /// Supplied width.
        got: usize,
    },
    /// Parity bit index beyond the hash width.
    #[error("parity bit {bit} out of range for {group} (max {max})")]
    ParityBitOutOfRange {
        /// Owning group.
        group: HashGroupId,
        /// Offending bit.
        bit: usize,
        /// Maximum number of parity bits.
        max: usize,
    },
    /// Crossbar byte lane beyond the unit's input width.
    #[error("crossbar lane {lane} out of range for {unit} ({lanes} lanes)")]
    LaneOutOfRange {
        /// Owning unit.
        unit: UnitId,
        /// Offending lane.
        lane: usize,
        /// Lanes available.
        lanes: usize,
    },
    /// PHV container index does not exist.
    #[error("PHV container {0} does not exist")]
    ContainerOutOfRange(u16),
    /// Byte index beyond the container size.
    #[error("byte {byte} out of range for PHV container {container} ({bytes} bytes)")]
    ByteOutOfRange {
        /// Container index.
        container: u16,
        /// Offending byte.
        byte: usize,
        /// Bytes in the container.
        bytes: usize,
    },
    /// Input slice reaches past the end of its source.
    #[error("slice [{shift}, {shift}+{width}) exceeds a {source_width}-bit source")]
    SliceOutOfRange {
        /// First bit of the slice.
        shift: usize,
        /// Slice width.
        width: usize,
        /// Width of the source.
        source_width: usize,
    },
    /// Gateway inputs combine to more than 64 bits.
    #[error("{gateway} inputs are {width} bits wide (max 64)")]
    GatewayInputTooWide {
        /// Owning gateway.
        gateway: GatewayId,
        /// Combined width.
        width: usize,
    },
    /// A stage dimension is outside what the model supports.
    #[error("stage shape field `{field}` = {value} (allowed 1..={max})")]
    Shape {
        /// Field name.
        field: &'static str,
        /// Supplied value.
        value: usize,
        /// Largest accepted value.
        max: usize,
    },
    /// Underlying bit-width violation.
    #[error(transparent)]
    Bits(#[from] BitsError),
}

/// Packet evaluation failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Input width differs from the configured width of the consuming block.
    #[error("configuration mismatch: expected {expected}-bit input, got {got} bits")]
    ConfigMismatch {
        /// Configured width.
        expected: usize,
        /// Supplied width.
        got: usize,
    },
    /// No such hash unit.
    #[error("unknown {0}")]
    UnknownUnit(UnitId),
    /// No such hash group.
    #[error("unknown {0}")]
    UnknownGroup(HashGroupId),
    /// No such gateway table.
    #[error("unknown {0}")]
    UnknownGateway(GatewayId),
    /// No such PHV container.
    #[error("unknown PHV container {0}")]
    UnknownContainer(u16),
    /// Packet ends before an extraction completes.
    #[error("packet of {len} bytes too short for {needed}-byte field at offset {offset}")]
    PacketTooShort {
        /// Byte offset of the extraction.
        offset: usize,
        /// Bytes required.
        needed: usize,
        /// Packet length.
        len: usize,
    },
}

/// A transaction was rejected; nothing it contained was applied.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("configuration write {index} rejected: {source}")]
pub struct CommitError {
    /// Index of the failing write; equal to the transaction length when the final
    /// whole-stage validation failed.
    pub index: usize,
    /// Underlying cause.
    #[source]
    pub source: ConfigError,
}
