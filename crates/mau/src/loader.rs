//! JSON stage descriptions.
//!
//! A `StageSpec` is the on-disk form of a stage configuration: shape, PHV extraction, hash
//! units, hash groups, and gateways. Loading does not touch a live stage; it produces a
//! `ConfigTransaction` that is committed like any other.
//!
//! Numeric values may be JSON numbers or strings in hex (`"0x602a8"`), binary
//! (`"0b1010"`), or decimal, with optional `_` separators.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use thiserror::Error;

use crate::common::{BitField, CommitError, ConfigError, GatewayId, HashGroupId, UnitId};
use crate::config::MauShape;
use crate::gateway::{GatewayInput, Thread, VersionTag};
use crate::hash::ByteSelect;
use crate::phv::{Extraction, PhvContainer, PhvExtractor};
use crate::stage::{ConfigTransaction, Mau};

/// Failure to load a stage description.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read stage description: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON is malformed or does not match the schema.
    #[error("invalid stage description: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is out of range for the stage.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The resulting transaction was rejected.
    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// A `u64` written as a JSON number or a hex/binary/decimal string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hex(pub u64);

fn parse_number(text: &str) -> Option<u64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        u64::from_str_radix(bin, 2).ok()
    } else {
        cleaned.parse().ok()
    }
}

struct HexVisitor;

impl Visitor<'_> for HexVisitor {
    type Value = Hex;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an unsigned integer or a hex/binary/decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Hex, E> {
        Ok(Hex(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Hex, E> {
        u64::try_from(v)
            .map(Hex)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Hex, E> {
        parse_number(v)
            .map(Hex)
            .ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Hex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HexVisitor)
    }
}

/// One crossbar lane selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct XbarLaneSpec {
    /// Byte lane of the unit.
    pub lane: usize,
    /// Source container.
    pub container: PhvContainer,
    /// Byte within the container.
    #[serde(default)]
    pub byte: u8,
}

/// Configuration of one hash unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashUnitSpec {
    /// Target unit.
    pub unit: UnitId,
    /// Row masks, one per input line; omitted leaves the matrix unchanged.
    #[serde(default)]
    pub matrix: Option<Vec<Hex>>,
    /// Seed; omitted leaves the seed unchanged.
    #[serde(default)]
    pub seed: Option<Hex>,
    /// Crossbar lanes to select.
    #[serde(default)]
    pub xbar: Vec<XbarLaneSpec>,
}

/// Configuration of one hash group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashGroupSpec {
    /// Target group.
    pub group: HashGroupId,
    /// Unit to bind; omitted keeps the current binding.
    #[serde(default)]
    pub unit: Option<UnitId>,
    /// Parity masks for output bits 0, 1, ...
    #[serde(default)]
    pub masks: Vec<Hex>,
}

/// Payload returned by a gateway entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PayloadSpec {
    /// Payload value.
    pub value: Hex,
    /// Payload width in bits.
    pub width: usize,
}

/// One gateway entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayEntrySpec {
    /// Entry index.
    pub index: usize,
    /// Compare value.
    pub value: Hex,
    /// Don't-care mask.
    #[serde(default)]
    pub dont_care: Hex,
    /// Entry validity.
    #[serde(default = "GatewayEntrySpec::default_valid")]
    pub valid: bool,
    /// Accepted versions as a 4-bit set.
    #[serde(default)]
    pub version: VersionTag,
    /// Payload on hit.
    #[serde(default)]
    pub payload: Option<PayloadSpec>,
}

impl GatewayEntrySpec {
    /// Entries are valid unless stated otherwise.
    const fn default_valid() -> bool {
        true
    }
}

/// Configuration of one gateway table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySpec {
    /// Logical row.
    pub row: u8,
    /// Table slot within the row.
    pub table: u8,
    /// Low input.
    #[serde(default)]
    pub input0: GatewayInput,
    /// High input.
    #[serde(default)]
    pub input1: GatewayInput,
    /// Thread the table evaluates.
    #[serde(default)]
    pub thread: Thread,
    /// Entries to write.
    #[serde(default)]
    pub entries: Vec<GatewayEntrySpec>,
}

/// Complete stage description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageSpec {
    /// Stage dimensions.
    #[serde(default)]
    pub shape: MauShape,
    /// PHV extraction applied to packets.
    #[serde(default)]
    pub extract: Vec<Extraction>,
    /// Hash units.
    #[serde(default)]
    pub hash_units: Vec<HashUnitSpec>,
    /// Hash groups.
    #[serde(default)]
    pub hash_groups: Vec<HashGroupSpec>,
    /// Gateway tables.
    #[serde(default)]
    pub gateways: Vec<GatewaySpec>,
}

impl StageSpec {
    /// Parses a description from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] for malformed input.
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a description from a file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] or [`LoadError::Json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// PHV extractor described by `extract`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ContainerOutOfRange`] for a nonexistent container.
    pub fn extractor(&self) -> Result<PhvExtractor, ConfigError> {
        PhvExtractor::new(self.extract.clone())
    }

    /// Lowers the description into configuration writes.
    ///
    /// Writes are ordered units, groups, then gateways, so the final validation sees
    /// every group width the gateways refer to.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Bits`] for a payload value that does not fit its width.
    pub fn transaction(&self) -> Result<ConfigTransaction, ConfigError> {
        let mut tx = ConfigTransaction::new();
        for u in &self.hash_units {
            if let Some(rows) = &u.matrix {
                tx.load_matrix(u.unit, rows.iter().map(|r| r.0).collect());
            }
            if let Some(seed) = u.seed {
                tx.set_seed(u.unit, seed.0);
            }
            for lane in &u.xbar {
                tx.set_xbar_byte(
                    u.unit,
                    lane.lane,
                    Some(ByteSelect {
                        container: lane.container,
                        byte: lane.byte,
                    }),
                );
            }
        }
        for g in &self.hash_groups {
            if let Some(unit) = g.unit {
                tx.bind_hash_group(g.group, unit);
            }
            for (bit, mask) in g.masks.iter().enumerate() {
                tx.set_parity_mask(g.group, bit, mask.0);
            }
        }
        for gw in &self.gateways {
            let id = GatewayId::new(gw.row, gw.table);
            tx.set_gateway_inputs(id, gw.input0, gw.input1);
            tx.set_gateway_thread(id, gw.thread);
            for e in &gw.entries {
                tx.set_gateway_entry(id, e.index, e.value.0, e.dont_care.0, e.valid, e.version);
                if let Some(p) = e.payload {
                    tx.set_gateway_payload(id, e.index, Some(BitField::new(p.value.0, p.width)?));
                }
            }
        }
        Ok(tx)
    }

    /// Builds a stage handle with this description committed as epoch 1.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Config`] or [`LoadError::Commit`].
    pub fn build(&self) -> Result<Mau, LoadError> {
        let mau = Mau::new(self.shape)?;
        let _ = mau.commit(&self.transaction()?)?;
        Ok(mau)
    }
}
