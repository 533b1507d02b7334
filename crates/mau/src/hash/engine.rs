//! Hash unit bank.
//!
//! Owns every hash unit (crossbar, Galois matrix, seed) and every hash group (parity mask
//! list over one unit's output) of a stage. Per packet:
//!
//! PHV -> crossbar -> matrix -> seed -> parity masks -> group value
//!
//! Configuration methods validate ranges and widths immediately; evaluation methods are
//! pure functions of the configuration and the PHV.

use tracing::trace;

use super::matrix::GaloisHashMatrix;
use super::parity::ParityGroupMask;
use super::seed;
use super::xbar::{ByteSelect, InputXbar};
use crate::common::{BitField, ConfigError, EvalError, HashGroupId, UnitId};
use crate::config::MauShape;
use crate::phv::Phv;

/// Anything that can produce a hash group value for a packet.
///
/// Gateway input selection reads hash groups through this trait so that it can be driven
/// by the engine or by a stand-in.
pub trait HashGroupSource {
    /// Computes the value of `group` for `phv`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] for an unknown group or a width mismatch.
    fn hash_group(&self, group: HashGroupId, phv: &Phv) -> Result<BitField, EvalError>;
}

/// One hash unit: crossbar selection, coefficient matrix, and seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashUnit {
    id: UnitId,
    xbar: InputXbar,
    matrix: GaloisHashMatrix,
    seed: BitField,
}

impl HashUnit {
    /// Creates a unit with an empty crossbar, zero matrix, and zero seed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Bits`] if a dimension exceeds 64.
    pub fn new(id: UnitId, input_lines: usize, hash_width: usize) -> Result<Self, ConfigError> {
        Ok(Self {
            id,
            xbar: InputXbar::new(id, input_lines),
            matrix: GaloisHashMatrix::new(id, input_lines, hash_width)?,
            seed: BitField::zero(hash_width)?,
        })
    }

    /// Unit identifier.
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Input crossbar.
    pub const fn xbar(&self) -> &InputXbar {
        &self.xbar
    }

    /// Coefficient matrix.
    pub const fn matrix(&self) -> &GaloisHashMatrix {
        &self.matrix
    }

    /// Seed XORed into the matrix output.
    pub const fn seed(&self) -> BitField {
        self.seed
    }

    /// Seeded hash of an already-assembled input vector.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ConfigMismatch`] if `input` is not M bits wide.
    pub fn hash(&self, input: BitField) -> Result<BitField, EvalError> {
        seed::apply(self.matrix.compute(input)?, self.seed)
    }

    /// Seeded hash of a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownContainer`] if the crossbar selects a missing container.
    pub fn hash_phv(&self, phv: &Phv) -> Result<BitField, EvalError> {
        let input = self.xbar.assemble(phv)?;
        let out = self.hash(input)?;
        trace!(unit = self.id.0, input = %input, hash = %out, "hash unit");
        Ok(out)
    }
}

/// A named group value derived from one unit's output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashGroup {
    id: HashGroupId,
    unit: UnitId,
    parity: ParityGroupMask,
}

impl HashGroup {
    /// Group identifier.
    pub const fn id(&self) -> HashGroupId {
        self.id
    }

    /// Unit whose output the group reduces.
    pub const fn unit(&self) -> UnitId {
        self.unit
    }

    /// Parity masks, one per output bit.
    pub const fn parity(&self) -> &ParityGroupMask {
        &self.parity
    }

    /// Output width: the mask count, or the full hash width for a pass-through group.
    pub fn width(&self, hash_width: usize) -> usize {
        if self.parity.is_empty() {
            hash_width
        } else {
            self.parity.len()
        }
    }

    /// Derives the group value from a seeded unit hash.
    ///
    /// A group without masks passes the full hash through.
    pub fn reduce(&self, hash: BitField) -> BitField {
        if self.parity.is_empty() {
            hash
        } else {
            self.parity.value(hash)
        }
    }
}

/// All hash units and groups of a stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashEngine {
    units: Vec<HashUnit>,
    groups: Vec<HashGroup>,
    hash_width: usize,
}

impl HashEngine {
    /// Creates a bank sized by `shape`.
    ///
    /// Group `g` starts bound to unit `g % hash_units` with no masks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Shape`] if the shape is unsupported.
    pub fn new(shape: &MauShape) -> Result<Self, ConfigError> {
        shape.validate()?;
        let units = (0..shape.hash_units)
            .map(|u| HashUnit::new(UnitId(u as u8), shape.input_lines, shape.hash_width))
            .collect::<Result<Vec<_>, _>>()?;
        let groups = (0..shape.hash_groups)
            .map(|g| HashGroup {
                id: HashGroupId(g as u8),
                unit: UnitId((g % shape.hash_units) as u8),
                parity: ParityGroupMask::new(),
            })
            .collect();
        Ok(Self {
            units,
            groups,
            hash_width: shape.hash_width,
        })
    }

    /// Hash output width (N) shared by every unit.
    pub const fn hash_width(&self) -> usize {
        self.hash_width
    }

    /// All units.
    pub fn units(&self) -> &[HashUnit] {
        &self.units
    }

    /// All groups.
    pub fn groups(&self) -> &[HashGroup] {
        &self.groups
    }

    /// Looks up a unit.
    pub fn unit(&self, unit: UnitId) -> Option<&HashUnit> {
        self.units.get(unit.index())
    }

    /// Looks up a group.
    pub fn group(&self, group: HashGroupId) -> Option<&HashGroup> {
        self.groups.get(group.index())
    }

    fn unit_mut(&mut self, unit: UnitId) -> Result<&mut HashUnit, ConfigError> {
        let count = self.units.len();
        self.units
            .get_mut(unit.index())
            .ok_or(ConfigError::UnitOutOfRange { unit, count })
    }

    fn group_mut(&mut self, group: HashGroupId) -> Result<&mut HashGroup, ConfigError> {
        let count = self.groups.len();
        self.groups
            .get_mut(group.index())
            .ok_or(ConfigError::GroupOutOfRange { group, count })
    }

    /// Sets one Galois matrix coefficient.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown unit or an out-of-range row or column.
    pub fn set_matrix_coefficient(
        &mut self,
        unit: UnitId,
        row: usize,
        col: usize,
        bit: bool,
    ) -> Result<(), ConfigError> {
        self.unit_mut(unit)?.matrix.set_coefficient(row, col, bit)
    }

    /// Replaces a unit's whole matrix (one N-bit mask per input line).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MatrixShape`] on a row-count mismatch, or
    /// [`ConfigError::Bits`] for a row wider than N.
    pub fn load_matrix(&mut self, unit: UnitId, rows: &[u64]) -> Result<(), ConfigError> {
        self.unit_mut(unit)?.matrix.load_rows(rows)
    }

    /// Sets a unit's seed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Bits`] if `seed` does not fit N bits.
    pub fn set_seed(&mut self, unit: UnitId, seed: u64) -> Result<(), ConfigError> {
        let seed = BitField::new(seed, self.hash_width)?;
        self.unit_mut(unit)?.seed = seed;
        Ok(())
    }

    /// Selects (or clears) a crossbar byte lane of a unit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown unit, lane, container, or byte.
    pub fn set_xbar_byte(
        &mut self,
        unit: UnitId,
        lane: usize,
        select: Option<ByteSelect>,
    ) -> Result<(), ConfigError> {
        self.unit_mut(unit)?.xbar.set_lane(lane, select)
    }

    /// Sets the parity mask driving output bit `bit` of a group.
    ///
    /// Setting bit `j` of a group with fewer bits grows it; intermediate bits get zero masks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParityBitOutOfRange`] if `bit >= N`, or
    /// [`ConfigError::Bits`] if `mask` does not fit N bits.
    pub fn set_parity_mask(
        &mut self,
        group: HashGroupId,
        bit: usize,
        mask: u64,
    ) -> Result<(), ConfigError> {
        let width = self.hash_width;
        let mask = BitField::new(mask, width)?;
        let g = self.group_mut(group)?;
        if bit >= width {
            return Err(ConfigError::ParityBitOutOfRange {
                group,
                bit,
                max: width,
            });
        }
        g.parity.set(bit, mask);
        Ok(())
    }

    /// Binds a group to the unit whose output it reduces.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown group or unit.
    pub fn bind_hash_group(&mut self, group: HashGroupId, unit: UnitId) -> Result<(), ConfigError> {
        let _ = self.unit_mut(unit)?;
        self.group_mut(group)?.unit = unit;
        Ok(())
    }

    /// Output width of a group, if it exists.
    pub fn group_width(&self, group: HashGroupId) -> Option<usize> {
        self.group(group).map(|g| g.width(self.hash_width))
    }

    /// Seeded N-bit hash of a unit for a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownUnit`] for an unknown unit.
    pub fn compute_hash(&self, unit: UnitId, phv: &Phv) -> Result<BitField, EvalError> {
        self.unit(unit)
            .ok_or(EvalError::UnknownUnit(unit))?
            .hash_phv(phv)
    }

    /// Value of a hash group for a packet.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::UnknownGroup`] for an unknown group.
    pub fn compute_hash_group(&self, group: HashGroupId, phv: &Phv) -> Result<BitField, EvalError> {
        let g = self.group(group).ok_or(EvalError::UnknownGroup(group))?;
        let hash = self.compute_hash(g.unit, phv)?;
        Ok(g.reduce(hash))
    }
}

impl HashGroupSource for HashEngine {
    fn hash_group(&self, group: HashGroupId, phv: &Phv) -> Result<BitField, EvalError> {
        self.compute_hash_group(group, phv)
    }
}
