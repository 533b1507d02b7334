//! Galois field hash matrix.
//!
//! An M x N binary coefficient matrix defining a GF(2)-linear map from M input lines to
//! N hash bits. Row `i` holds the output bits toggled when input line `i` is set, so the
//! product is the XOR of the rows selected by the input:
//!
//! `out[c] = XOR over i of (input[i] AND matrix[i][c])`
//!
//! The map is linear: `compute(a ^ b) == compute(a) ^ compute(b)` and `compute(0) == 0`.

use crate::common::{BitField, BitsError, ConfigError, EvalError, MAX_WIDTH, UnitId};

/// Coefficient matrix of one hash unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaloisHashMatrix {
    unit: UnitId,
    /// One N-bit mask per input line.
    rows: Vec<u64>,
    cols: usize,
}

impl GaloisHashMatrix {
    /// Creates an all-zero matrix.
    ///
    /// # Arguments
    ///
    /// * `unit` - Owning hash unit (used in error reports).
    /// * `input_lines` - Number of rows (M), at most 64.
    /// * `output_width` - Number of columns (N), at most 64.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Bits`] if either dimension exceeds 64.
    pub fn new(unit: UnitId, input_lines: usize, output_width: usize) -> Result<Self, ConfigError> {
        for dim in [input_lines, output_width] {
            if dim > MAX_WIDTH {
                return Err(BitsError::WidthTooLarge(dim).into());
            }
        }
        Ok(Self {
            unit,
            rows: vec![0; input_lines],
            cols: output_width,
        })
    }

    /// Number of input lines (rows).
    pub fn input_lines(&self) -> usize {
        self.rows.len()
    }

    /// Hash output width (columns).
    pub const fn output_width(&self) -> usize {
        self.cols
    }

    fn check_row(&self, row: usize) -> Result<(), ConfigError> {
        if row >= self.rows.len() {
            return Err(ConfigError::RowOutOfRange {
                unit: self.unit,
                row,
                rows: self.rows.len(),
            });
        }
        Ok(())
    }

    /// Sets one coefficient.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RowOutOfRange`] or [`ConfigError::ColumnOutOfRange`].
    pub fn set_coefficient(&mut self, row: usize, col: usize, bit: bool) -> Result<(), ConfigError> {
        self.check_row(row)?;
        if col >= self.cols {
            return Err(ConfigError::ColumnOutOfRange {
                unit: self.unit,
                col,
                cols: self.cols,
            });
        }
        if bit {
            self.rows[row] |= 1 << col;
        } else {
            self.rows[row] &= !(1 << col);
        }
        Ok(())
    }

    /// Reads one coefficient; out-of-range positions read as zero.
    pub fn coefficient(&self, row: usize, col: usize) -> bool {
        col < self.cols && self.rows.get(row).is_some_and(|r| (r >> col) & 1 == 1)
    }

    /// Returns row `row` as an N-bit field.
    pub fn row(&self, row: usize) -> Option<BitField> {
        self.rows
            .get(row)
            .map(|r| BitField::from_raw(*r, self.cols))
    }

    /// Replaces every row at once.
    ///
    /// The row count must equal the number of input lines and no row may have bits at or
    /// above the output width; nothing is truncated. On error the matrix is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MatrixShape`] on a row-count mismatch and
    /// [`ConfigError::Bits`] for a row wider than the output.
    pub fn load_rows(&mut self, rows: &[u64]) -> Result<(), ConfigError> {
        if rows.len() != self.rows.len() {
            return Err(ConfigError::MatrixShape {
                unit: self.unit,
                rows: rows.len(),
                expected: self.rows.len(),
            });
        }
        for r in rows {
            let _ = BitField::new(*r, self.cols)?;
        }
        self.rows.copy_from_slice(rows);
        Ok(())
    }

    /// Multiplies an input vector by the matrix over GF(2).
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ConfigMismatch`] if `input` is not exactly M bits wide.
    #[inline]
    pub fn compute(&self, input: BitField) -> Result<BitField, EvalError> {
        if input.width() != self.rows.len() {
            return Err(EvalError::ConfigMismatch {
                expected: self.rows.len(),
                got: input.width(),
            });
        }
        let out = input.ones().fold(0u64, |acc, line| acc ^ self.rows[line]);
        Ok(BitField::from_raw(out, self.cols))
    }
}
