//! Seed mixing.
//!
//! XORing a per-unit constant into the matrix output turns the linear map into an affine
//! one, so units with identical matrices still produce distinct hashes.

use crate::common::{BitField, EvalError};

/// Returns `hash ^ seed`.
///
/// # Errors
///
/// Returns [`EvalError::ConfigMismatch`] if the widths differ.
#[inline]
pub fn apply(hash: BitField, seed: BitField) -> Result<BitField, EvalError> {
    if hash.width() != seed.width() {
        return Err(EvalError::ConfigMismatch {
            expected: seed.width(),
            got: hash.width(),
        });
    }
    Ok(hash ^ seed)
}
