//! Hash generation.
//!
//! This module implements the per-packet hash path of a stage. It provides:
//! 1. **Crossbar:** Byte-lane selection of PHV containers onto hash input lines.
//! 2. **Matrix:** GF(2) vector-matrix multiply by a configurable coefficient matrix.
//! 3. **Seed:** Per-unit affine offset.
//! 4. **Parity:** Masked XOR-reduction carving the wide hash into narrower group values.
//! 5. **Engine:** The unit and group bank tying the pieces together.

/// Hash unit and group bank.
pub mod engine;
/// Galois field coefficient matrix.
pub mod matrix;
/// Parity-group reduction.
pub mod parity;
/// Seed mixing.
pub mod seed;
/// Input crossbar.
pub mod xbar;

pub use engine::{HashEngine, HashGroup, HashGroupSource, HashUnit};
pub use matrix::GaloisHashMatrix;
pub use parity::ParityGroupMask;
pub use xbar::{ByteSelect, InputXbar};
