//! Common utilities and types used throughout the MAU model.
//!
//! This module provides fundamental building blocks that are shared across all components
//! of the model. It includes:
//! 1. **Bit Fields:** A fixed-width value type for coefficients, masks, seeds, and hashes.
//! 2. **Identifiers:** Strong types for hash units, hash groups, gateways, and PHV containers.
//! 3. **Error Handling:** Configuration, evaluation, and bit-width error types.

/// Fixed-width bit value.
pub mod bits;

/// Error types for configuration and evaluation.
pub mod error;

/// Identifier newtypes.
pub mod ids;

pub use bits::{BitField, MAX_WIDTH};
pub use error::{BitsError, CommitError, ConfigError, EvalError};
pub use ids::{GatewayId, HashGroupId, UnitId};
