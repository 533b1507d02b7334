//! Match-Action Unit hash and gateway model.
//!
//! This crate implements a behavior-accurate model of two MAU sub-blocks with the following:
//! 1. **Hash:** Input crossbar, GF(2) Galois matrices, seeds, and parity-group reduction.
//! 2. **Gateway:** Priority-ordered ternary predicate tables that can bypass a full lookup.
//! 3. **Stage:** Versioned, immutable configuration snapshots with atomic two-phase commit.
//! 4. **PHV:** Packet header vector containers and a fixed-offset field extractor.
//! 5. **Loading:** JSON stage descriptions, shape configuration, and evaluation statistics.

/// Common types (bit fields, identifiers, errors).
pub mod common;
/// Stage dimensions (defaults, serde structures).
pub mod config;
/// Gateway tables (entries, input selection, evaluation).
pub mod gateway;
/// Hash generation (crossbar, matrix, seed, parity groups, engine).
pub mod hash;
/// JSON stage descriptions and their conversion into configuration writes.
pub mod loader;
/// Packet header vector and field extraction.
pub mod phv;
/// Stage configuration snapshots, transactions, and the shared handle.
pub mod stage;
/// Evaluation statistics collection and reporting.
pub mod stats;

/// Fixed-width bit value used for inputs, masks, seeds, and hash outputs.
pub use crate::common::BitField;
/// Stage dimensions; use `MauShape::default()` or deserialize from JSON.
pub use crate::config::MauShape;
/// Outcome of a gateway evaluation.
pub use crate::gateway::GatewayResult;
/// Packet header vector.
pub use crate::phv::Phv;
/// Shared stage handle; construct with `Mau::new`.
pub use crate::stage::Mau;
