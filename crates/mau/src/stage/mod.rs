//! Stage configuration store and shared handle.
//!
//! This module owns the configuration lifecycle of one stage. It performs:
//! 1. **Snapshots:** `StageConfig`, an immutable, epoch-numbered configuration.
//! 2. **Transactions:** `ConfigTransaction`, an ordered batch of logical writes.
//! 3. **Publication:** `Mau`, which applies a transaction to a private copy and swaps the
//!    result in atomically, so evaluations always observe one coherent snapshot.
//!
//! Evaluations never hold a lock while computing: they clone the current `Arc` and work
//! on that snapshot even if a newer one is published meanwhile.

/// Immutable configuration snapshot.
pub mod snapshot;
/// Logical writes and transactions.
pub mod transaction;

pub use snapshot::StageConfig;
pub use transaction::{ConfigTransaction, ConfigWrite};

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::common::{BitField, CommitError, ConfigError, EvalError, GatewayId, HashGroupId, UnitId};
use crate::config::MauShape;
use crate::gateway::{GatewayResult, ThreadContext};
use crate::phv::Phv;
use crate::stats::MauStats;

/// Shared handle to one stage's configuration.
///
/// `Mau` is `Send + Sync`: any number of threads may evaluate packets while another
/// commits configuration. Independent instances share nothing, so several chips can be
/// modelled side by side.
#[derive(Debug)]
pub struct Mau {
    /// Currently published snapshot.
    current: RwLock<Arc<StageConfig>>,
    /// Serializes commits so each one builds on the snapshot it replaces.
    writer: Mutex<()>,
    stats: MauStats,
}

impl Mau {
    /// Creates a stage with the epoch-0 configuration for `shape`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Shape`] if the shape is unsupported.
    pub fn new(shape: MauShape) -> Result<Self, ConfigError> {
        Ok(Self::from_snapshot(StageConfig::new(shape)?))
    }

    /// Wraps an existing snapshot.
    pub fn from_snapshot(config: StageConfig) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
            writer: Mutex::new(()),
            stats: MauStats::default(),
        }
    }

    /// Returns the currently published snapshot.
    pub fn snapshot(&self) -> Arc<StageConfig> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Epoch of the currently published snapshot.
    pub fn epoch(&self) -> u64 {
        self.snapshot().epoch()
    }

    /// Activity counters.
    pub const fn stats(&self) -> &MauStats {
        &self.stats
    }

    /// Applies a transaction and publishes the result.
    ///
    /// # Returns
    ///
    /// The epoch of the newly published snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CommitError`] if any write (or the final validation) fails; the
    /// published snapshot is then unchanged.
    pub fn commit(&self, tx: &ConfigTransaction) -> Result<u64, CommitError> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.snapshot();
        match base.apply(tx) {
            Ok(next) => {
                let epoch = next.epoch();
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);
                self.stats.record_commit();
                info!(epoch, writes = tx.len(), "stage configuration committed");
                Ok(epoch)
            }
            Err(e) => {
                self.stats.record_rejected();
                warn!(epoch = base.epoch(), write = e.index, error = %e.source, "stage configuration rejected");
                Err(e)
            }
        }
    }

    /// Seeded hash of a unit for a packet, on the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`StageConfig::compute_hash`].
    pub fn compute_hash(&self, unit: UnitId, phv: &Phv) -> Result<BitField, EvalError> {
        let hash = self.snapshot().compute_hash(unit, phv)?;
        self.stats.record_hash();
        Ok(hash)
    }

    /// Hash group value for a packet, on the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`StageConfig::compute_hash_group`].
    pub fn compute_hash_group(&self, group: HashGroupId, phv: &Phv) -> Result<BitField, EvalError> {
        let value = self.snapshot().compute_hash_group(group, phv)?;
        self.stats.record_hash();
        Ok(value)
    }

    /// Evaluates a gateway for a packet, on the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`StageConfig::evaluate_gateway`].
    pub fn evaluate_gateway(
        &self,
        gateway: GatewayId,
        phv: &Phv,
        ctx: ThreadContext,
    ) -> Result<GatewayResult, EvalError> {
        let result = self.snapshot().evaluate_gateway(gateway, phv, ctx)?;
        self.stats.record_gateway(result.hit);
        debug!(%gateway, hit = result.hit, index = ?result.index, "gateway evaluated");
        Ok(result)
    }
}
