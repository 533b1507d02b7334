//! Evaluation statistics collection and reporting.
//!
//! This module tracks activity of a shared stage handle. It provides:
//! 1. **Hashing:** Number of unit and group hash computations.
//! 2. **Gateways:** Evaluations, hits, and misses, with the derived hit rate.
//! 3. **Configuration:** Committed and rejected transactions.
//!
//! Counters are atomics so that packet evaluations on many threads can record without
//! locking; `snapshot` returns a plain copy for reporting.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by every user of a stage handle.
#[derive(Debug, Default)]
pub struct MauStats {
    hash_computations: AtomicU64,
    gateway_evaluations: AtomicU64,
    gateway_hits: AtomicU64,
    commits: AtomicU64,
    rejected_commits: AtomicU64,
}

#[inline(always)]
fn bump(counter: &AtomicU64) {
    let _ = counter.fetch_add(1, Ordering::Relaxed);
}

impl MauStats {
    /// Records one hash or hash-group computation.
    pub fn record_hash(&self) {
        bump(&self.hash_computations);
    }

    /// Records one gateway evaluation and whether it hit.
    pub fn record_gateway(&self, hit: bool) {
        bump(&self.gateway_evaluations);
        if hit {
            bump(&self.gateway_hits);
        }
    }

    /// Records a committed transaction.
    pub fn record_commit(&self) {
        bump(&self.commits);
    }

    /// Records a rejected transaction.
    pub fn record_rejected(&self) {
        bump(&self.rejected_commits);
    }

    /// Copies the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        let gateway_evaluations = self.gateway_evaluations.load(Ordering::Relaxed);
        let gateway_hits = self.gateway_hits.load(Ordering::Relaxed);
        StatsSnapshot {
            hash_computations: self.hash_computations.load(Ordering::Relaxed),
            gateway_evaluations,
            gateway_hits,
            gateway_misses: gateway_evaluations.saturating_sub(gateway_hits),
            commits: self.commits.load(Ordering::Relaxed),
            rejected_commits: self.rejected_commits.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`MauStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Hash and hash-group computations.
    pub hash_computations: u64,
    /// Gateway evaluations.
    pub gateway_evaluations: u64,
    /// Gateway evaluations that hit.
    pub gateway_hits: u64,
    /// Gateway evaluations that missed.
    pub gateway_misses: u64,
    /// Committed transactions.
    pub commits: u64,
    /// Rejected transactions.
    pub rejected_commits: u64,
}

impl StatsSnapshot {
    /// Fraction of gateway evaluations that hit, or 0.0 before any evaluation.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        if self.gateway_evaluations == 0 {
            0.0
        } else {
            self.gateway_hits as f64 / self.gateway_evaluations as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "MAU STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "hash.computations        {}", self.hash_computations)?;
        writeln!(f, "gateway.evaluations      {}", self.gateway_evaluations)?;
        writeln!(
            f,
            "gateway.hits             {} ({:.2}%)",
            self.gateway_hits,
            self.hit_rate() * 100.0
        )?;
        writeln!(f, "gateway.misses           {}", self.gateway_misses)?;
        writeln!(f, "config.commits           {}", self.commits)?;
        write!(f, "config.rejected          {}", self.rejected_commits)
    }
}
