//! Gateway entries and packet thread context.

use serde::Deserialize;

use crate::common::BitField;

/// Number of packet versions a `VersionTag` can accept.
pub const VERSIONS: u8 = 4;

/// Pipeline thread a packet (or a gateway table) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Thread {
    /// Ingress pipeline.
    #[default]
    Ingress,
    /// Egress pipeline.
    Egress,
}

/// Thread and version a packet carries through the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThreadContext {
    /// Thread the packet is travelling in.
    pub thread: Thread,
    /// Packet version (0..4).
    pub version: u8,
}

impl ThreadContext {
    /// Creates a context.
    pub const fn new(thread: Thread, version: u8) -> Self {
        Self { thread, version }
    }
}

/// Set of packet versions an entry accepts; bit `v` accepts version `v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct VersionTag(pub u8);

impl VersionTag {
    /// Accepts every version.
    pub const ANY: Self = Self(0xF);
    /// Accepts no version; the entry can never match.
    pub const NONE: Self = Self(0);

    /// Accepts only `version`.
    pub const fn only(version: u8) -> Self {
        if version < VERSIONS {
            Self(1 << version)
        } else {
            Self::NONE
        }
    }

    /// Returns `true` if `version` is in the set.
    #[inline(always)]
    pub const fn accepts(self, version: u8) -> bool {
        version < VERSIONS && (self.0 >> version) & 1 == 1
    }
}

impl Default for VersionTag {
    fn default() -> Self {
        Self::ANY
    }
}

/// One gateway comparison entry.
///
/// Bits set in `dont_care` are excluded from the comparison. `value` and `dont_care`
/// share the table's live width once the configuration is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatewayEntry {
    /// Compare value.
    pub value: BitField,
    /// Bits excluded from the comparison.
    pub dont_care: BitField,
    /// Entry participates in matching.
    pub valid: bool,
    /// Packet versions the entry applies to.
    pub version: VersionTag,
    /// Data returned on a hit.
    pub payload: Option<BitField>,
}

impl GatewayEntry {
    /// Returns `true` if `live` equals `value` on every cared-for bit.
    ///
    /// Validity and version are not considered.
    #[inline(always)]
    pub const fn matches(&self, live: BitField) -> bool {
        let diff = live.value() ^ self.value.value();
        diff & !self.dont_care.value() == 0
    }

    /// Returns `true` if the entry is valid and accepts the packet version.
    #[inline(always)]
    pub const fn enabled_for(&self, ctx: ThreadContext) -> bool {
        self.valid && self.version.accepts(ctx.version)
    }
}
