//! Gateway table configuration and evaluation.
//!
//! A gateway is a miniature ternary CAM: a handful of entries scanned in ascending index
//! order, first match wins. Evaluation is purely combinational; all state lives in the
//! configuration snapshot.

use tracing::trace;

use super::entry::{GatewayEntry, Thread, ThreadContext, VersionTag};
use super::input::GatewayInput;
use crate::common::{BitField, ConfigError, EvalError, GatewayId, MAX_WIDTH};
use crate::hash::{HashEngine, HashGroupSource};
use crate::phv::Phv;

/// Outcome of one gateway evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GatewayResult {
    /// An entry matched.
    pub hit: bool,
    /// Index of the matching entry.
    pub index: Option<u8>,
    /// Payload of the matching entry.
    pub payload: Option<BitField>,
}

impl GatewayResult {
    /// A miss.
    pub const fn miss() -> Self {
        Self {
            hit: false,
            index: None,
            payload: None,
        }
    }

    /// A hit on entry `index`.
    pub const fn hit(index: u8, payload: Option<BitField>) -> Self {
        Self {
            hit: true,
            index: Some(index),
            payload,
        }
    }
}

/// Scans `entries` in ascending order and returns the first enabled match.
///
/// Entries that are invalid or do not accept `ctx.version` are skipped. An empty or
/// all-invalid entry list misses.
pub fn evaluate(live: BitField, entries: &[GatewayEntry], ctx: ThreadContext) -> GatewayResult {
    entries
        .iter()
        .enumerate()
        .find(|(_, e)| e.enabled_for(ctx) && e.matches(live))
        .map_or_else(GatewayResult::miss, |(idx, e)| {
            GatewayResult::hit(idx as u8, e.payload)
        })
}

fn narrow(what: &'static str, field: BitField, width: usize) -> Result<BitField, ConfigError> {
    BitField::new(field.value(), width).map_err(|_| ConfigError::WidthMismatch {
        what,
        expected: width,
        got: (u64::BITS - field.value().leading_zeros()) as usize,
    })
}

/// Configuration of one gateway table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayTableConfig {
    id: GatewayId,
    entries: Vec<GatewayEntry>,
    input0: GatewayInput,
    input1: GatewayInput,
    thread_mode: Thread,
}

impl GatewayTableConfig {
    /// Creates a table of `depth` invalid entries with unused inputs.
    pub fn new(id: GatewayId, depth: usize) -> Self {
        Self {
            id,
            entries: vec![GatewayEntry::default(); depth],
            input0: GatewayInput::Unused,
            input1: GatewayInput::Unused,
            thread_mode: Thread::Ingress,
        }
    }

    /// Table identifier.
    pub const fn id(&self) -> GatewayId {
        self.id
    }

    /// Entries in priority order.
    pub fn entries(&self) -> &[GatewayEntry] {
        &self.entries
    }

    /// Input selections `(input0, input1)`.
    pub const fn inputs(&self) -> (GatewayInput, GatewayInput) {
        (self.input0, self.input1)
    }

    /// Thread whose packets this table evaluates.
    pub const fn thread_mode(&self) -> Thread {
        self.thread_mode
    }

    /// Live comparison width W.
    pub const fn live_width(&self) -> usize {
        self.input0.width() + self.input1.width()
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut GatewayEntry, ConfigError> {
        let (gateway, count) = (self.id, self.entries.len());
        self.entries
            .get_mut(index)
            .ok_or(ConfigError::EntryOutOfRange {
                gateway,
                index,
                count,
            })
    }

    /// Writes an entry's compare fields.
    ///
    /// Widths are normalized to W by [`GatewayTableConfig::normalize`] at commit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EntryOutOfRange`], or [`ConfigError::VersionTagOutOfRange`]
    /// if `version` has bits set above [`VersionTag::ANY`].
    pub fn set_entry(
        &mut self,
        index: usize,
        value: u64,
        dont_care: u64,
        valid: bool,
        version: VersionTag,
    ) -> Result<(), ConfigError> {
        if version.0 & !VersionTag::ANY.0 != 0 {
            return Err(ConfigError::VersionTagOutOfRange {
                gateway: self.id,
                index,
                tag: version.0,
            });
        }
        let e = self.entry_mut(index)?;
        e.value = BitField::from_raw(value, MAX_WIDTH);
        e.dont_care = BitField::from_raw(dont_care, MAX_WIDTH);
        e.valid = valid;
        e.version = version;
        Ok(())
    }

    /// Sets or clears an entry's payload.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EntryOutOfRange`].
    pub fn set_payload(&mut self, index: usize, payload: Option<BitField>) -> Result<(), ConfigError> {
        self.entry_mut(index)?.payload = payload;
        Ok(())
    }

    /// Selects both inputs.
    pub fn set_inputs(&mut self, input0: GatewayInput, input1: GatewayInput) {
        self.input0 = input0;
        self.input1 = input1;
    }

    /// Sets the thread whose packets the table evaluates.
    pub fn set_thread_mode(&mut self, thread: Thread) {
        self.thread_mode = thread;
    }

    /// Validates inputs against the hash bank and narrows every entry to W bits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::GatewayInputTooWide`] if W exceeds 64, an input slice
    /// error, or [`ConfigError::WidthMismatch`] when an entry's value or don't-care mask
    /// has bits at or above W.
    pub fn normalize(&mut self, hash: &HashEngine) -> Result<(), ConfigError> {
        let width = self.live_width();
        if width > MAX_WIDTH {
            return Err(ConfigError::GatewayInputTooWide {
                gateway: self.id,
                width,
            });
        }
        self.input0.validate(hash)?;
        self.input1.validate(hash)?;
        for e in &mut self.entries {
            e.value = narrow("gateway entry value", e.value, width)?;
            e.dont_care = narrow("gateway don't-care mask", e.dont_care, width)?;
        }
        Ok(())
    }

    /// Assembles the live word for a packet: input 0 low, input 1 above it.
    ///
    /// # Errors
    ///
    /// Propagates input resolution errors.
    pub fn live<S>(&self, phv: &Phv, hash: &S) -> Result<BitField, EvalError>
    where
        S: HashGroupSource + ?Sized,
    {
        let lo = self.input0.resolve(phv, hash)?;
        let hi = self.input1.resolve(phv, hash)?;
        lo.concat(hi).map_err(|_| EvalError::ConfigMismatch {
            expected: MAX_WIDTH,
            got: lo.width() + hi.width(),
        })
    }

    /// Evaluates the table against an assembled live word.
    ///
    /// A packet from a different thread misses.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::ConfigMismatch`] if `live` is not W bits wide.
    pub fn evaluate(&self, live: BitField, ctx: ThreadContext) -> Result<GatewayResult, EvalError> {
        let width = self.live_width();
        if live.width() != width {
            return Err(EvalError::ConfigMismatch {
                expected: width,
                got: live.width(),
            });
        }
        if ctx.thread != self.thread_mode {
            return Ok(GatewayResult::miss());
        }
        let result = evaluate(live, &self.entries, ctx);
        trace!(gateway = %self.id, live = %live, hit = result.hit, index = ?result.index, "gateway");
        Ok(result)
    }

    /// Selects inputs from a packet and evaluates the table.
    ///
    /// # Errors
    ///
    /// Propagates input resolution and width errors.
    pub fn evaluate_phv<S>(
        &self,
        phv: &Phv,
        hash: &S,
        ctx: ThreadContext,
    ) -> Result<GatewayResult, EvalError>
    where
        S: HashGroupSource + ?Sized,
    {
        let live = self.live(phv, hash)?;
        self.evaluate(live, ctx)
    }
}
