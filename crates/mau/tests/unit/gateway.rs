//! # Gateway Tests
//!
//! This module verifies gateway predicate tables:
//! 1. **Matching:** Ternary compare with don't-care bits.
//! 2. **Priority:** Lowest matching index wins; invalid and version-filtered entries skip.
//! 3. **Context:** Thread mode and packet version.
//! 4. **Inputs:** Live word assembly from PHV slices and hash group slices.
//! 5. **Normalization:** Width checks applied when configuration is committed.

use mausim_core::common::{ConfigError, EvalError, GatewayId, HashGroupId};
use mausim_core::gateway::{
    GatewayEntry, GatewayInput, GatewayResult, GatewayTableConfig, Thread, ThreadContext,
    VersionTag, evaluate,
};
use mausim_core::hash::HashEngine;
use mausim_core::phv::PhvContainer;
use mausim_core::{BitField, MauShape, Phv};
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::mocks::MockGroupSource;

const GW: GatewayId = GatewayId { row: 0, table: 0 };
const INGRESS: ThreadContext = ThreadContext::new(Thread::Ingress, 0);

fn engine() -> HashEngine {
    HashEngine::new(&MauShape::default()).unwrap()
}

fn entry(value: u64, dont_care: u64, width: usize) -> GatewayEntry {
    GatewayEntry {
        value: BitField::new(value, width).unwrap(),
        dont_care: BitField::new(dont_care, width).unwrap(),
        valid: true,
        version: VersionTag::ANY,
        payload: None,
    }
}

/// A table whose live word is the low 16 bits of W0.
fn w0_table(depth: usize) -> GatewayTableConfig {
    let mut t = GatewayTableConfig::new(GW, depth);
    t.set_inputs(
        GatewayInput::Phv {
            container: PhvContainer::word(0),
            shift: 0,
            width: 16,
        },
        GatewayInput::Unused,
    );
    t
}

fn live16(v: u64) -> BitField {
    BitField::new(v, 16).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Matching
// ══════════════════════════════════════════════════════════

#[test]
fn test_exact_match() {
    let e = entry(0x0800, 0, 16);
    assert!(e.matches(live16(0x0800)));
    assert!(!e.matches(live16(0x0801)));
}

#[test]
fn test_dont_care_bits_ignored() {
    let e = entry(0x0800, 0x00FF, 16);
    assert!(e.matches(live16(0x08AB)));
    assert!(!e.matches(live16(0x09AB)));
}

#[test]
fn test_all_dont_care_matches_anything() {
    let e = entry(0, 0xFFFF, 16);
    assert!(e.matches(live16(0x1234)));
}

#[test]
fn test_version_tag() {
    assert!(VersionTag::ANY.accepts(3));
    assert!(!VersionTag::NONE.accepts(0));
    assert!(VersionTag::only(2).accepts(2));
    assert!(!VersionTag::only(2).accepts(1));
    assert_eq!(VersionTag::only(7), VersionTag::NONE);
    assert!(!VersionTag::ANY.accepts(4));
}

// ══════════════════════════════════════════════════════════
// 2. Priority
// ══════════════════════════════════════════════════════════

#[test]
fn test_lowest_matching_index_wins() {
    let entries = [
        entry(0x1111, 0, 16),
        entry(0x0800, 0x000F, 16),
        entry(0x0800, 0, 16),
    ];
    let r = evaluate(live16(0x0800), &entries, INGRESS);
    assert_eq!(r, GatewayResult::hit(1, None));
}

#[test]
fn test_invalid_entries_are_skipped() {
    let mut first = entry(0x0800, 0, 16);
    first.valid = false;
    let entries = [first, entry(0x0800, 0xFFFF, 16)];
    let r = evaluate(live16(0x0800), &entries, INGRESS);
    assert_eq!(r.index, Some(1));
}

#[test]
fn test_empty_and_all_invalid_tables_miss() {
    assert_eq!(evaluate(live16(0), &[], INGRESS), GatewayResult::miss());
    let entries = [GatewayEntry::default(); 4];
    let r = evaluate(BitField::zero(0).unwrap(), &entries, INGRESS);
    assert!(!r.hit);
    assert_eq!(r.index, None);
}

#[test]
fn test_version_filtered_entry_skipped() {
    let mut v2 = entry(0x0800, 0, 16);
    v2.version = VersionTag::only(2);
    let entries = [v2, entry(0x0800, 0, 16)];
    let v0 = ThreadContext::new(Thread::Ingress, 0);
    let v2ctx = ThreadContext::new(Thread::Ingress, 2);
    assert_eq!(evaluate(live16(0x0800), &entries, v0).index, Some(1));
    assert_eq!(evaluate(live16(0x0800), &entries, v2ctx).index, Some(0));
}

#[test]
fn test_payload_returned_on_hit() {
    let mut e = entry(0x0800, 0, 16);
    e.payload = Some(BitField::new(0x5a, 8).unwrap());
    let r = evaluate(live16(0x0800), &[e], INGRESS);
    assert_eq!(r.payload, Some(BitField::new(0x5a, 8).unwrap()));
}

// ══════════════════════════════════════════════════════════
// 3. Table evaluation and context
// ══════════════════════════════════════════════════════════

#[test]
fn test_table_evaluates_phv() {
    let mut t = w0_table(4);
    t.set_entry(2, 0x010a, 0, true, VersionTag::ANY).unwrap();
    t.normalize(&engine()).unwrap();
    let mut phv = Phv::new();
    phv.set(PhvContainer::word(0), 0xc0a8_010a).unwrap();
    let r = t.evaluate_phv(&phv, &engine(), INGRESS).unwrap();
    assert_eq!(r, GatewayResult::hit(2, None));
}

#[test]
fn test_other_thread_misses() {
    let mut t = w0_table(4);
    t.set_entry(0, 0, 0xFFFF, true, VersionTag::ANY).unwrap();
    t.set_thread_mode(Thread::Egress);
    t.normalize(&engine()).unwrap();
    let r = t.evaluate(live16(0), INGRESS).unwrap();
    assert!(!r.hit);
    let r = t.evaluate(live16(0), ThreadContext::new(Thread::Egress, 0)).unwrap();
    assert!(r.hit);
}

#[test]
fn test_live_width_mismatch_is_error() {
    let t = w0_table(4);
    assert_eq!(
        t.evaluate(BitField::zero(12).unwrap(), INGRESS),
        Err(EvalError::ConfigMismatch {
            expected: 16,
            got: 12
        })
    );
}

#[test]
fn test_zero_depth_table_always_misses() {
    let t = w0_table(0);
    assert_eq!(t.evaluate(live16(0), INGRESS).unwrap(), GatewayResult::miss());
}

#[test]
fn test_entry_index_out_of_range() {
    let mut t = w0_table(4);
    assert_eq!(
        t.set_entry(4, 0, 0, true, VersionTag::ANY),
        Err(ConfigError::EntryOutOfRange {
            gateway: GW,
            index: 4,
            count: 4
        })
    );
}

#[test]
fn test_version_tag_above_four_versions_rejected() {
    let mut t = w0_table(4);
    assert_eq!(
        t.set_entry(1, 0, 0, true, VersionTag(0xFF)),
        Err(ConfigError::VersionTagOutOfRange {
            gateway: GW,
            index: 1,
            tag: 0xFF
        })
    );
    assert_eq!(t.entries()[1], GatewayEntry::default());
    t.set_entry(1, 0, 0, true, VersionTag::ANY).unwrap();
}

/// An exact entry tagged for version 2 sits ahead of a wildcard entry: version 2 packets
/// take the exact entry, every other version falls through to the wildcard.
#[test]
fn test_version_gated_entry_ahead_of_wildcard() {
    let mut t = w0_table(4);
    t.set_entry(0, 0x02a8, 0, false, VersionTag::ANY).unwrap();
    t.set_entry(2, 0x02a8, 0, true, VersionTag::only(2)).unwrap();
    t.set_entry(3, 0x02a0, 0x000F, true, VersionTag::ANY).unwrap();
    t.normalize(&engine()).unwrap();
    for version in [0, 1, 3] {
        let ctx = ThreadContext::new(Thread::Ingress, version);
        assert_eq!(t.evaluate(live16(0x02a8), ctx).unwrap().index, Some(3));
    }
    let v2 = ThreadContext::new(Thread::Ingress, 2);
    assert_eq!(t.evaluate(live16(0x02a8), v2).unwrap().index, Some(2));
}

// ══════════════════════════════════════════════════════════
// 4. Inputs
// ══════════════════════════════════════════════════════════

#[test]
fn test_hash_group_input_from_mock_source() {
    let mut t = GatewayTableConfig::new(GW, 4);
    t.set_inputs(
        GatewayInput::HashGroup {
            group: HashGroupId(2),
            shift: 4,
            width: 8,
        },
        GatewayInput::Phv {
            container: PhvContainer::byte(0),
            shift: 0,
            width: 8,
        },
    );
    t.set_entry(1, 0x11ab, 0, true, VersionTag::ANY).unwrap();
    t.normalize(&engine()).unwrap();

    let mut source = MockGroupSource::new();
    let _ = source
        .expect_hash_group()
        .with(eq(HashGroupId(2)), always())
        .times(1)
        .returning(|_, _| Ok(BitField::new(0xabc, 12).unwrap()));

    let mut phv = Phv::new();
    phv.set(PhvContainer::byte(0), 0x11).unwrap();
    let r = t.evaluate_phv(&phv, &source, INGRESS).unwrap();
    assert_eq!(r, GatewayResult::hit(1, None));
}

#[test]
fn test_hash_source_error_propagates() {
    let mut t = GatewayTableConfig::new(GW, 1);
    t.set_inputs(
        GatewayInput::HashGroup {
            group: HashGroupId(0),
            shift: 0,
            width: 4,
        },
        GatewayInput::Unused,
    );
    let mut source = MockGroupSource::new();
    let _ = source
        .expect_hash_group()
        .returning(|g, _| Err(EvalError::UnknownGroup(g)));
    assert_eq!(
        t.live(&Phv::new(), &source),
        Err(EvalError::UnknownGroup(HashGroupId(0)))
    );
}

#[test]
fn test_unused_inputs_give_zero_width_live_word() {
    let t = GatewayTableConfig::new(GW, 4);
    let live = t.live(&Phv::new(), &engine()).unwrap();
    assert_eq!(live.width(), 0);
    assert_eq!(t.live_width(), 0);
}

// ══════════════════════════════════════════════════════════
// 5. Normalization
// ══════════════════════════════════════════════════════════

#[test]
fn test_entry_wider_than_live_word_rejected() {
    let mut t = w0_table(4);
    t.set_entry(0, 0x1_0000, 0, true, VersionTag::ANY).unwrap();
    assert_eq!(
        t.normalize(&engine()),
        Err(ConfigError::WidthMismatch {
            what: "gateway entry value",
            expected: 16,
            got: 17
        })
    );
}

#[test]
fn test_normalize_narrows_entries() {
    let mut t = w0_table(2);
    t.set_entry(0, 0xABCD, 0x00F0, true, VersionTag::ANY).unwrap();
    t.normalize(&engine()).unwrap();
    assert_eq!(t.entries()[0].value, live16(0xABCD));
    assert_eq!(t.entries()[0].dont_care, live16(0x00F0));
}

#[test]
fn test_inputs_wider_than_64_rejected() {
    let mut t = GatewayTableConfig::new(GW, 1);
    let hg = GatewayInput::HashGroup {
        group: HashGroupId(0),
        shift: 0,
        width: 40,
    };
    t.set_inputs(hg, hg);
    assert_eq!(
        t.normalize(&engine()),
        Err(ConfigError::GatewayInputTooWide {
            gateway: GW,
            width: 80
        })
    );
}

#[test]
fn test_slice_past_container_rejected() {
    let mut t = GatewayTableConfig::new(GW, 1);
    t.set_inputs(
        GatewayInput::Phv {
            container: PhvContainer::half(0),
            shift: 8,
            width: 12,
        },
        GatewayInput::Unused,
    );
    assert_eq!(
        t.normalize(&engine()),
        Err(ConfigError::SliceOutOfRange {
            shift: 8,
            width: 12,
            source_width: 16
        })
    );
}

#[test]
fn test_slice_past_group_width_rejected() {
    let mut e = engine();
    e.set_parity_mask(HashGroupId(1), 3, 0x1).unwrap();
    let mut t = GatewayTableConfig::new(GW, 1);
    t.set_inputs(
        GatewayInput::HashGroup {
            group: HashGroupId(1),
            shift: 0,
            width: 5,
        },
        GatewayInput::Unused,
    );
    assert!(matches!(
        t.normalize(&e),
        Err(ConfigError::SliceOutOfRange { source_width: 4, .. })
    ));
}

proptest! {
    #[test]
    fn prop_dont_care_bits_never_affect_result(
        live in 0u64..(1 << 20),
        value in 0u64..(1 << 20),
        dont_care in 0u64..(1 << 20),
        noise in 0u64..(1 << 20),
    ) {
        let e = entry(value, dont_care, 20);
        let a = BitField::new(live, 20).unwrap();
        let b = BitField::new(live ^ (noise & dont_care), 20).unwrap();
        prop_assert_eq!(evaluate(a, &[e], INGRESS), evaluate(b, &[e], INGRESS));
    }

    #[test]
    fn prop_first_match_is_minimal(
        values in proptest::collection::vec(0u64..4, 1..16),
        live in 0u64..4,
    ) {
        let entries: Vec<_> = values.iter().map(|v| entry(*v, 0, 2)).collect();
        let r = evaluate(BitField::new(live, 2).unwrap(), &entries, INGRESS);
        let expected = values.iter().position(|v| *v == live);
        prop_assert_eq!(r.index.map(usize::from), expected);
    }
}
