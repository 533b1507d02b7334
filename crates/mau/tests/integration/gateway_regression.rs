//! # Gateway Regression
//!
//! Loads `fixtures/gateway_regression.json`: sixteen populated 64x52 hash units, a
//! 12-bit parity group over unit 0, and two gateways. The packet is an Ethernet/IPv4
//! header from 192.168.1.10. The seed of unit 0 was chosen so that group 3 evaluates to
//! `0x602`; gateway row 2 table 1 combines byte 2 of the source address (`0xa8`) with that
//! group into the live word `0x602a8`.

use mausim_core::common::{GatewayId, HashGroupId, UnitId};
use mausim_core::gateway::{Thread, ThreadContext};
use mausim_core::loader::StageSpec;
use mausim_core::phv::PhvContainer;
use mausim_core::{BitField, Mau, Phv};
use pretty_assertions::assert_eq;

use crate::common::harness::init_tracing;
use crate::common::{REGRESSION_PACKET, fixture_path};

const PREDICATE: GatewayId = GatewayId { row: 2, table: 1 };
const ETHERTYPE: GatewayId = GatewayId { row: 0, table: 0 };

fn load() -> (Mau, Phv) {
    init_tracing();
    let spec = StageSpec::from_path(fixture_path("gateway_regression.json")).unwrap();
    let phv = spec.extractor().unwrap().extract(&REGRESSION_PACKET).unwrap();
    (spec.build().unwrap(), phv)
}

#[test]
fn test_extraction_fills_expected_containers() {
    let (_, phv) = load();
    assert_eq!(phv.get(PhvContainer::word(0)).unwrap(), 0xc0a8_010a);
    assert_eq!(phv.get(PhvContainer::word(1)).unwrap(), 0xc0a8_0101);
    assert_eq!(phv.get(PhvContainer::half(0)).unwrap(), 0x0800);
    assert_eq!(phv.get(PhvContainer::byte(0)).unwrap(), 0x01);
}

#[test]
fn test_unit_hashes_match_golden_values() {
    let (mau, phv) = load();
    assert_eq!(
        mau.compute_hash(UnitId(0), &phv).unwrap(),
        BitField::new(0x48afc5021e52c, 52).unwrap()
    );
    assert_eq!(
        mau.compute_hash(UnitId(1), &phv).unwrap(),
        BitField::new(0x555aaa5ced21e, 52).unwrap()
    );
}

#[test]
fn test_hash_groups() {
    let (mau, phv) = load();
    let g3 = mau.compute_hash_group(HashGroupId(3), &phv).unwrap();
    assert_eq!(g3, BitField::new(0x602, 12).unwrap());
    // Group 1 has no masks and passes unit 1 through.
    let g1 = mau.compute_hash_group(HashGroupId(1), &phv).unwrap();
    assert_eq!(g1.value(), 0x555aaa5ced21e);
}

#[test]
fn test_predicate_hits_entry_three() {
    let (mau, phv) = load();
    assert_eq!(mau.snapshot().gateway_live(PREDICATE, &phv).unwrap().value(), 0x602a8);
    let r = mau
        .evaluate_gateway(PREDICATE, &phv, ThreadContext::new(Thread::Ingress, 0))
        .unwrap();
    assert!(r.hit);
    assert_eq!(r.index, Some(3));
    assert_eq!(r.payload, Some(BitField::new(0x5a, 8).unwrap()));
}

#[test]
fn test_predicate_has_only_entry_three_valid() {
    let spec = StageSpec::from_path(fixture_path("gateway_regression.json")).unwrap();
    let gw = spec
        .gateways
        .iter()
        .find(|g| g.row == PREDICATE.row && g.table == PREDICATE.table)
        .unwrap();
    let valid: Vec<usize> = gw.entries.iter().filter(|e| e.valid).map(|e| e.index).collect();
    assert_eq!(valid, vec![3]);
}

#[test]
fn test_predicate_hits_entry_three_for_every_version() {
    let (mau, phv) = load();
    for version in 0..4 {
        let r = mau
            .evaluate_gateway(PREDICATE, &phv, ThreadContext::new(Thread::Ingress, version))
            .unwrap();
        assert_eq!(r.index, Some(3), "version {version}");
    }
}

#[test]
fn test_predicate_misses_for_egress() {
    let (mau, phv) = load();
    let r = mau
        .evaluate_gateway(PREDICATE, &phv, ThreadContext::new(Thread::Egress, 0))
        .unwrap();
    assert!(!r.hit);
}

#[test]
fn test_ethertype_gateway_is_egress_only() {
    let (mau, phv) = load();
    let ingress = mau
        .evaluate_gateway(ETHERTYPE, &phv, ThreadContext::new(Thread::Ingress, 0))
        .unwrap();
    let egress = mau
        .evaluate_gateway(ETHERTYPE, &phv, ThreadContext::new(Thread::Egress, 0))
        .unwrap();
    assert!(!ingress.hit);
    assert_eq!(egress.index, Some(0));
    let stats = mau.stats().snapshot();
    assert_eq!(stats.gateway_evaluations, 2);
    assert_eq!(stats.gateway_hits, 1);
    assert_eq!(stats.commits, 1);
}

#[test]
fn test_changing_addresses_moves_hash_and_misses() {
    let (mau, _) = load();
    let spec = StageSpec::from_path(fixture_path("gateway_regression.json")).unwrap();
    let extractor = spec.extractor().unwrap();
    let ctx = ThreadContext::new(Thread::Ingress, 0);

    // Source 192.169.1.10: the direct byte still sits under the don't-care nibble, but the
    // hash group moves.
    let mut packet = REGRESSION_PACKET;
    packet[27] = 0xa9;
    let phv = extractor.extract(&packet).unwrap();
    assert_eq!(mau.snapshot().gateway_live(PREDICATE, &phv).unwrap().value(), 0x6afa9);
    assert!(!mau.evaluate_gateway(PREDICATE, &phv, ctx).unwrap().hit);

    // Destination 192.168.1.2 only feeds the hash.
    let mut packet = REGRESSION_PACKET;
    packet[33] = 0x02;
    let phv = extractor.extract(&packet).unwrap();
    assert_eq!(
        mau.compute_hash_group(HashGroupId(3), &phv).unwrap().value(),
        0xd7f
    );
    assert!(!mau.evaluate_gateway(PREDICATE, &phv, ctx).unwrap().hit);
}
