//! # Input Crossbar Tests
//!
//! Byte-lane selection, little-endian lane placement, and configuration errors.

use mausim_core::common::{ConfigError, UnitId};
use mausim_core::hash::{ByteSelect, InputXbar};
use mausim_core::phv::PhvContainer;
use mausim_core::Phv;

fn select(container: PhvContainer, byte: u8) -> Option<ByteSelect> {
    Some(ByteSelect { container, byte })
}

#[test]
fn test_unselected_lanes_drive_zero() {
    let xbar = InputXbar::new(UnitId(0), 64);
    let mut phv = Phv::new();
    phv.set(PhvContainer::word(0), 0xFFFF_FFFF).unwrap();
    let input = xbar.assemble(&phv).unwrap();
    assert!(input.is_zero());
    assert_eq!(input.width(), 64);
    assert_eq!(xbar.lanes(), 8);
}

#[test]
fn test_lane_l_drives_lines_8l_to_8l_plus_7() {
    let mut xbar = InputXbar::new(UnitId(0), 64);
    let mut phv = Phv::new();
    phv.set(PhvContainer::word(0), 0xc0a8_010a).unwrap();
    for lane in 0..4 {
        xbar.set_lane(lane, select(PhvContainer::word(0), lane as u8)).unwrap();
    }
    xbar.set_lane(7, select(PhvContainer::word(0), 3)).unwrap();
    let input = xbar.assemble(&phv).unwrap();
    assert_eq!(input.value(), 0xc000_0000_c0a8_010a);
}

#[test]
fn test_byte_and_half_containers() {
    let mut xbar = InputXbar::new(UnitId(0), 24);
    let mut phv = Phv::new();
    phv.set(PhvContainer::half(0), 0x0800).unwrap();
    phv.set(PhvContainer::byte(5), 0x11).unwrap();
    xbar.set_lane(0, select(PhvContainer::half(0), 0)).unwrap();
    xbar.set_lane(1, select(PhvContainer::half(0), 1)).unwrap();
    xbar.set_lane(2, select(PhvContainer::byte(5), 0)).unwrap();
    assert_eq!(xbar.assemble(&phv).unwrap().value(), 0x11_0800);
}

#[test]
fn test_clearing_lane() {
    let mut xbar = InputXbar::new(UnitId(0), 64);
    xbar.set_lane(2, select(PhvContainer::word(1), 0)).unwrap();
    assert!(xbar.lane(2).is_some());
    xbar.set_lane(2, None).unwrap();
    assert_eq!(xbar.lane(2), None);
}

#[test]
fn test_lane_out_of_range() {
    let mut xbar = InputXbar::new(UnitId(4), 64);
    assert_eq!(
        xbar.set_lane(8, select(PhvContainer::word(0), 0)),
        Err(ConfigError::LaneOutOfRange {
            unit: UnitId(4),
            lane: 8,
            lanes: 8
        })
    );
}

#[test]
fn test_byte_beyond_container_rejected() {
    let mut xbar = InputXbar::new(UnitId(0), 64);
    assert_eq!(
        xbar.set_lane(0, select(PhvContainer::half(0), 2)),
        Err(ConfigError::ByteOutOfRange {
            container: PhvContainer::half(0).0,
            byte: 2,
            bytes: 2
        })
    );
}

#[test]
fn test_missing_container_rejected() {
    let mut xbar = InputXbar::new(UnitId(0), 64);
    assert_eq!(
        xbar.set_lane(0, select(PhvContainer(224), 0)),
        Err(ConfigError::ContainerOutOfRange(224))
    );
}
