//! # Bit Field Tests
//!
//! Construction, normalization, slicing, concatenation, and the GF(2) operators of
//! `BitField`.

use mausim_core::BitField;
use mausim_core::common::{BitsError, MAX_WIDTH};
use proptest::prelude::*;

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn test_new_accepts_fitting_value() {
    let f = BitField::new(0x602a8, 20).unwrap();
    assert_eq!(f.value(), 0x602a8);
    assert_eq!(f.width(), 20);
}

#[test]
fn test_new_rejects_value_too_wide() {
    assert_eq!(
        BitField::new(0x100, 8),
        Err(BitsError::ValueTooWide {
            value: 0x100,
            width: 8
        })
    );
}

#[test]
fn test_width_above_64_rejected() {
    assert_eq!(BitField::zero(65), Err(BitsError::WidthTooLarge(65)));
    assert_eq!(BitField::truncated(1, 70), Err(BitsError::WidthTooLarge(70)));
}

#[test]
fn test_truncated_discards_high_bits() {
    let f = BitField::truncated(0xFFFF, 12).unwrap();
    assert_eq!(f.value(), 0xFFF);
}

#[test]
fn test_full_width_field() {
    let f = BitField::new(u64::MAX, MAX_WIDTH).unwrap();
    assert_eq!(f.value(), u64::MAX);
    assert_eq!(BitField::mask(64), u64::MAX);
    assert_eq!(BitField::mask(0), 0);
}

#[test]
fn test_zero_width_field_is_zero() {
    let f = BitField::truncated(0xABC, 0).unwrap();
    assert!(f.is_zero());
    assert_eq!(f.width(), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Bit access
// ══════════════════════════════════════════════════════════

#[test]
fn test_with_bit_sets_and_clears() {
    let f = BitField::zero(8).unwrap().with_bit(3, true).unwrap();
    assert_eq!(f.value(), 0b1000);
    assert!(f.bit(3));
    let f = f.with_bit(3, false).unwrap();
    assert!(f.is_zero());
}

#[test]
fn test_with_bit_out_of_range() {
    let f = BitField::zero(8).unwrap();
    assert_eq!(
        f.with_bit(8, true),
        Err(BitsError::BitOutOfRange { index: 8, width: 8 })
    );
}

#[test]
fn test_ones_lists_set_bits_lowest_first() {
    let f = BitField::new(0b1010_0001, 8).unwrap();
    assert_eq!(f.ones().collect::<Vec<_>>(), vec![0, 5, 7]);
}

#[test]
fn test_parity() {
    assert!(!BitField::new(0b1010_0000, 8).unwrap().parity());
    assert!(BitField::new(0b1010_0001, 8).unwrap().parity());
    assert!(!BitField::zero(52).unwrap().parity());
}

// ══════════════════════════════════════════════════════════
// 3. Slice and concat
// ══════════════════════════════════════════════════════════

#[test]
fn test_slice_extracts_bits() {
    let f = BitField::new(0xc0a8_010a, 32).unwrap();
    let s = f.slice(16, 8).unwrap();
    assert_eq!(s.value(), 0xa8);
    assert_eq!(s.width(), 8);
}

#[test]
fn test_slice_past_end_rejected() {
    let f = BitField::new(0xFF, 8).unwrap();
    assert!(f.slice(4, 5).is_err());
    assert_eq!(f.slice(8, 0).unwrap().width(), 0);
}

#[test]
fn test_concat_places_high_above_low() {
    let lo = BitField::new(0xa8, 8).unwrap();
    let hi = BitField::new(0x602, 12).unwrap();
    let live = lo.concat(hi).unwrap();
    assert_eq!(live.value(), 0x602a8);
    assert_eq!(live.width(), 20);
}

#[test]
fn test_concat_overflow_rejected() {
    let a = BitField::zero(40).unwrap();
    let b = BitField::zero(25).unwrap();
    assert_eq!(a.concat(b), Err(BitsError::WidthTooLarge(65)));
}

// ══════════════════════════════════════════════════════════
// 4. Operators and formatting
// ══════════════════════════════════════════════════════════

#[test]
fn test_xor_widens_to_larger_operand() {
    let a = BitField::new(0xF0, 8).unwrap();
    let b = BitField::new(0x0FFF, 16).unwrap();
    let x = a ^ b;
    assert_eq!(x.width(), 16);
    assert_eq!(x.value(), 0x0F0F);
}

#[test]
fn test_not_stays_inside_width() {
    let f = BitField::new(0b1010, 4).unwrap();
    assert_eq!((!f).value(), 0b0101);
}

#[test]
fn test_display_is_sized_literal() {
    let f = BitField::new(0x602a8, 20).unwrap();
    assert_eq!(f.to_string(), "20'h602a8");
    assert_eq!(format!("{f:x}"), "602a8");
}

proptest! {
    #[test]
    fn prop_value_never_exceeds_width(value in any::<u64>(), width in 0usize..=64) {
        let f = BitField::truncated(value, width).unwrap();
        prop_assert_eq!(f.value() & !BitField::mask(width), 0);
    }

    #[test]
    fn prop_xor_is_self_inverse(a in any::<u64>(), b in any::<u64>(), width in 1usize..=64) {
        let a = BitField::truncated(a, width).unwrap();
        let b = BitField::truncated(b, width).unwrap();
        prop_assert_eq!((a ^ b) ^ b, a);
    }

    #[test]
    fn prop_concat_then_slice_recovers_parts(lo in any::<u32>(), hi in any::<u32>()) {
        let l = BitField::new(u64::from(lo), 32).unwrap();
        let h = BitField::new(u64::from(hi), 32).unwrap();
        let joined = l.concat(h).unwrap();
        prop_assert_eq!(joined.slice(0, 32).unwrap(), l);
        prop_assert_eq!(joined.slice(32, 32).unwrap(), h);
    }
}
