use ibig::UBig;
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use rstest::rstest;

use super::codec;
use super::io::{self, Radix};
use super::BitVec;

/// Widths kept small (`[1, 128]`) so quickcheck shrinking stays useful and
/// runs stay fast; the width discipline itself doesn't depend on scale.
impl Arbitrary for BitVec {
    fn arbitrary(g: &mut Gen) -> Self {
        let width = (u16::arbitrary(g) % 128) + 1;
        let raw = u128::arbitrary(g);
        let magnitude = UBig::from(raw);
        BitVec::from_magnitude(width, magnitude)
    }
}

fn bits(width: u16, value: u64) -> BitVec {
    BitVec::new(width, value)
}

// ---- Invariants -------------------------------------------------------

#[quickcheck]
fn magnitude_always_in_range(a: BitVec) -> bool {
    *a.magnitude() < (UBig::from(1u8) << a.width() as usize)
}

#[quickcheck]
fn width_never_zero(a: BitVec) -> bool {
    a.width() >= 1
}

#[quickcheck]
fn equality_matches_width_and_magnitude(a: BitVec, b: BitVec) -> bool {
    let eq = a == b;
    let fields_eq = a.width() == b.width() && a.magnitude() == b.magnitude();
    a == a && (eq == fields_eq)
}

// ---- Algebraic laws ----------------------------------------------------

#[quickcheck]
fn double_bitwise_not_is_identity(a: BitVec) -> bool {
    let mut twice = a.clone();
    twice.bitwise_not().bitwise_not();
    twice == a
}

#[quickcheck]
fn value_plus_its_negation_is_zero(a: BitVec) -> bool {
    let mut neg = a.clone();
    neg.unary_minus();
    let mut sum = a.clone();
    sum.arithmetic_plus(&neg);
    *sum.magnitude() == UBig::from(0u8)
}

#[test]
fn concat_then_slice_recovers_operands() {
    let a = bits(4, 0b1010);
    let b = bits(4, 0b0011);
    let mut combined = a.clone();
    combined.concat(&b);

    let mut high = combined.clone();
    high.slice_range(7, 4);
    assert_eq!(high, a);

    let mut low = combined.clone();
    low.slice_range(3, 0);
    assert_eq!(low, b);
}

#[test]
fn assign_range_then_eq_range_agree() {
    let mut a = bits(32, 0);
    let x = bits(8, 0xAB);
    a.assign_range(15, 8, &x);
    assert!(a.eq_range(&x, 15, 8));
}

#[quickcheck]
fn binary_codec_round_trips(a: BitVec) -> bool {
    let bytes = codec::encode(&a);
    let (decoded, consumed) = codec::decode(&bytes).expect("encode output always decodes");
    consumed == bytes.len() && decoded == a
}

#[quickcheck]
fn text_round_trip_preserves_magnitude(a: BitVec) -> bool {
    let text = io::write(&a, Radix::Decimal);
    let (parsed, _) = io::read(&text, Radix::Decimal);
    parsed.magnitude() == a.magnitude()
}

#[quickcheck]
fn reduction_matches_all_ones_and_any_one(a: BitVec) -> bool {
    let all_ones = &(UBig::from(1u8) << a.width() as usize) - UBig::from(1u8);
    let expect_and = *a.magnitude() == all_ones;
    let expect_or = *a.magnitude() != UBig::from(0u8);

    let mut and_result = a.clone();
    and_result.reduce_and();
    let mut or_result = a.clone();
    or_result.reduce_or();

    and_result.to_bool() == expect_and && or_result.to_bool() == expect_or
}

// ---- Boundary behaviors -------------------------------------------------

#[test]
fn width_one_reduction_stays_width_one() {
    let a = bits(1, 1);

    let mut and_result = a.clone();
    and_result.reduce_and();
    assert_eq!(and_result.width(), 1);

    let mut not_result = a.clone();
    not_result.logical_not();
    assert_eq!(not_result.width(), 1);

    let mut eq_result = a.clone();
    eq_result.cmp_eq(&a);
    assert_eq!(eq_result.width(), 1);
}

#[rstest]
#[case::logical(8u16, 8u64, 0u64)]
fn shift_by_full_width_is_zero(#[case] width: u16, #[case] shift: u64, #[case] expected: u64) {
    let mut a = bits(width, 0xFF);
    a.shift_left(&bits(8, shift));
    assert_eq!(*a.magnitude(), UBig::from(expected));

    let mut a = bits(width, 0xFF);
    a.shift_right_logical(&bits(8, shift));
    assert_eq!(*a.magnitude(), UBig::from(expected));
}

#[test]
fn arithmetic_shift_by_full_width_sign_extends() {
    let mut positive = bits(8, 0x7F);
    positive.shift_right_arithmetic(&bits(8, 8));
    assert_eq!(*positive.magnitude(), UBig::from(0u8));

    let mut negative = bits(8, 0x80);
    negative.shift_right_arithmetic(&bits(8, 8));
    assert_eq!(*negative.magnitude(), UBig::from(0xFFu32));
}

#[test]
fn arithmetic_minus_wraps() {
    let mut a = bits(8, 5);
    a.arithmetic_minus(&bits(8, 10));
    assert_eq!(*a.magnitude(), UBig::from(251u32)); // 256 + 5 - 10
}

#[test]
fn concat_32_and_32_is_64_high_half() {
    let mut a = bits(32, 0xDEADBEEF);
    a.concat(&bits(32, 0x12345678));
    assert_eq!(a.width(), 64);
    assert_eq!(
        a.read_word::<u32>(0),
        0x1234_5678u32,
    );
    assert_eq!(a.read_word::<u32>(1), 0xDEAD_BEEFu32);
}

// ---- Concrete scenarios ----------------------------------

#[test]
fn scenario_1_bitwise_not() {
    let mut a = bits(4, 5);
    a.bitwise_not();
    assert_eq!(a.width(), 4);
    assert_eq!(*a.magnitude(), UBig::from(10u32));
    assert_eq!(codec::encode(&a), vec![0x04, 0x00, 0x01, 0x00, 0x0A]);
}

#[test]
fn scenario_2_overflow_wraps_to_zero() {
    let mut a = bits(8, 0xFF);
    a.arithmetic_plus(&bits(8, 1));
    assert_eq!(a.width(), 8);
    assert_eq!(*a.magnitude(), UBig::from(0u8));
}

#[test]
fn scenario_3_arithmetic_shift_right_sign_extends() {
    let mut a = bits(8, 0x80);
    a.shift_right_arithmetic(&bits(8, 3));
    assert_eq!(a.width(), 8);
    assert_eq!(*a.magnitude(), UBig::from(0xF0u32));
}

#[test]
fn scenario_4_concat() {
    let mut a = bits(4, 0b1010);
    a.concat(&bits(4, 0b0011));
    assert_eq!(a.width(), 8);
    assert_eq!(*a.magnitude(), UBig::from(0xA3u32));
}

#[test]
fn scenario_5_slice() {
    let mut a = bits(16, 0xABCD);
    a.slice_range(11, 4);
    assert_eq!(a.width(), 8);
    assert_eq!(*a.magnitude(), UBig::from(0xBCu32));
}

#[test]
fn scenario_6_assign_range_then_to_int() {
    let mut a = bits(32, 0);
    a.assign_range(15, 8, &bits(8, 0xAB));
    assert_eq!(a.to_int(), 0x0000AB00);
}

#[test]
fn divide_by_zero_sets_sticky_flag_and_yields_zero() {
    let mut a = bits(8, 42);
    assert!(!a.divide_by_zero());
    a.arithmetic_divide(&bits(8, 0));
    assert_eq!(*a.magnitude(), UBig::from(0u8));
    assert!(a.divide_by_zero());

    a.clear_divide_by_zero();
    assert!(!a.divide_by_zero());
}

#[test]
fn divide_by_zero_flag_not_part_of_identity() {
    let mut a = bits(8, 0);
    a.arithmetic_divide(&bits(8, 0));
    let b = bits(8, 0);
    assert!(a.divide_by_zero());
    assert!(!b.divide_by_zero());
    assert_eq!(a, b);
}

// ---- Codec edge cases ---------------------------------------------------

#[test]
fn decode_truncated_header_is_reported() {
    let err = codec::decode(&[0x04, 0x00]).unwrap_err();
    assert_eq!(
        err,
        crate::error::CodecError::Truncated {
            expected: 4,
            available: 2
        }
    );
}

#[test]
fn decode_oversized_byte_len_is_reported() {
    let bytes = [0x00, 0x00, 0xFF, 0xFF];
    let err = codec::decode(&bytes).unwrap_err();
    assert_eq!(
        err,
        crate::error::CodecError::MagnitudeTooLong {
            byte_len: 0xFFFF,
            max: crate::consts::MAX_BYTE_LEN,
        }
    );
}

#[test]
fn zero_magnitude_encodes_with_empty_byte_run() {
    let a = bits(8, 0);
    let bytes = codec::encode(&a);
    assert_eq!(bytes, vec![0x08, 0x00, 0x00, 0x00]);
    let (decoded, consumed) = codec::decode(&bytes).unwrap();
    assert_eq!(consumed, 4);
    assert_eq!(decoded, a);
}

// ---- Text I/O edge cases -------------------------------------------------

#[test]
fn parse_failure_yields_zero_width_one() {
    let (v, _) = io::read("not-a-number", Radix::Decimal);
    assert_eq!(v.width(), 1);
    assert_eq!(*v.magnitude(), UBig::from(0u8));
}

#[test]
fn read_infers_width_from_significant_bits() {
    let (v, _) = io::read("255", Radix::Decimal);
    assert_eq!(v.width(), 8);
    assert_eq!(*v.magnitude(), UBig::from(255u32));
}

#[test]
fn write_hex_has_no_prefix() {
    let a = bits(8, 0xAB);
    assert_eq!(io::write(&a, Radix::Hex), "ab");
}

// ---- Word access ----------------------------------------------------

#[test]
fn write_word_only_touches_its_window() {
    let mut a = bits(32, 0xFFFF_FFFF);
    a.write_word::<u16>(0, 0x0000);
    assert_eq!(*a.magnitude(), UBig::from(0xFFFF_0000u32));
}
