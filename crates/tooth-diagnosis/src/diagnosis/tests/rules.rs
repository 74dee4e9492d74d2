use crate::diagnosis::rules::{linear_divide_offset, resolve_offset, round_score};
use crate::diagnosis::{presets, OffsetPolicy, ToneEntry};

fn linear(center: i32, divisor: i32) -> OffsetPolicy {
    OffsetPolicy::LinearDivide { center, divisor }
}

#[test]
fn linear_divide_floors_toward_negative_infinity() {
    let policy = linear(13, 3);

    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("4R-1", 22)), 3);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("3M-2", 13)), 0);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("3M-1", 12)), -1);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("1M-2", 2)), -4);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("1M-1", 1)), -4);
}

#[test]
fn linear_divide_widens_before_subtracting() {
    assert_eq!(linear_divide_offset(22, 13, 3), Some(3));
    assert_eq!(linear_divide_offset(u32::MAX, 0, 1), None);
    assert_eq!(linear_divide_offset(12, i32::MIN, 3), Some(715_827_886));
    assert_eq!(linear_divide_offset(12, i32::MIN, 1), None);
    assert_eq!(linear_divide_offset(12, 13, 0), None);
}

#[test]
fn step_buckets_take_the_first_matching_bound() {
    let policy = presets::standard().offset_policy;

    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("1M-1", 1)), -5);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("1M-2", 2)), -5);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("2L-1", 3)), -4);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("3M-1", 12)), -1);
    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("5M-1", 24)), 4);
}

#[test]
fn step_buckets_fall_back_above_the_last_bound() {
    let policy = presets::standard().offset_policy;

    assert_eq!(resolve_offset(&policy, &ToneEntry::ordinal("5M-2", 25)), 5);
}

#[test]
fn direct_lookup_reads_the_stored_offset() {
    let mut tone = ToneEntry::ordinal("B1", 4);
    tone.offset = Some(-5);

    assert_eq!(resolve_offset(&OffsetPolicy::DirectLookup, &tone), -5);
}

#[test]
fn rounding_goes_half_away_from_zero() {
    assert_eq!(round_score(5.2), 5.0);
    assert_eq!(round_score(4.8), 5.0);
    assert_eq!(round_score(2.5), 3.0);
    assert_eq!(round_score(-2.5), -3.0);
}
