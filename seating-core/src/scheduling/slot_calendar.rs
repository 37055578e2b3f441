//! 时段计算
//!
//! 预订日按 30 分钟切成 48 个时段，按序号比较。区间一律半开 `[start, end)`，
//! 首尾相接不算冲突。

use shared::error::{AppError, ErrorCode};
use shared::models::TimeSlot;

/// Stable rank of `slot` in the daily enumeration (`00:00` = 0 … `23:30` = 47)
#[inline]
pub fn slot_ordinal(slot: TimeSlot) -> u8 {
    slot.rank()
}

/// Half-open interval overlap: `a_start < b_end && b_start < a_end`
pub fn overlaps(a_start: TimeSlot, a_end: TimeSlot, b_start: TimeSlot, b_end: TimeSlot) -> bool {
    slot_ordinal(a_start) < slot_ordinal(b_end) && slot_ordinal(b_start) < slot_ordinal(a_end)
}

/// End slot must rank strictly after the start slot
pub fn validate_range(start: TimeSlot, end: TimeSlot) -> Result<(), AppError> {
    if slot_ordinal(end) <= slot_ordinal(start) {
        return Err(AppError::with_message(
            ErrorCode::BookingInvalidSlotRange,
            format!("End slot {end} must be after start slot {start}"),
        )
        .with_detail("start_slot", start.to_string())
        .with_detail("end_slot", end.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(s: &str) -> TimeSlot {
        s.parse().unwrap()
    }

    fn overlap(a: (&str, &str), b: (&str, &str)) -> bool {
        overlaps(slot(a.0), slot(a.1), slot(b.0), slot(b.1))
    }

    #[test]
    fn test_ordinal_bounds() {
        assert_eq!(slot_ordinal(slot("00:00")), 0);
        assert_eq!(slot_ordinal(slot("10:30")), 21);
        assert_eq!(slot_ordinal(slot("23:30")), 47);
    }

    #[test]
    fn test_adjacent_intervals_do_not_overlap() {
        assert!(!overlap(("10:00", "11:00"), ("11:00", "12:00")));
        assert!(!overlap(("11:00", "12:00"), ("10:00", "11:00")));
    }

    #[test]
    fn test_partial_and_nested_overlap() {
        assert!(overlap(("10:00", "11:00"), ("10:30", "11:30")));
        assert!(overlap(("09:00", "13:00"), ("10:00", "10:30")));
        assert!(overlap(("10:00", "11:00"), ("10:00", "11:00")));
    }

    #[test]
    fn test_overlap_is_symmetric_over_all_ranges() {
        let slots: Vec<TimeSlot> = TimeSlot::all().step_by(3).collect();
        for (i, &a1) in slots.iter().enumerate() {
            for &a2 in &slots[i + 1..] {
                for (j, &b1) in slots.iter().enumerate() {
                    for &b2 in &slots[j + 1..] {
                        assert_eq!(
                            overlaps(a1, a2, b1, b2),
                            overlaps(b1, b2, a1, a2),
                            "{a1}-{a2} vs {b1}-{b2}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range(slot("10:00"), slot("10:30")).is_ok());

        let err = validate_range(slot("11:00"), slot("11:00")).unwrap_err();
        assert_eq!(err.code, ErrorCode::BookingInvalidSlotRange);
        assert!(validate_range(slot("12:00"), slot("11:00")).is_err());
    }
}
