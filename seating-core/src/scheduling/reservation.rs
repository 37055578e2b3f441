//! 预订冲突检测
//!
//! 只做判断，不写库。调用方在 `Conflict` 时拒绝写入并把原因返回给用户。

use super::slot_calendar::overlaps;
use crate::db::SeatingStore;
use crate::db::repository::RepoResult;
use serde::Serialize;
use shared::error::ErrorCode;
use shared::models::{ReservationCandidate, TimeSlot};

/// The existing booking a candidate collides with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationConflict {
    pub booking_id: i64,
    pub start_slot: TimeSlot,
    pub end_slot: TimeSlot,
}

impl ReservationConflict {
    pub fn error_code(&self) -> ErrorCode {
        ErrorCode::BookingConflict
    }

    pub fn message(&self) -> String {
        format!(
            "table already booked {}-{} (booking {})",
            self.start_slot, self.end_slot, self.booking_id
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationCheck {
    Clear,
    Conflict(ReservationConflict),
}

impl ReservationCheck {
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }
}

/// Check `candidate` against the non-cancelled bookings of its table and date
///
/// The booking named by `exclude_booking_id` is skipped so an edit never
/// collides with itself. The first collision by start slot, then id, wins.
pub async fn check_reservation<S: SeatingStore + ?Sized>(
    store: &mut S,
    candidate: &ReservationCandidate,
) -> RepoResult<ReservationCheck> {
    let existing = store
        .find_bookings(
            candidate.table_id,
            candidate.booking_date,
            candidate.exclude_booking_id,
        )
        .await?;

    let (start, end) = (candidate.start_slot, candidate.end_slot);
    let conflict = existing
        .iter()
        .filter(|b| b.status.blocks_slots())
        .filter(|b| Some(b.id) != candidate.exclude_booking_id)
        .find(|b| overlaps(start, end, b.start_slot, b.end_slot));

    match conflict {
        Some(booking) => {
            tracing::debug!(
                table_id = candidate.table_id,
                booking_id = booking.id,
                date = %candidate.booking_date,
                "Reservation conflicts with existing booking"
            );
            Ok(ReservationCheck::Conflict(ReservationConflict {
                booking_id: booking.id,
                start_slot: booking.start_slot,
                end_slot: booking.end_slot,
            }))
        }
        None => Ok(ReservationCheck::Clear),
    }
}
