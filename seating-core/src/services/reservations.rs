//! Reservation operations

use super::{SeatingService, commit, not_found, rollback};
use crate::db::{SeatingStore, SqliteStore};
use crate::db::repository::{self, RepoError};
use crate::scheduling::{self, ReservationCheck, ReservationConflict};
use chrono::NaiveDate;
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Booking, BookingCreate, BookingReschedule, BookingStatus, ReservationCandidate,
};
use sqlx::SqliteConnection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationOutcome {
    Booked(Booking),
    Conflict(ReservationConflict),
}

impl SeatingService {
    /// Decide whether `candidate` fits without writing anything
    pub async fn check_reservation(
        &self,
        candidate: &ReservationCandidate,
    ) -> AppResult<ReservationCheck> {
        scheduling::validate_range(candidate.start_slot, candidate.end_slot)?;
        let mut tx = self.begin().await?;
        ensure_table(&mut tx, candidate.table_id).await?;
        let check =
            scheduling::check_reservation(&mut SqliteStore::new(&mut tx), candidate).await?;
        rollback(tx).await?;
        Ok(check)
    }

    /// Book a table slot range unless it collides with an existing booking
    pub async fn reserve(&self, data: BookingCreate) -> AppResult<ReservationOutcome> {
        scheduling::validate_range(data.start_slot, data.end_slot)?;
        let mut tx = self.begin().await?;
        ensure_table(&mut tx, data.table_id).await?;

        let candidate = ReservationCandidate::from(&data);
        let check =
            scheduling::check_reservation(&mut SqliteStore::new(&mut tx), &candidate).await?;
        if let ReservationCheck::Conflict(conflict) = check {
            rollback(tx).await?;
            tracing::warn!(
                table_id = data.table_id,
                date = %data.booking_date,
                conflicting_booking = conflict.booking_id,
                "Reservation rejected: {}",
                conflict.message()
            );
            return Ok(ReservationOutcome::Conflict(conflict));
        }

        let booking = repository::booking::create(&mut tx, &data).await?;
        commit(tx).await?;
        tracing::info!(
            booking_id = booking.id,
            table_id = booking.table_id,
            date = %booking.booking_date,
            start = %booking.start_slot,
            end = %booking.end_slot,
            "Booking created"
        );
        Ok(ReservationOutcome::Booked(booking))
    }

    /// Move a booking to another table, date or slot range
    ///
    /// The booking is re-checked against everything but itself.
    pub async fn reschedule_booking(
        &self,
        booking_id: i64,
        changes: BookingReschedule,
    ) -> AppResult<ReservationOutcome> {
        let mut tx = self.begin().await?;
        let existing = load_booking(&mut tx, booking_id).await?;
        ensure_open(&existing)?;

        let booking = Booking {
            table_id: changes.table_id.unwrap_or(existing.table_id),
            booking_date: changes.booking_date.unwrap_or(existing.booking_date),
            start_slot: changes.start_slot.unwrap_or(existing.start_slot),
            end_slot: changes.end_slot.unwrap_or(existing.end_slot),
            updated_at: shared::util::now_millis(),
            ..existing
        };
        scheduling::validate_range(booking.start_slot, booking.end_slot)?;
        if booking.table_id != existing.table_id {
            ensure_table(&mut tx, booking.table_id).await?;
        }

        let candidate = ReservationCandidate {
            table_id: booking.table_id,
            booking_date: booking.booking_date,
            start_slot: booking.start_slot,
            end_slot: booking.end_slot,
            exclude_booking_id: Some(booking.id),
        };
        let check =
            scheduling::check_reservation(&mut SqliteStore::new(&mut tx), &candidate).await?;
        if let ReservationCheck::Conflict(conflict) = check {
            rollback(tx).await?;
            tracing::warn!(
                booking_id,
                conflicting_booking = conflict.booking_id,
                "Reschedule rejected: {}",
                conflict.message()
            );
            return Ok(ReservationOutcome::Conflict(conflict));
        }

        SqliteStore::new(&mut tx).persist_booking(&booking).await?;
        commit(tx).await?;
        tracing::info!(
            booking_id,
            table_id = booking.table_id,
            date = %booking.booking_date,
            start = %booking.start_slot,
            end = %booking.end_slot,
            "Booking rescheduled"
        );
        Ok(ReservationOutcome::Booked(booking))
    }

    /// Cancel a booking; its slots stop blocking other reservations
    pub async fn cancel_booking(&self, booking_id: i64) -> AppResult<Booking> {
        self.set_booking_status(booking_id, BookingStatus::Cancelled)
            .await
    }

    pub async fn complete_booking(&self, booking_id: i64) -> AppResult<Booking> {
        self.set_booking_status(booking_id, BookingStatus::Completed)
            .await
    }

    pub async fn find_booking(&self, booking_id: i64) -> AppResult<Booking> {
        let mut conn = self.db.pool.acquire().await.map_err(RepoError::from)?;
        load_booking(&mut conn, booking_id).await
    }

    /// Non-cancelled bookings of a table on one date, in slot order
    pub async fn find_bookings(&self, table_id: i64, date: NaiveDate) -> AppResult<Vec<Booking>> {
        let mut conn = self.db.pool.acquire().await.map_err(RepoError::from)?;
        let mut store = SqliteStore::new(&mut conn);
        Ok(store.find_bookings(table_id, date, None).await?)
    }

    async fn set_booking_status(
        &self,
        booking_id: i64,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        let mut tx = self.begin().await?;
        let mut booking = load_booking(&mut tx, booking_id).await?;
        ensure_open(&booking)?;
        booking.status = status;
        booking.updated_at = shared::util::now_millis();
        SqliteStore::new(&mut tx).persist_booking(&booking).await?;
        commit(tx).await?;
        tracing::info!(booking_id, status = ?status, "Booking status changed");
        Ok(booking)
    }
}

async fn ensure_table(conn: &mut SqliteConnection, table_id: i64) -> AppResult<()> {
    match repository::dining_table::find_by_id(conn, table_id).await? {
        Some(_) => Ok(()),
        None => Err(not_found(ErrorCode::TableNotFound, "Table", table_id)),
    }
}

async fn load_booking(conn: &mut SqliteConnection, booking_id: i64) -> AppResult<Booking> {
    repository::booking::find_by_id(conn, booking_id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::BookingNotFound, "Booking", booking_id))
}

/// Cancelled and completed bookings are closed
fn ensure_open(booking: &Booking) -> AppResult<()> {
    let (code, state) = match booking.status {
        BookingStatus::Cancelled => (ErrorCode::BookingAlreadyCancelled, "cancelled"),
        BookingStatus::Completed => (ErrorCode::BookingAlreadyCompleted, "completed"),
        _ => return Ok(()),
    };
    let message = format!("Booking {} is {state}", booking.id);
    Err(AppError::with_message(code, message).with_detail("id", booking.id))
}
