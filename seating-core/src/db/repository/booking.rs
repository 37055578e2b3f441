//! Booking Repository

use super::{RepoError, RepoResult};
use chrono::NaiveDate;
use shared::models::{Booking, BookingCreate, BookingStatus};
use sqlx::SqliteConnection;

const COLUMNS: &str =
    "id, table_id, customer_id, booking_date, start_slot, end_slot, status, created_at, updated_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Booking>> {
    let sql = format!("SELECT {COLUMNS} FROM booking WHERE id = ?");
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(booking)
}

/// Non-cancelled bookings of a table on one date, in slot order
pub async fn find_active_for_table_on_date(
    conn: &mut SqliteConnection,
    table_id: i64,
    date: NaiveDate,
    exclude_id: Option<i64>,
) -> RepoResult<Vec<Booking>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM booking WHERE table_id = ?1 AND booking_date = ?2 AND status != ?3 AND (?4 IS NULL OR id != ?4) ORDER BY start_slot, id"
    );
    let bookings = sqlx::query_as::<_, Booking>(&sql)
        .bind(table_id)
        .bind(date)
        .bind(BookingStatus::Cancelled)
        .bind(exclude_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(bookings)
}

pub async fn create(conn: &mut SqliteConnection, data: &BookingCreate) -> RepoResult<Booking> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO booking (table_id, customer_id, booking_date, start_slot, end_slot, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.table_id)
    .bind(data.customer_id)
    .bind(data.booking_date)
    .bind(data.start_slot)
    .bind(data.end_slot)
    .bind(BookingStatus::Booked)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create booking".into()))
}

/// Write slot, table, date and status of an existing booking
pub async fn save(conn: &mut SqliteConnection, booking: &Booking) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE booking SET table_id = ?1, booking_date = ?2, start_slot = ?3, end_slot = ?4, status = ?5, updated_at = ?6 WHERE id = ?7",
    )
    .bind(booking.table_id)
    .bind(booking.booking_date)
    .bind(booking.start_slot)
    .bind(booking.end_slot)
    .bind(booking.status)
    .bind(booking.updated_at)
    .bind(booking.id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        let id = booking.id;
        return Err(RepoError::NotFound(format!("Booking {id} not found")));
    }
    Ok(())
}
