//! Booking Model (桌台预订)

use super::time_slot::TimeSlot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BookingStatus {
    #[default]
    Booked,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Cancelled bookings never block a slot
    pub fn blocks_slots(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Booking entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: i64,
    pub table_id: i64,
    /// Customer reference (owned by the customer directory)
    pub customer_id: i64,
    pub booking_date: NaiveDate,
    pub start_slot: TimeSlot,
    pub end_slot: TimeSlot,
    pub status: BookingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub table_id: i64,
    pub customer_id: i64,
    pub booking_date: NaiveDate,
    pub start_slot: TimeSlot,
    pub end_slot: TimeSlot,
}

/// Reschedule booking payload; missing fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingReschedule {
    pub table_id: Option<i64>,
    pub booking_date: Option<NaiveDate>,
    pub start_slot: Option<TimeSlot>,
    pub end_slot: Option<TimeSlot>,
}

/// A booking request to be checked against existing bookings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationCandidate {
    pub table_id: i64,
    pub booking_date: NaiveDate,
    pub start_slot: TimeSlot,
    pub end_slot: TimeSlot,
    /// Booking being edited; never conflicts with itself
    pub exclude_booking_id: Option<i64>,
}

impl From<&BookingCreate> for ReservationCandidate {
    fn from(data: &BookingCreate) -> Self {
        Self {
            table_id: data.table_id,
            booking_date: data.booking_date,
            start_slot: data.start_slot,
            end_slot: data.end_slot,
            exclude_booking_id: None,
        }
    }
}
