//! Unified error codes for the seating core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Booking errors
//! - 7xxx: Table / floor layout errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the POS front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,
    /// Dine-in order without a table
    OrderTableRequired = 4008,

    // ==================== 5xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 5001,
    /// Booking collides with an existing booking
    BookingConflict = 5002,
    /// End slot is not after start slot
    BookingInvalidSlotRange = 5003,
    /// Booking has already been cancelled
    BookingAlreadyCancelled = 5004,
    /// Booking has already been completed
    BookingAlreadyCompleted = 5005,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied
    TableOccupied = 7002,
    /// Another table starts at the same grid position
    TableStartPositionTaken = 7005,
    /// Another table ends at the same grid position
    TableEndPositionTaken = 7006,
    /// Table number already used in this restaurant
    TableNumberTaken = 7007,
    /// Table rectangle outside the restaurant grid
    TableOutOfBounds = 7008,
    /// Table rectangle intersects another table
    TableOverlaps = 7009,
    /// Restaurant not found
    RestaurantNotFound = 7101,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyCompleted => "Order has already been completed",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderTableRequired => "Dine-in order requires a table",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::BookingConflict => "Booking conflicts with an existing booking",
            ErrorCode::BookingInvalidSlotRange => "End slot must be after start slot",
            ErrorCode::BookingAlreadyCancelled => "Booking has already been cancelled",
            ErrorCode::BookingAlreadyCompleted => "Booking has already been completed",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableStartPositionTaken => "Start position taken",
            ErrorCode::TableEndPositionTaken => "End position taken",
            ErrorCode::TableNumberTaken => "Table number taken",
            ErrorCode::TableOutOfBounds => "Table is outside the restaurant grid",
            ErrorCode::TableOverlaps => "Table overlaps another table",
            ErrorCode::RestaurantNotFound => "Restaurant not found",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::OrderAlreadyCompleted),
            4004 => Ok(ErrorCode::OrderAlreadyCancelled),
            4008 => Ok(ErrorCode::OrderTableRequired),

            // Booking
            5001 => Ok(ErrorCode::BookingNotFound),
            5002 => Ok(ErrorCode::BookingConflict),
            5003 => Ok(ErrorCode::BookingInvalidSlotRange),
            5004 => Ok(ErrorCode::BookingAlreadyCancelled),
            5005 => Ok(ErrorCode::BookingAlreadyCompleted),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7005 => Ok(ErrorCode::TableStartPositionTaken),
            7006 => Ok(ErrorCode::TableEndPositionTaken),
            7007 => Ok(ErrorCode::TableNumberTaken),
            7008 => Ok(ErrorCode::TableOutOfBounds),
            7009 => Ok(ErrorCode::TableOverlaps),
            7101 => Ok(ErrorCode::RestaurantNotFound),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::BookingConflict.code(), 5002);
        assert_eq!(ErrorCode::TableOccupied.code(), 7002);
        assert_eq!(ErrorCode::TableStartPositionTaken.code(), 7005);
        assert_eq!(ErrorCode::RestaurantNotFound.code(), 7101);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_roundtrips_known_codes() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::OrderTableRequired,
            ErrorCode::BookingInvalidSlotRange,
            ErrorCode::BookingAlreadyCompleted,
            ErrorCode::TableNumberTaken,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_unknown_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::TableOccupied).unwrap();
        assert_eq!(json, "7002");
        let code: ErrorCode = serde_json::from_str("5002").unwrap();
        assert_eq!(code, ErrorCode::BookingConflict);
        assert!(serde_json::from_str::<ErrorCode>("1234").is_err());
    }
}
