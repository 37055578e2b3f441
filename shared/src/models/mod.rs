//! Data models
//!
//! Shared between the seating core and its callers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod booking;
pub mod dining_table;
pub mod order;
pub mod restaurant;
pub mod time_slot;

// Re-exports
pub use booking::*;
pub use dining_table::*;
pub use order::*;
pub use restaurant::*;
pub use time_slot::*;
