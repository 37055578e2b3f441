//! Scheduling - 时段与预订冲突
//!
//! - [`slot_calendar`] - 时段序号与半开区间重叠判断
//! - [`reservation`] - 预订冲突检测

pub mod reservation;
pub mod slot_calendar;

pub use reservation::{ReservationCheck, ReservationConflict, check_reservation};
pub use slot_calendar::{overlaps, slot_ordinal, validate_range};
