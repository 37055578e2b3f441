//! Time Slot Model (预订时段)
//!
//! The booking day is a closed, ordered set of 30-minute slots
//! `00:00`, `00:30`, ... `23:30`. Each slot carries its rank explicitly;
//! ordering and persistence use the rank, never a textual form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of slots in one booking day
pub const SLOTS_PER_DAY: u8 = 48;

/// Length of one slot in minutes
pub const SLOT_MINUTES: u32 = 30;

/// Invalid slot input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeSlotError {
    #[error("slot rank {0} is outside 0..{SLOTS_PER_DAY}")]
    RankOutOfRange(i64),
    #[error("'{0}' is not a HH:MM slot on a 30-minute boundary")]
    InvalidFormat(String),
}

/// One 30-minute slot of the booking day, ordered by rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(transparent))]
pub struct TimeSlot(u8);

impl TimeSlot {
    pub const FIRST: TimeSlot = TimeSlot(0);
    pub const LAST: TimeSlot = TimeSlot(SLOTS_PER_DAY - 1);

    /// Slot with the given rank
    pub fn new(rank: u8) -> Result<Self, TimeSlotError> {
        if rank < SLOTS_PER_DAY {
            Ok(Self(rank))
        } else {
            Err(TimeSlotError::RankOutOfRange(rank as i64))
        }
    }

    /// Slot starting at `hour:minute`; minute must be 0 or 30
    pub fn at(hour: u32, minute: u32) -> Result<Self, TimeSlotError> {
        if hour >= 24 || minute % SLOT_MINUTES != 0 || minute >= 60 {
            return Err(TimeSlotError::InvalidFormat(format!("{hour:02}:{minute:02}")));
        }
        Ok(Self((hour * 2 + minute / SLOT_MINUTES) as u8))
    }

    /// Stable ordinal of this slot within the day
    pub const fn rank(self) -> u8 {
        self.0
    }

    pub const fn hour(self) -> u32 {
        self.0 as u32 / 2
    }

    pub const fn minute(self) -> u32 {
        (self.0 as u32 % 2) * SLOT_MINUTES
    }

    /// The following slot, `None` after `23:30`
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    /// All slots of the day in order
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..SLOTS_PER_DAY).map(TimeSlot)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeSlot {
    type Err = TimeSlotError;

    /// Accepts exactly `HH:MM`, two ASCII digits on each side
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TimeSlotError::InvalidFormat(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
        if !two_digits(h) || !two_digits(m) {
            return Err(invalid());
        }
        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let minute: u32 = m.parse().map_err(|_| invalid())?;
        Self::at(hour, minute).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

impl TryFrom<i64> for TimeSlot {
    type Error = TimeSlotError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| TimeSlotError::RankOutOfRange(value))
            .and_then(Self::new)
    }
}
