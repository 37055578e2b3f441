//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Dining table entity (桌台)
///
/// The footprint is an inclusive rectangle on the restaurant floor grid.
/// `available` is owned by the occupancy controller; layout edits never
/// write it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    pub restaurant_id: i64,
    pub number: i32,
    pub capacity: i32,
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    pub available: bool,
}

impl DiningTable {
    pub fn rect(&self) -> GridRect {
        GridRect {
            start: GridPoint::new(self.start_x, self.start_y),
            end: GridPoint::new(self.end_x, self.end_y),
        }
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub restaurant_id: i64,
    pub number: i32,
    pub capacity: Option<i32>,
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
}

/// Update dining table payload (layout edit)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub number: Option<i32>,
    pub capacity: Option<i32>,
    pub start_x: Option<i32>,
    pub start_y: Option<i32>,
    pub end_x: Option<i32>,
    pub end_y: Option<i32>,
}

/// A cell on the floor grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}

impl GridPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Inclusive rectangle on the floor grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub start: GridPoint,
    pub end: GridPoint,
}

impl GridRect {
    /// True when the two rectangles share at least one cell
    pub fn intersects(&self, other: &GridRect) -> bool {
        !(self.end.x < other.start.x
            || other.end.x < self.start.x
            || self.end.y < other.start.y
            || other.end.y < self.start.y)
    }
}

/// Placement request checked against the other tables of a restaurant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePlacement {
    pub restaurant_id: i64,
    pub number: i32,
    pub rect: GridRect,
    /// Table being edited; its own corners and number never collide
    pub exclude_table_id: Option<i64>,
}

impl From<&DiningTableCreate> for TablePlacement {
    fn from(data: &DiningTableCreate) -> Self {
        Self {
            restaurant_id: data.restaurant_id,
            number: data.number,
            rect: GridRect {
                start: GridPoint::new(data.start_x, data.start_y),
                end: GridPoint::new(data.end_x, data.end_y),
            },
            exclude_table_id: None,
        }
    }
}
