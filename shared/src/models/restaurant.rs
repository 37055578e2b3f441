//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant entity with its floor grid size (门店平面)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    /// Grid columns; valid x coordinates are `0..max_x`
    pub max_x: i32,
    /// Grid rows; valid y coordinates are `0..max_y`
    pub max_y: i32,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub max_x: i32,
    pub max_y: i32,
}
