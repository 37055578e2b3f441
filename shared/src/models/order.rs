//! Order Model
//!
//! Only the fields the seating core needs: type, status and the table the
//! order sits at. Items, payments and delivery data live elsewhere.

use serde::{Deserialize, Serialize};

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderType {
    DineIn,
    Delivery,
    Takeaway,
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// COMPLETED and CANCELLED orders no longer hold a table
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_type: OrderType,
    /// Non-owning table reference, present only for dine-in orders
    pub table_id: Option<i64>,
    pub status: OrderStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// The table this order currently occupies, if any
    pub fn occupied_table(&self) -> Option<i64> {
        match self.order_type {
            OrderType::DineIn if !self.status.is_terminal() => self.table_id,
            _ => None,
        }
    }
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_type: OrderType,
    pub table_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

/// Update order payload; missing fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order_type: Option<OrderType>,
    pub table_id: Option<i64>,
    pub status: Option<OrderStatus>,
}
