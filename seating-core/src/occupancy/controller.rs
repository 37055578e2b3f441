//! Table occupancy state machine
//!
//! A table's `available` flag follows the dine-in order sitting at it:
//!
//! | Transition | Table effect |
//! |------------|--------------|
//! | create / switch to DINE_IN on T (active) | T reserved |
//! | DINE_IN order -> COMPLETED | its table available again |
//! | DINE_IN order moved T1 -> T2 | T1 available, T2 reserved |
//! | anything else (incl. CANCELLED, DELIVERY/TAKEAWAY) | none |
//!
//! The table row is written before the order row, both on the caller's
//! transaction. Nothing is written on rejection.

use super::index::OccupancyIndex;
use crate::db::SeatingStore;
use crate::db::repository::RepoResult;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{DiningTable, Order, OrderStatus, OrderType};
use thiserror::Error;

/// Requested order state; `status: None` keeps the current status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTransition {
    pub order_type: OrderType,
    pub table_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableEffect {
    None,
    Occupy { table_id: i64 },
    Release { table_id: i64 },
    Move { from: i64, to: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionRejection {
    #[error("table {table_id} not found")]
    TableNotFound { table_id: i64 },

    #[error("table {table_id} is occupied by order {order_id}")]
    TableOccupied { table_id: i64, order_id: i64 },

    #[error("dine-in order requires a table")]
    TableRequired,
}

impl TransitionRejection {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::TableNotFound { .. } => ErrorCode::TableNotFound,
            Self::TableOccupied { .. } => ErrorCode::TableOccupied,
            Self::TableRequired => ErrorCode::OrderTableRequired,
        }
    }
}

/// Written order plus the tables touched, in write order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedTransition {
    pub order: Order,
    pub effect: TableEffect,
    pub tables: Vec<DiningTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransitionOutcome {
    Applied(AppliedTransition),
    Rejected(TransitionRejection),
}

#[derive(Debug, Clone, Default)]
pub struct TableOccupancyController {
    index: OccupancyIndex,
}

impl TableOccupancyController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> &OccupancyIndex {
        &self.index
    }

    /// Decide and write one order transition
    ///
    /// `current` is `None` when the order is being created. Only store faults
    /// come back as `Err`; the caller rolls back on both `Err` and `Rejected`.
    pub async fn apply_order_transition<S: SeatingStore + ?Sized>(
        &self,
        store: &mut S,
        current: Option<&Order>,
        transition: &OrderTransition,
    ) -> RepoResult<TransitionOutcome> {
        let order_type = transition.order_type;
        let status = transition
            .status
            .or(current.map(|o| o.status))
            .unwrap_or_default();

        // 非堂食订单不挂桌台
        let table_id = match order_type {
            OrderType::DineIn => match transition.table_id {
                Some(id) => Some(id),
                None => return Ok(reject(current, TransitionRejection::TableRequired)),
            },
            _ => None,
        };

        let held = current.and_then(Order::occupied_table);
        let wanted = match order_type {
            OrderType::DineIn if !status.is_terminal() => table_id,
            _ => None,
        };

        let effect = match (held, wanted) {
            (None, Some(to)) => TableEffect::Occupy { table_id: to },
            (Some(from), Some(to)) if from != to => TableEffect::Move { from, to },
            (Some(from), None)
                if order_type == OrderType::DineIn && status == OrderStatus::Completed =>
            {
                TableEffect::Release { table_id: from }
            }
            _ => TableEffect::None,
        };

        // 引用了新桌台时必须存在
        let current_table = current.and_then(|o| o.table_id);
        if let Some(id) = table_id
            && Some(id) != current_table
            && !matches!(effect, TableEffect::Occupy { .. } | TableEffect::Move { .. })
            && store.get_table_by_id(id).await?.is_none()
        {
            let rejection = TransitionRejection::TableNotFound { table_id: id };
            return Ok(reject(current, rejection));
        }

        let tables = match effect {
            TableEffect::None => Vec::new(),
            TableEffect::Occupy { table_id } => {
                match self.reserve_table(store, current, table_id).await? {
                    Ok(table) => vec![table],
                    Err(rejection) => return Ok(reject(current, rejection)),
                }
            }
            TableEffect::Release { table_id } => match store.get_table_by_id(table_id).await? {
                Some(mut table) => {
                    table.available = true;
                    store.persist_table(&table).await?;
                    vec![table]
                }
                None => {
                    let rejection = TransitionRejection::TableNotFound { table_id };
                    return Ok(reject(current, rejection));
                }
            },
            TableEffect::Move { from, to } => {
                let Some(mut source) = store.get_table_by_id(from).await? else {
                    let rejection = TransitionRejection::TableNotFound { table_id: from };
                    return Ok(reject(current, rejection));
                };
                let target = match self.reserve_table(store, current, to).await? {
                    Ok(table) => table,
                    Err(rejection) => return Ok(reject(current, rejection)),
                };
                source.available = true;
                store.persist_table(&source).await?;
                vec![source, target]
            }
        };

        let order = match current {
            None => store.insert_order(order_type, table_id, status).await?,
            Some(existing) => {
                let updated = Order {
                    order_type,
                    table_id,
                    status,
                    updated_at: shared::util::now_millis(),
                    ..existing.clone()
                };
                store.persist_order(&updated).await?;
                updated
            }
        };

        tracing::debug!(
            order_id = order.id,
            ?effect,
            status = ?order.status,
            "Order transition applied"
        );
        Ok(TransitionOutcome::Applied(AppliedTransition {
            order,
            effect,
            tables,
        }))
    }

    /// Mirror a committed transition into the index
    pub fn commit(&self, applied: &AppliedTransition) {
        self.index
            .assign(applied.order.id, applied.order.occupied_table());
    }

    pub fn active_order_for(&self, table_id: i64) -> Option<i64> {
        self.index.active_order(table_id)
    }

    pub fn rebuild(&self, orders: &[Order]) {
        self.index.rebuild(orders);
    }

    /// Mark `table_id` reserved unless another active order already holds it
    async fn reserve_table<S: SeatingStore + ?Sized>(
        &self,
        store: &mut S,
        current: Option<&Order>,
        table_id: i64,
    ) -> RepoResult<Result<DiningTable, TransitionRejection>> {
        let Some(mut table) = store.get_table_by_id(table_id).await? else {
            return Ok(Err(TransitionRejection::TableNotFound { table_id }));
        };
        if let Some(order_id) = store
            .find_active_order_for_table(table_id, current.map(|o| o.id))
            .await?
        {
            let rejection = TransitionRejection::TableOccupied { table_id, order_id };
            return Ok(Err(rejection));
        }
        table.available = false;
        store.persist_table(&table).await?;
        Ok(Ok(table))
    }
}

fn reject(current: Option<&Order>, rejection: TransitionRejection) -> TransitionOutcome {
    tracing::debug!(order_id = current.map(|o| o.id), %rejection, "Order transition rejected");
    TransitionOutcome::Rejected(rejection)
}
