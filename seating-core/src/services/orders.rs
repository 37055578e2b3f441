//! Order lifecycle operations
//!
//! Every write goes through the occupancy controller so the table flag and
//! the order row commit together.

use super::{SeatingService, commit, not_found, rollback};
use crate::db::SqliteStore;
use crate::db::repository::{self, RepoError};
use crate::occupancy::{AppliedTransition, OrderTransition, TableEffect, TransitionOutcome};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderCreate, OrderStatus, OrderUpdate};
use sqlx::{Sqlite, SqliteConnection, Transaction};

impl SeatingService {
    pub async fn create_order(&self, data: OrderCreate) -> AppResult<TransitionOutcome> {
        let transition = OrderTransition {
            order_type: data.order_type,
            table_id: data.table_id,
            status: data.status,
        };
        self.apply_order_transition(None, &transition).await
    }

    /// Change type, table or status of an open order
    ///
    /// Fields left `None` keep their current value.
    pub async fn update_order(
        &self,
        order_id: i64,
        changes: OrderUpdate,
    ) -> AppResult<TransitionOutcome> {
        let current = self.find_order(order_id).await?;
        let transition = OrderTransition {
            order_type: changes.order_type.unwrap_or(current.order_type),
            table_id: changes.table_id.or(current.table_id),
            status: changes.status,
        };
        self.apply_order_transition(Some(order_id), &transition)
            .await
    }

    /// Run one order transition in its own transaction
    ///
    /// `order_id: None` creates the order. Completed and cancelled orders are
    /// closed and refuse further transitions.
    pub async fn apply_order_transition(
        &self,
        order_id: Option<i64>,
        transition: &OrderTransition,
    ) -> AppResult<TransitionOutcome> {
        let mut tx = self.begin().await?;
        let current = match order_id {
            Some(id) => {
                let order = load_order(&mut tx, id).await?;
                ensure_open(&order)?;
                Some(order)
            }
            None => None,
        };

        let mut store = SqliteStore::new(&mut tx);
        let outcome = self
            .occupancy
            .apply_order_transition(&mut store, current.as_ref(), transition)
            .await?;

        match outcome {
            TransitionOutcome::Rejected(rejection) => {
                rollback(tx).await?;
                tracing::warn!(
                    order_id,
                    table_id = transition.table_id,
                    code = rejection.error_code().code(),
                    "Order transition rejected: {rejection}"
                );
                Ok(TransitionOutcome::Rejected(rejection))
            }
            TransitionOutcome::Applied(applied) => {
                self.commit_applied(tx, &applied).await?;
                match applied.effect {
                    TableEffect::None => tracing::info!(
                        order_id = applied.order.id,
                        status = ?applied.order.status,
                        "Order saved"
                    ),
                    effect => tracing::info!(
                        order_id = applied.order.id,
                        status = ?applied.order.status,
                        ?effect,
                        "Order saved, table occupancy changed"
                    ),
                }
                Ok(TransitionOutcome::Applied(applied))
            }
        }
    }

    /// Commit `tx`, then mirror `applied` into the occupancy index
    ///
    /// Both steps run under the commit lock, so clones sharing the index apply
    /// their updates in the order their transactions committed.
    async fn commit_applied(
        &self,
        tx: Transaction<'static, Sqlite>,
        applied: &AppliedTransition,
    ) -> AppResult<()> {
        let _guard = self.commit_lock.lock().await;
        commit(tx).await?;
        // 提交成功后才更新索引
        self.occupancy.commit(applied);
        Ok(())
    }

    /// Active dine-in order holding `table_id`, from the occupancy index
    pub fn active_order_for_table(&self, table_id: i64) -> Option<i64> {
        self.occupancy.active_order_for(table_id)
    }

    /// Table ids currently held by active dine-in orders
    pub fn occupied_tables(&self) -> Vec<i64> {
        self.occupancy.index().occupied_tables()
    }

    pub async fn find_order(&self, order_id: i64) -> AppResult<Order> {
        let mut conn = self.db.pool.acquire().await.map_err(RepoError::from)?;
        load_order(&mut conn, order_id).await
    }
}

async fn load_order(conn: &mut SqliteConnection, order_id: i64) -> AppResult<Order> {
    repository::order::find_by_id(conn, order_id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::OrderNotFound, "Order", order_id))
}

fn ensure_open(order: &Order) -> AppResult<()> {
    let code = match order.status {
        OrderStatus::Completed => ErrorCode::OrderAlreadyCompleted,
        OrderStatus::Cancelled => ErrorCode::OrderAlreadyCancelled,
        _ => return Ok(()),
    };
    Err(AppError::new(code).with_detail("id", order.id))
}
