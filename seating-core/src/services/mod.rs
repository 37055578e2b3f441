//! Services Module
//!
//! [`SeatingService`] is the call boundary: each public method opens exactly
//! one transaction, runs the decision, writes on success and commits.
//! Rejections roll back and come back as values; store faults come back as
//! [`AppError`].

mod floor;
mod orders;
mod reservations;

pub use floor::PlacementOutcome;
pub use reservations::ReservationOutcome;

use crate::core::{Config, PlacementPolicy};
use crate::db::DbService;
use crate::db::repository::{self, RepoError};
use crate::occupancy::TableOccupancyController;
use shared::error::{AppError, AppResult};
use sqlx::{Sqlite, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Clones share the pool, the occupancy index and the commit lock.
///
/// Commits that touch the occupancy index run under the commit lock, so the
/// index sees them in commit order within this process.
#[derive(Clone)]
pub struct SeatingService {
    db: DbService,
    policy: PlacementPolicy,
    occupancy: TableOccupancyController,
    commit_lock: Arc<Mutex<()>>,
}

impl SeatingService {
    /// Build the service and warm the occupancy index from stored orders
    pub async fn new(db: DbService, policy: PlacementPolicy) -> AppResult<Self> {
        let service = Self {
            db,
            policy,
            occupancy: TableOccupancyController::new(),
            commit_lock: Arc::new(Mutex::new(())),
        };
        service.rebuild_occupancy().await?;
        Ok(service)
    }

    pub async fn from_config(db: DbService, config: &Config) -> AppResult<Self> {
        Self::new(db, config.placement_policy).await
    }

    pub fn placement_policy(&self) -> PlacementPolicy {
        self.policy
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }

    /// Reload the table -> order index from the active dine-in orders
    pub async fn rebuild_occupancy(&self) -> AppResult<()> {
        let _guard = self.commit_lock.lock().await;
        let mut conn = self.db.pool.acquire().await.map_err(RepoError::from)?;
        let orders = repository::order::find_active_dine_in(&mut conn).await?;
        self.occupancy.rebuild(&orders);
        tracing::info!(
            occupied = self.occupancy.index().len(),
            "Occupancy index rebuilt"
        );
        Ok(())
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        Ok(self.db.pool.begin().await.map_err(RepoError::from)?)
    }
}

async fn commit(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
    tx.commit().await.map_err(RepoError::from)?;
    Ok(())
}

async fn rollback(tx: Transaction<'static, Sqlite>) -> AppResult<()> {
    tx.rollback().await.map_err(RepoError::from)?;
    Ok(())
}

fn not_found(code: shared::error::ErrorCode, what: &str, id: i64) -> AppError {
    AppError::with_message(code, format!("{what} {id} not found")).with_detail("id", id)
}
