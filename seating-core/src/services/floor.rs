//! Floor layout operations

use super::{SeatingService, commit, not_found, rollback};
use crate::db::SqliteStore;
use crate::db::repository::{self, RepoError};
use crate::floor::{self, PlacementCheck, PlacementViolation};
use serde::Serialize;
use shared::error::{AppResult, ErrorCode};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, Restaurant, RestaurantCreate,
    TablePlacement,
};
use sqlx::SqliteConnection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementOutcome {
    Placed(DiningTable),
    Rejected(PlacementViolation),
}

impl SeatingService {
    pub async fn create_restaurant(&self, data: RestaurantCreate) -> AppResult<Restaurant> {
        let mut tx = self.begin().await?;
        let restaurant = repository::restaurant::create(&mut tx, &data).await?;
        commit(tx).await?;
        tracing::info!(
            restaurant_id = restaurant.id,
            max_x = restaurant.max_x,
            max_y = restaurant.max_y,
            "Restaurant created"
        );
        Ok(restaurant)
    }

    pub async fn find_restaurant(&self, restaurant_id: i64) -> AppResult<Restaurant> {
        let mut conn = self.db.pool.acquire().await.map_err(RepoError::from)?;
        load_restaurant(&mut conn, restaurant_id).await
    }

    /// Bounds plus the collision rules of the configured policy, no writes
    pub async fn check_table_placement(
        &self,
        placement: &TablePlacement,
    ) -> AppResult<PlacementCheck> {
        let mut tx = self.begin().await?;
        let check = self.decide_placement(&mut tx, placement).await?;
        rollback(tx).await?;
        Ok(check)
    }

    /// Add a table to a restaurant floor
    pub async fn place_table(&self, data: DiningTableCreate) -> AppResult<PlacementOutcome> {
        let mut tx = self.begin().await?;
        let placement = TablePlacement::from(&data);
        let check = self.decide_placement(&mut tx, &placement).await?;
        if let PlacementCheck::Rejected(violation) = check {
            rollback(tx).await?;
            tracing::warn!(
                restaurant_id = data.restaurant_id,
                number = data.number,
                code = violation.error_code().code(),
                "Table placement rejected: {violation}"
            );
            return Ok(PlacementOutcome::Rejected(violation));
        }

        let table = repository::dining_table::create(&mut tx, &data).await?;
        commit(tx).await?;
        tracing::info!(
            table_id = table.id,
            restaurant_id = table.restaurant_id,
            number = table.number,
            "Table placed at {}-{}",
            table.rect().start,
            table.rect().end
        );
        Ok(PlacementOutcome::Placed(table))
    }

    /// Renumber, resize or move a table; its `available` flag is left alone
    pub async fn move_table(
        &self,
        table_id: i64,
        changes: DiningTableUpdate,
    ) -> AppResult<PlacementOutcome> {
        let mut tx = self.begin().await?;
        let existing = load_table(&mut tx, table_id).await?;
        let table = DiningTable {
            number: changes.number.unwrap_or(existing.number),
            capacity: changes.capacity.unwrap_or(existing.capacity),
            start_x: changes.start_x.unwrap_or(existing.start_x),
            start_y: changes.start_y.unwrap_or(existing.start_y),
            end_x: changes.end_x.unwrap_or(existing.end_x),
            end_y: changes.end_y.unwrap_or(existing.end_y),
            ..existing
        };

        let placement = TablePlacement {
            restaurant_id: table.restaurant_id,
            number: table.number,
            rect: table.rect(),
            exclude_table_id: Some(table.id),
        };
        let check = self.decide_placement(&mut tx, &placement).await?;
        if let PlacementCheck::Rejected(violation) = check {
            rollback(tx).await?;
            tracing::warn!(
                table_id,
                code = violation.error_code().code(),
                "Table move rejected: {violation}"
            );
            return Ok(PlacementOutcome::Rejected(violation));
        }

        repository::dining_table::save(&mut tx, &table).await?;
        commit(tx).await?;
        tracing::info!(
            table_id,
            number = table.number,
            "Table moved to {}-{}",
            table.rect().start,
            table.rect().end
        );
        Ok(PlacementOutcome::Placed(table))
    }

    pub async fn find_table(&self, table_id: i64) -> AppResult<DiningTable> {
        let mut conn = self.db.pool.acquire().await.map_err(RepoError::from)?;
        load_table(&mut conn, table_id).await
    }

    pub async fn list_tables(&self, restaurant_id: i64) -> AppResult<Vec<DiningTable>> {
        let mut conn = self.db.pool.acquire().await.map_err(RepoError::from)?;
        let tables =
            repository::dining_table::find_by_restaurant(&mut conn, restaurant_id, None).await?;
        Ok(tables)
    }

    async fn decide_placement(
        &self,
        conn: &mut SqliteConnection,
        placement: &TablePlacement,
    ) -> AppResult<PlacementCheck> {
        let restaurant = load_restaurant(conn, placement.restaurant_id).await?;
        if let Err(violation) = floor::validate_bounds(placement.rect, &restaurant) {
            return Ok(PlacementCheck::Rejected(violation));
        }
        let mut store = SqliteStore::new(conn);
        let check = floor::check_table_placement(&mut store, placement, self.policy).await?;
        Ok(check)
    }
}

async fn load_restaurant(conn: &mut SqliteConnection, restaurant_id: i64) -> AppResult<Restaurant> {
    repository::restaurant::find_by_id(conn, restaurant_id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::RestaurantNotFound, "Restaurant", restaurant_id))
}

async fn load_table(conn: &mut SqliteConnection, table_id: i64) -> AppResult<DiningTable> {
    repository::dining_table::find_by_id(conn, table_id)
        .await?
        .ok_or_else(|| not_found(ErrorCode::TableNotFound, "Table", table_id))
}

