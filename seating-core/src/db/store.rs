//! Storage collaborator used by the seating decisions
//!
//! The decision modules only see [`SeatingStore`]; [`SqliteStore`] binds it to
//! one open connection, normally the caller's transaction.

use super::repository::{self, RepoResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::models::{Booking, DiningTable, GridPoint, Order, OrderStatus, OrderType};
use sqlx::SqliteConnection;

#[async_trait]
pub trait SeatingStore: Send {
    /// Non-cancelled bookings of `table_id` on `date`, ordered by start slot then id
    async fn find_bookings(
        &mut self,
        table_id: i64,
        date: NaiveDate,
        exclude_id: Option<i64>,
    ) -> RepoResult<Vec<Booking>>;

    async fn get_table_by_id(&mut self, id: i64) -> RepoResult<Option<DiningTable>>;

    async fn find_tables_in_restaurant(
        &mut self,
        restaurant_id: i64,
        exclude_id: Option<i64>,
    ) -> RepoResult<Vec<DiningTable>>;

    async fn exists_table_at_start_corner(
        &mut self,
        restaurant_id: i64,
        corner: GridPoint,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool>;

    async fn exists_table_at_end_corner(
        &mut self,
        restaurant_id: i64,
        corner: GridPoint,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool>;

    async fn exists_table_number(
        &mut self,
        restaurant_id: i64,
        number: i32,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool>;

    /// Id of the active dine-in order holding `table_id`, if any
    async fn find_active_order_for_table(
        &mut self,
        table_id: i64,
        exclude_order_id: Option<i64>,
    ) -> RepoResult<Option<i64>>;

    async fn persist_table(&mut self, table: &DiningTable) -> RepoResult<()>;

    async fn persist_booking(&mut self, booking: &Booking) -> RepoResult<()>;

    async fn insert_order(
        &mut self,
        order_type: OrderType,
        table_id: Option<i64>,
        status: OrderStatus,
    ) -> RepoResult<Order>;

    async fn persist_order(&mut self, order: &Order) -> RepoResult<()>;
}

/// [`SeatingStore`] over a borrowed SQLite connection
pub struct SqliteStore<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SeatingStore for SqliteStore<'_> {
    async fn find_bookings(
        &mut self,
        table_id: i64,
        date: NaiveDate,
        exclude_id: Option<i64>,
    ) -> RepoResult<Vec<Booking>> {
        repository::booking::find_active_for_table_on_date(self.conn, table_id, date, exclude_id)
            .await
    }

    async fn get_table_by_id(&mut self, id: i64) -> RepoResult<Option<DiningTable>> {
        repository::dining_table::find_by_id(self.conn, id).await
    }

    async fn find_tables_in_restaurant(
        &mut self,
        restaurant_id: i64,
        exclude_id: Option<i64>,
    ) -> RepoResult<Vec<DiningTable>> {
        repository::dining_table::find_by_restaurant(self.conn, restaurant_id, exclude_id).await
    }

    async fn exists_table_at_start_corner(
        &mut self,
        restaurant_id: i64,
        corner: GridPoint,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool> {
        repository::dining_table::exists_at_start(self.conn, restaurant_id, corner, exclude_id)
            .await
    }

    async fn exists_table_at_end_corner(
        &mut self,
        restaurant_id: i64,
        corner: GridPoint,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool> {
        repository::dining_table::exists_at_end(self.conn, restaurant_id, corner, exclude_id).await
    }

    async fn exists_table_number(
        &mut self,
        restaurant_id: i64,
        number: i32,
        exclude_id: Option<i64>,
    ) -> RepoResult<bool> {
        repository::dining_table::exists_number(self.conn, restaurant_id, number, exclude_id).await
    }

    async fn find_active_order_for_table(
        &mut self,
        table_id: i64,
        exclude_order_id: Option<i64>,
    ) -> RepoResult<Option<i64>> {
        repository::order::find_active_for_table(self.conn, table_id, exclude_order_id).await
    }

    async fn persist_table(&mut self, table: &DiningTable) -> RepoResult<()> {
        repository::dining_table::save(self.conn, table).await
    }

    async fn persist_booking(&mut self, booking: &Booking) -> RepoResult<()> {
        repository::booking::save(self.conn, booking).await
    }

    async fn insert_order(
        &mut self,
        order_type: OrderType,
        table_id: Option<i64>,
        status: OrderStatus,
    ) -> RepoResult<Order> {
        repository::order::create(self.conn, order_type, table_id, status).await
    }

    async fn persist_order(&mut self, order: &Order) -> RepoResult<()> {
        repository::order::save(self.conn, order).await
    }
}
