//! Order Repository

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderStatus, OrderType};
use sqlx::SqliteConnection;

const COLUMNS: &str = "id, order_type, table_id, status, created_at, updated_at";

pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(order)
}

/// Dine-in orders that still hold their table
pub async fn find_active_dine_in(conn: &mut SqliteConnection) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM orders WHERE order_type = ?1 AND table_id IS NOT NULL AND status NOT IN (?2, ?3) ORDER BY created_at, id"
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(OrderType::DineIn)
        .bind(OrderStatus::Completed)
        .bind(OrderStatus::Cancelled)
        .fetch_all(&mut *conn)
        .await?;
    Ok(orders)
}

/// The active dine-in order sitting at `table_id`, ignoring `exclude_id`
pub async fn find_active_for_table(
    conn: &mut SqliteConnection,
    table_id: i64,
    exclude_id: Option<i64>,
) -> RepoResult<Option<i64>> {
    let id: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM orders WHERE table_id = ?1 AND order_type = ?2 AND status NOT IN (?3, ?4) AND (?5 IS NULL OR id != ?5) ORDER BY created_at, id LIMIT 1",
    )
    .bind(table_id)
    .bind(OrderType::DineIn)
    .bind(OrderStatus::Completed)
    .bind(OrderStatus::Cancelled)
    .bind(exclude_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(id)
}

pub async fn create(
    conn: &mut SqliteConnection,
    order_type: OrderType,
    table_id: Option<i64>,
    status: OrderStatus,
) -> RepoResult<Order> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO orders (order_type, table_id, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(order_type)
    .bind(table_id)
    .bind(status)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

pub async fn save(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET order_type = ?1, table_id = ?2, status = ?3, updated_at = ?4 WHERE id = ?5",
    )
    .bind(order.order_type)
    .bind(order.table_id)
    .bind(order.status)
    .bind(order.updated_at)
    .bind(order.id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        let id = order.id;
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}
