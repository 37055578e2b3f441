//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, GridPoint};
use sqlx::SqliteConnection;

const COLUMNS: &str =
    "id, restaurant_id, number, capacity, start_x, start_y, end_x, end_y, available";

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM dining_table WHERE id = ?");
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(table)
}

/// All tables of a restaurant, optionally skipping the one being edited
pub async fn find_by_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    exclude_id: Option<i64>,
) -> RepoResult<Vec<DiningTable>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM dining_table WHERE restaurant_id = ?1 AND (?2 IS NULL OR id != ?2) ORDER BY number"
    );
    let tables = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(restaurant_id)
        .bind(exclude_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(tables)
}

pub async fn exists_at_start(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    corner: GridPoint,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM dining_table WHERE restaurant_id = ?1 AND start_x = ?2 AND start_y = ?3 AND (?4 IS NULL OR id != ?4))",
    )
    .bind(restaurant_id)
    .bind(corner.x)
    .bind(corner.y)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(found)
}

pub async fn exists_at_end(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    corner: GridPoint,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM dining_table WHERE restaurant_id = ?1 AND end_x = ?2 AND end_y = ?3 AND (?4 IS NULL OR id != ?4))",
    )
    .bind(restaurant_id)
    .bind(corner.x)
    .bind(corner.y)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(found)
}

pub async fn exists_number(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    number: i32,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM dining_table WHERE restaurant_id = ?1 AND number = ?2 AND (?3 IS NULL OR id != ?3))",
    )
    .bind(restaurant_id)
    .bind(number)
    .bind(exclude_id)
    .fetch_one(&mut *conn)
    .await?;
    Ok(found)
}

pub async fn create(
    conn: &mut SqliteConnection,
    data: &DiningTableCreate,
) -> RepoResult<DiningTable> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO dining_table (restaurant_id, number, capacity, start_x, start_y, end_x, end_y, available, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8) RETURNING id",
    )
    .bind(data.restaurant_id)
    .bind(data.number)
    .bind(data.capacity.unwrap_or(4))
    .bind(data.start_x)
    .bind(data.start_y)
    .bind(data.end_x)
    .bind(data.end_y)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

/// Write every column of an existing table row
pub async fn save(conn: &mut SqliteConnection, table: &DiningTable) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET number = ?1, capacity = ?2, start_x = ?3, start_y = ?4, end_x = ?5, end_y = ?6, available = ?7, updated_at = ?8 WHERE id = ?9",
    )
    .bind(table.number)
    .bind(table.capacity)
    .bind(table.start_x)
    .bind(table.start_y)
    .bind(table.end_x)
    .bind(table.end_y)
    .bind(table.available)
    .bind(now)
    .bind(table.id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        let id = table.id;
        return Err(RepoError::NotFound(format!("Dining table {id} not found")));
    }
    Ok(())
}
