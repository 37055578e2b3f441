//! Restaurant Repository

use super::{RepoError, RepoResult};
use shared::models::{Restaurant, RestaurantCreate};
use sqlx::SqliteConnection;

pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<Restaurant>> {
    let sql = "SELECT id, name, max_x, max_y FROM restaurant WHERE id = ?";
    let restaurant = sqlx::query_as::<_, Restaurant>(sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(restaurant)
}

pub async fn create(
    conn: &mut SqliteConnection,
    data: &RestaurantCreate,
) -> RepoResult<Restaurant> {
    if data.max_x <= 0 || data.max_y <= 0 {
        return Err(RepoError::Validation(format!(
            "Grid size must be positive, got {}x{}",
            data.max_x, data.max_y
        )));
    }
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO restaurant (name, max_x, max_y, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4) RETURNING id",
    )
    .bind(&data.name)
    .bind(data.max_x)
    .bind(data.max_y)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;
    find_by_id(conn, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create restaurant".into()))
}
