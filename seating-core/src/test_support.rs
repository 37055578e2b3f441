//! Fixtures shared by unit tests

use crate::db::repository;
use shared::models::{DiningTable, DiningTableCreate, Restaurant, RestaurantCreate};
use sqlx::SqliteConnection;

pub async fn seed_restaurant(conn: &mut SqliteConnection, max_x: i32, max_y: i32) -> Restaurant {
    repository::restaurant::create(
        conn,
        &RestaurantCreate {
            name: "Main Hall".into(),
            max_x,
            max_y,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_table(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    number: i32,
    start: (i32, i32),
    end: (i32, i32),
) -> DiningTable {
    repository::dining_table::create(
        conn,
        &DiningTableCreate {
            restaurant_id,
            number,
            capacity: None,
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
        },
    )
    .await
    .unwrap()
}
