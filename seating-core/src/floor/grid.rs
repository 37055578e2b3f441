//! 餐桌布局校验
//!
//! 同一餐厅内按顺序检查：起始角、结束角、桌号。默认只比较角坐标是否完全相同，
//! 不判断矩形是否相交；[`PlacementPolicy::Intersection`] 才会额外拒绝相交。

use crate::core::PlacementPolicy;
use crate::db::SeatingStore;
use crate::db::repository::RepoResult;
use serde::Serialize;
use shared::error::ErrorCode;
use shared::models::{GridPoint, GridRect, Restaurant, TablePlacement};
use thiserror::Error;

/// Rule a table placement violates
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "rule", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementViolation {
    #[error("start position {corner} taken")]
    StartCornerTaken { corner: GridPoint },

    #[error("end position {corner} taken")]
    EndCornerTaken { corner: GridPoint },

    #[error("table number {number} taken")]
    NumberTaken { number: i32 },

    #[error("rectangle {start}-{end} is outside the {max_x}x{max_y} floor")]
    OutOfBounds {
        start: GridPoint,
        end: GridPoint,
        max_x: i32,
        max_y: i32,
    },

    #[error("rectangle overlaps table {number} (id {table_id})")]
    Overlaps { table_id: i64, number: i32 },
}

impl PlacementViolation {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::StartCornerTaken { .. } => ErrorCode::TableStartPositionTaken,
            Self::EndCornerTaken { .. } => ErrorCode::TableEndPositionTaken,
            Self::NumberTaken { .. } => ErrorCode::TableNumberTaken,
            Self::OutOfBounds { .. } => ErrorCode::TableOutOfBounds,
            Self::Overlaps { .. } => ErrorCode::TableOverlaps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementCheck {
    Clear,
    Rejected(PlacementViolation),
}

impl PlacementCheck {
    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }
}

/// Rectangle must lie inside `[0, max_x) x [0, max_y)` with start <= end
pub fn validate_bounds(rect: GridRect, restaurant: &Restaurant) -> Result<(), PlacementViolation> {
    let GridRect { start, end } = rect;
    let inside = (0..restaurant.max_x).contains(&start.x)
        && (0..restaurant.max_y).contains(&start.y)
        && (start.x..restaurant.max_x).contains(&end.x)
        && (start.y..restaurant.max_y).contains(&end.y);
    if inside {
        Ok(())
    } else {
        Err(PlacementViolation::OutOfBounds {
            start,
            end,
            max_x: restaurant.max_x,
            max_y: restaurant.max_y,
        })
    }
}

/// Check `placement` against the other tables of its restaurant
///
/// `exclude_table_id` lets an edited table keep its own corners and number.
pub async fn check_table_placement<S: SeatingStore + ?Sized>(
    store: &mut S,
    placement: &TablePlacement,
    policy: PlacementPolicy,
) -> RepoResult<PlacementCheck> {
    let restaurant_id = placement.restaurant_id;
    let exclude = placement.exclude_table_id;
    let GridRect { start, end } = placement.rect;

    let violation = if store
        .exists_table_at_start_corner(restaurant_id, start, exclude)
        .await?
    {
        Some(PlacementViolation::StartCornerTaken { corner: start })
    } else if store
        .exists_table_at_end_corner(restaurant_id, end, exclude)
        .await?
    {
        Some(PlacementViolation::EndCornerTaken { corner: end })
    } else if store
        .exists_table_number(restaurant_id, placement.number, exclude)
        .await?
    {
        Some(PlacementViolation::NumberTaken {
            number: placement.number,
        })
    } else if policy == PlacementPolicy::Intersection {
        store
            .find_tables_in_restaurant(restaurant_id, exclude)
            .await?
            .into_iter()
            .find(|other| other.rect().intersects(&placement.rect))
            .map(|other| PlacementViolation::Overlaps {
                table_id: other.id,
                number: other.number,
            })
    } else {
        None
    };

    match violation {
        Some(violation) => {
            tracing::debug!(
                restaurant_id,
                number = placement.number,
                %violation,
                "Table placement rejected"
            );
            Ok(PlacementCheck::Rejected(violation))
        }
        None => Ok(PlacementCheck::Clear),
    }
}
