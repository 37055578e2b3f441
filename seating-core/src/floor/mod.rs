//! Floor - 餐厅平面网格与餐桌摆放

pub mod grid;

pub use grid::{PlacementCheck, PlacementViolation, check_table_placement, validate_bounds};
