//! Occupancy - 订单生命周期驱动的桌台占用状态

pub mod controller;
pub mod index;

pub use controller::{
    AppliedTransition, OrderTransition, TableEffect, TableOccupancyController, TransitionOutcome,
    TransitionRejection,
};
pub use index::OccupancyIndex;
