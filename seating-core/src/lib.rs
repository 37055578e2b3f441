//! Crab Seating Core - 餐厅桌台预订与占用核心
//!
//! # 架构概述
//!
//! - **时段** (`scheduling`): 30 分钟时段序号、半开区间重叠、预订冲突检测
//! - **平面** (`floor`): 餐厅网格上的餐桌摆放校验
//! - **占用** (`occupancy`): 订单生命周期驱动桌台 `available` 状态
//! - **数据库** (`db`): 嵌入式 SQLite 存储 (sqlx)
//! - **服务** (`services`): 每次调用一个事务的业务入口
//!
//! # 模块结构
//!
//! ```text
//! seating-core/src/
//! ├── core/          # 配置
//! ├── db/            # 连接池、迁移、仓储、存储接口
//! ├── scheduling/    # 时段与预订冲突
//! ├── floor/         # 餐桌摆放
//! ├── occupancy/     # 占用状态机与索引
//! ├── services/      # SeatingService
//! └── utils/         # 日志
//! ```

pub mod core;
pub mod db;
pub mod floor;
pub mod occupancy;
pub mod scheduling;
pub mod services;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export 公共类型
pub use crate::core::{Config, PlacementPolicy};
pub use db::{DbService, SeatingStore, SqliteStore};
pub use floor::{PlacementCheck, PlacementViolation};
pub use occupancy::{
    OccupancyIndex, OrderTransition, TableEffect, TableOccupancyController, TransitionOutcome,
    TransitionRejection,
};
pub use scheduling::{ReservationCheck, ReservationConflict};
pub use services::{PlacementOutcome, ReservationOutcome, SeatingService};

// Re-export unified error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
