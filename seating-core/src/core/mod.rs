//! 核心模块 - 配置
//!
//! - [`Config`] - 座位核心配置
//! - [`PlacementPolicy`] - 餐桌摆放碰撞策略

pub mod config;

pub use config::{Config, PlacementPolicy};
