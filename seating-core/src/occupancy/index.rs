//! 桌台占用索引 (table id -> active order id)
//!
//! Order 只持有 table_id，反向关系放在这里，避免相互引用。
//! 只在事务提交之后更新。

use parking_lot::RwLock;
use shared::models::Order;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    tables: Arc<RwLock<HashMap<i64, i64>>>,
}

impl OccupancyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole index with the tables held by `orders`
    pub fn rebuild<'a>(&self, orders: impl IntoIterator<Item = &'a Order>) {
        let rebuilt: HashMap<i64, i64> = orders
            .into_iter()
            .filter_map(|o| o.occupied_table().map(|table_id| (table_id, o.id)))
            .collect();
        *self.tables.write() = rebuilt;
    }

    /// Point `order_id` at `table_id`, dropping whatever table it held before
    pub fn assign(&self, order_id: i64, table_id: Option<i64>) {
        let mut tables = self.tables.write();
        tables.retain(|_, held_by| *held_by != order_id);
        if let Some(table_id) = table_id {
            tables.insert(table_id, order_id);
        }
    }

    pub fn active_order(&self, table_id: i64) -> Option<i64> {
        self.tables.read().get(&table_id).copied()
    }

    pub fn is_occupied(&self, table_id: i64) -> bool {
        self.tables.read().contains_key(&table_id)
    }

    /// Occupied table ids, ascending
    pub fn occupied_tables(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.tables.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}
