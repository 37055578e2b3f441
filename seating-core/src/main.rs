use seating_core::{Config, DbService, SeatingService, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载配置 (.env + 环境变量)
    let config = Config::load();

    // 2. 日志
    init_logger_with_file(Some(config.log_level.as_str()), config.log_dir.as_deref());
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        policy = ?config.placement_policy,
        "Crab Seating Core starting..."
    );

    // 3. 打开数据库并执行迁移
    let db = DbService::open(&config).await?;

    // 4. 重建占用索引
    let service = SeatingService::from_config(db, &config).await?;

    let occupied = service.occupied_tables();
    if occupied.is_empty() {
        tracing::info!("No tables occupied");
    }
    for table_id in occupied {
        let table = service.find_table(table_id).await?;
        tracing::info!(
            table_id,
            restaurant_id = table.restaurant_id,
            number = table.number,
            order_id = service.active_order_for_table(table_id),
            "Table occupied"
        );
    }

    service.db().pool.close().await;
    Ok(())
}
