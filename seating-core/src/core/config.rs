use std::path::PathBuf;
use std::str::FromStr;

/// 餐桌布局碰撞检测策略
///
/// `CornerMatch` 只比较起止角坐标是否完全相同；`Intersection` 额外拒绝
/// 任何矩形相交的摆放。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementPolicy {
    #[default]
    CornerMatch,
    Intersection,
}

impl FromStr for PlacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corner" | "corner_match" => Ok(Self::CornerMatch),
            "intersection" | "intersect" => Ok(Self::Intersection),
            other => Err(format!("Unknown placement policy: {other}")),
        }
    }
}

/// 座位核心配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/crab/seating | 工作目录 |
/// | DATABASE_FILE | seating.db | 数据库文件名 (位于 WORK_DIR 内) |
/// | DB_MAX_CONNECTIONS | 5 | 连接池大小 |
/// | DB_BUSY_TIMEOUT_MS | 5000 | SQLite busy timeout (毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 滚动日志目录 |
/// | ENVIRONMENT | development | 运行环境 |
/// | PLACEMENT_POLICY | corner | corner / intersection |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/tmp/seating PLACEMENT_POLICY=intersection cargo run -p seating-core
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放数据库和日志
    pub work_dir: String,
    /// 数据库文件名
    pub database_file: String,
    pub db_max_connections: u32,
    pub db_busy_timeout_ms: u64,
    pub log_level: String,
    /// 设置后日志同时写入该目录 (按天滚动)
    pub log_dir: Option<String>,
    /// 运行环境: development | production
    pub environment: String,
    pub placement_policy: PlacementPolicy,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/crab/seating".into()),
            database_file: std::env::var("DATABASE_FILE").unwrap_or_else(|_| "seating.db".into()),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            db_busy_timeout_ms: std::env::var("DB_BUSY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            placement_policy: std::env::var("PLACEMENT_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// 先读取 `.env`，再从环境变量加载
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// 使用自定义工作目录覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 数据库文件完整路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.database_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
