// ==========================================
// 出店计划测算引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + rust_decimal
// 系统定位: 出店计划的收支测算 (营收 → 原价 → 固定费用 → 回收期)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 测算规则
pub mod engine;

// 配置层 - 系数默认值
pub mod config;

// 数据仓储层 - 数据访问
pub mod repository;

// API 层 - 用例接口
pub mod api;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{SlotKind, Weekday, WeekdaySet};

// 领域实体
pub use domain::{
    MonthlyProjectionPoint, PaybackPeriod, PlanAssumptions, ProjectionResult, RevenueBasis,
    StorePlan,
};

// 引擎
pub use engine::{EngineError, NoOpCommitter, PlanCommitter, PlanProjectionEngine};

// API
pub use api::{ApiError, PlanPreview, PlanProjectionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "出店计划测算引擎";
