// ==========================================
// 出店计划测算引擎 - 配置层
// ==========================================
// 职责: 系数默认值管理
// 存储: config_kv 表, 未配置时回退到内置预设
// ==========================================

pub mod config_manager;
pub mod presets;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
