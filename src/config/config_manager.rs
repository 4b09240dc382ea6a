// ==========================================
// 出店计划测算引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope), 当前只使用 global 作用域
// ==========================================

use crate::config::presets;
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        let manager = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        manager.ensure_table()?;
        Ok(manager)
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        let manager = Self { conn };
        manager.ensure_table()?;
        Ok(manager)
    }

    fn ensure_table(&self) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            );
            "#,
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global 作用域配置（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::debug!(config_key = key, "配置已更新");
        Ok(())
    }

    // ===== 系数默认值 =====

    /// 获取曜日别销售系数默认值（旧模式）
    ///
    /// 配置格式为 JSON: {"monday": 0.8, ..., "holiday_eve": 1.5}
    /// 未配置、格式错误或为空时回退到内置预设
    pub fn get_default_sales_coefficients(&self) -> Result<BTreeMap<String, f64>, Box<dyn Error>> {
        self.get_coefficient_map(
            config_keys::DEFAULT_SALES_COEFFICIENTS,
            presets::default_sales_coefficients,
        )
    }

    /// 获取月别系数默认值
    ///
    /// 配置格式为 JSON: {"1": 1.0, ..., "12": 1.0}
    pub fn get_default_monthly_coefficients(
        &self,
    ) -> Result<BTreeMap<String, f64>, Box<dyn Error>> {
        self.get_coefficient_map(
            config_keys::DEFAULT_MONTHLY_COEFFICIENTS,
            presets::default_monthly_coefficients,
        )
    }

    fn get_coefficient_map(
        &self,
        key: &str,
        fallback: fn() -> BTreeMap<String, f64>,
    ) -> Result<BTreeMap<String, f64>, Box<dyn Error>> {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(fallback()),
        };

        match serde_json::from_str::<BTreeMap<String, f64>>(&raw) {
            Ok(map) if !map.is_empty() => Ok(map),
            Ok(_) => Ok(fallback()),
            Err(e) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    error = %e,
                    "系数配置格式错误，使用内置预设"
                );
                Ok(fallback())
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 系数默认值 (JSON)
    pub const DEFAULT_SALES_COEFFICIENTS: &str = "default_sales_coefficients";
    pub const DEFAULT_MONTHLY_COEFFICIENTS: &str = "default_monthly_coefficients";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_missing_value_returns_none() {
        let manager = memory_manager();
        assert_eq!(manager.get_global_config_value("nope").unwrap(), None);
    }

    #[test]
    fn test_set_then_get_overwrites() {
        let manager = memory_manager();
        manager.set_global_config_value("k", "1").unwrap();
        manager.set_global_config_value("k", "2").unwrap();
        assert_eq!(manager.get_global_config_value("k").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_sales_coefficients_fall_back_to_presets() {
        let manager = memory_manager();
        let map = manager.get_default_sales_coefficients().unwrap();
        assert_eq!(map, presets::default_sales_coefficients());
    }

    #[test]
    fn test_configured_monthly_coefficients() {
        let manager = memory_manager();
        manager
            .set_global_config_value(config_keys::DEFAULT_MONTHLY_COEFFICIENTS, r#"{"8": 1.2}"#)
            .unwrap();
        let map = manager.get_default_monthly_coefficients().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("8"), Some(&1.2));
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let manager = memory_manager();
        manager
            .set_global_config_value(config_keys::DEFAULT_SALES_COEFFICIENTS, "not json")
            .unwrap();
        let map = manager.get_default_sales_coefficients().unwrap();
        assert_eq!(map, presets::default_sales_coefficients());
    }
}
