// ==========================================
// 出店计划测算引擎 - 内置系数预设
// ==========================================
// 用途: 未录入系数时的默认值, config_kv 未配置或格式错误时回退到这里
// ==========================================

use std::collections::BTreeMap;

/// 曜日别销售系数（旧模式）
pub const DEFAULT_SALES_COEFFICIENTS: [(&str, f64); 8] = [
    ("monday", 0.8),
    ("tuesday", 0.9),
    ("wednesday", 0.9),
    ("thursday", 1.0),
    ("friday", 1.2),
    ("saturday", 1.3),
    ("sunday", 1.1),
    ("holiday_eve", 1.5),
];

/// 月别系数默认值（全年持平）
pub const DEFAULT_MONTHLY_COEFFICIENT: f64 = 1.0;

pub fn default_sales_coefficients() -> BTreeMap<String, f64> {
    DEFAULT_SALES_COEFFICIENTS
        .iter()
        .map(|(key, value)| (key.to_string(), *value))
        .collect()
}

pub fn default_monthly_coefficients() -> BTreeMap<String, f64> {
    (1..=12u32)
        .map(|month| (month.to_string(), DEFAULT_MONTHLY_COEFFICIENT))
        .collect()
}
