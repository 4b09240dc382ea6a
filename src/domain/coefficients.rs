// ==========================================
// 出店计划测算引擎 - 销售系数
// ==========================================
// 月度系数: 按自然月 1..12 的季节性系数, 名义值 1.0
// 销售系数(旧版): 按曜日/节前日的系数, 仅旧版单时段计划使用
// ==========================================
// 注: 平均值只对"已填写"的条目求平均, 未填写的月份不按 0 计入
// ==========================================

use std::collections::BTreeMap;

// ==========================================
// MonthlyCoefficients - 月度季节系数
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyCoefficients {
    // 下标 0..=11 对应 1..=12 月
    values: [Option<f64>; 12],
}

impl MonthlyCoefficients {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全部月份使用同一系数
    pub fn uniform(value: f64) -> Self {
        Self {
            values: [Some(value); 12],
        }
    }

    /// 从存储格式 {"1": 1.0, ..., "12": 1.2} 解析
    ///
    /// 月份键不在 1..=12 范围内的条目会被丢弃并记录警告
    pub fn from_map(map: &BTreeMap<String, f64>) -> Self {
        let mut coefficients = Self::new();
        for (key, value) in map {
            match key.trim().parse::<u32>() {
                Ok(month) if (1..=12).contains(&month) => {
                    coefficients.set(month, *value);
                }
                _ => {
                    tracing::warn!(month_key = %key, value, "月度系数键无效，已忽略");
                }
            }
        }
        coefficients
    }

    /// 设置指定月份(1..=12)的系数, 越界月份忽略
    pub fn set(&mut self, month: u32, value: f64) {
        if (1..=12).contains(&month) {
            self.values[(month - 1) as usize] = Some(value);
        }
    }

    /// 已填写的月份数
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.present_count() == 0
    }

    /// 按 1..12 月顺序迭代已填写的系数
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    /// 已填写月份的算术平均, 全部未填写时返回 None
    pub fn mean(&self) -> Option<f64> {
        float_mean(self.present_values())
    }
}

// ==========================================
// SalesCoefficients - 曜日/节前日销售系数（旧版）
// ==========================================
// 迭代顺序固定: monday..sunday, holiday_eve, 其余键按字典序
pub const SALES_COEFFICIENT_KEYS: [&str; 8] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
    "holiday_eve",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesCoefficients {
    entries: Vec<(String, f64)>,
}

impl SalesCoefficients {
    pub fn from_map(map: &BTreeMap<String, f64>) -> Self {
        let mut entries: Vec<(String, f64)> = SALES_COEFFICIENT_KEYS
            .iter()
            .filter_map(|key| map.get(*key).map(|v| (key.to_string(), *v)))
            .collect();

        for (key, value) in map {
            if !SALES_COEFFICIENT_KEYS.contains(&key.as_str()) {
                entries.push((key.clone(), *value));
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 全部条目的算术平均, 为空时返回 None
    pub fn mean(&self) -> Option<f64> {
        float_mean(self.entries.iter().map(|(_, v)| *v))
    }
}

/// 按迭代顺序从 0.0 开始依次累加后求平均
fn float_mean<I: Iterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
