// ==========================================
// 出店计划测算引擎 - 测算结果
// ==========================================
// ProjectionResult: 不可变的测算结果, 由编排器一次性写回计划记录
// PaybackPeriod: 投资回收期, (999, 999) 表示无法回收
// ==========================================

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PaybackPeriod - 投资回收期
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaybackPeriod {
    pub years: i32,
    pub months: i32,
}

impl PaybackPeriod {
    /// 哨兵值: 月净利润 ≤ 0, 无法回收
    pub const UNRECOVERABLE: PaybackPeriod = PaybackPeriod {
        years: 999,
        months: 999,
    };

    /// 无初期投资
    pub const IMMEDIATE: PaybackPeriod = PaybackPeriod { years: 0, months: 0 };

    pub fn new(years: i32, months: i32) -> Self {
        Self { years, months }
    }

    /// 调用方在把结果当作时长使用前必须先检查
    pub fn is_unrecoverable(&self) -> bool {
        *self == Self::UNRECOVERABLE
    }
}

impl fmt::Display for PaybackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unrecoverable() {
            write!(f, "无法回收（月净利润为0或负数）")
        } else {
            write!(f, "{}年{}个月", self.years, self.months)
        }
    }
}

// ==========================================
// RevenueBasis - 营收口径
// ==========================================
// 记录营收由哪条路径算出, 用于预览/导出时的可解释性
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevenueBasis {
    /// 午市 + 晚市
    SlotBased { lunch: Decimal, dinner: Decimal },
    /// 旧版单时段（时段营收为 0 时的兜底）
    Legacy {
        opening_hours: Decimal,
        turnover_rate: Decimal,
        average_coefficient: Decimal,
    },
}

impl RevenueBasis {
    pub fn is_legacy(&self) -> bool {
        matches!(self, RevenueBasis::Legacy { .. })
    }
}

// ==========================================
// ProjectionResult - 月度收支测算结果
// ==========================================
// 恒等式: gross = revenue - cogs, profit = gross - cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub monthly_revenue: Decimal,
    pub monthly_cost_of_goods_sold: Decimal,
    pub monthly_gross_profit: Decimal,
    pub monthly_cost: Decimal,
    pub monthly_profit: Decimal,
    pub payback: PaybackPeriod,
    pub revenue_basis: RevenueBasis,
}

// ==========================================
// MonthlyProjectionPoint - 年度图表数据点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjectionPoint {
    pub month: u32, // 1..=12
    pub revenue: Decimal,
    pub cost_of_goods_sold: Decimal,
    pub fixed_cost: Decimal,
    pub profit: Decimal,
    pub cumulative_profit: Decimal,
}

impl MonthlyProjectionPoint {
    /// 当月总费用（原价 + 固定费用）
    pub fn total_cost(&self) -> Decimal {
        self.cost_of_goods_sold.saturating_add(self.fixed_cost)
    }
}
