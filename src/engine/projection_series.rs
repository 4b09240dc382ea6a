// ==========================================
// 出店计划测算引擎 - 年度收支序列
// ==========================================
// 用途: 预览画面的 12 个月收支图表
// 口径: 每月取相同的月度测算值, 不再叠加月别系数
// ==========================================

use crate::domain::projection::{MonthlyProjectionPoint, ProjectionResult};
use rust_decimal::Decimal;

pub const MONTHS_IN_SERIES: u32 = 12;

/// 构建 12 个月的收支序列（含累计利润）
pub fn build_annual_series(result: &ProjectionResult) -> Vec<MonthlyProjectionPoint> {
    let mut cumulative_profit = Decimal::ZERO;

    (1..=MONTHS_IN_SERIES)
        .map(|month| {
            cumulative_profit = cumulative_profit.saturating_add(result.monthly_profit);
            MonthlyProjectionPoint {
                month,
                revenue: result.monthly_revenue,
                cost_of_goods_sold: result.monthly_cost_of_goods_sold,
                fixed_cost: result.monthly_cost,
                profit: result.monthly_profit,
                cumulative_profit,
            }
        })
        .collect()
}
