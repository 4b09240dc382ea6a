// ==========================================
// 出店计划测算引擎 - 时段营收计算
// ==========================================
// 公式: 月营收 = 客单价 × 日客数 × (营业曜日数 × 4.33) × 平均月度系数
// 红线: 4.33 (平均每月周数) 是固定简化值, 不按日历精确计算
// 红线: 平均系数只对已填写的月份求平均, 未填写任何月份时取 1.0
// ==========================================
// 边界: 客单价 ≤ 0 / 日客数 ≤ 0 / 无营业曜日 → 营收为 0 (不报错)
// 边界: 乘积超出 Decimal 范围时饱和为 Decimal::MAX (不 panic)
// ==========================================

use crate::domain::coefficients::MonthlyCoefficients;
use crate::domain::plan::TimeSlotAssumptions;
use crate::domain::types::WeekdaySet;
use crate::engine::rounding::{decimal_from_float_repr, round_half_up};
use rust_decimal::Decimal;
use tracing::debug;

/// 平均每月周数 (4.33)
pub const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(433, 0, 0, false, 2);

// ==========================================
// TimeSlotRevenueCalculator - 时段营收计算器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeSlotRevenueCalculator;

impl TimeSlotRevenueCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 计算单个时段的月营收
    ///
    /// # 参数
    /// - price_per_customer: 客单价
    /// - customers_per_day: 日客数
    /// - operating_days: 营业曜日
    /// - monthly_coefficients: 月度系数（可为空）
    ///
    /// # 返回
    /// 取整后的月营收, 退化输入返回 0
    pub fn compute_slot_revenue(
        &self,
        price_per_customer: Decimal,
        customers_per_day: i64,
        operating_days: &WeekdaySet,
        monthly_coefficients: &MonthlyCoefficients,
    ) -> Decimal {
        if price_per_customer <= Decimal::ZERO
            || customers_per_day <= 0
            || operating_days.is_empty()
        {
            return Decimal::ZERO;
        }

        let monthly_operating_days = Decimal::from(operating_days.len() as u64) * WEEKS_PER_MONTH;
        let avg_coefficient = average_monthly_coefficient(monthly_coefficients);

        let revenue = price_per_customer
            .saturating_mul(Decimal::from(customers_per_day))
            .saturating_mul(monthly_operating_days)
            .saturating_mul(avg_coefficient);

        round_half_up(revenue)
    }

    /// 计算时段假设的月营收
    pub fn compute_for_slot(&self, slot: &TimeSlotAssumptions) -> Decimal {
        let revenue = self.compute_slot_revenue(
            slot.price_per_customer,
            slot.customers_per_day,
            &slot.operating_days,
            &slot.monthly_coefficients,
        );

        debug!(
            slot = %slot.kind,
            operating_days = slot.operating_days.len(),
            coefficient_months = slot.monthly_coefficients.present_count(),
            revenue = %revenue,
            "时段营收计算完成"
        );

        revenue
    }
}

/// 已填写月份的平均系数, 未填写时为 1.0
pub fn average_monthly_coefficient(coefficients: &MonthlyCoefficients) -> Decimal {
    coefficients
        .mean()
        .map(decimal_from_float_repr)
        .unwrap_or(Decimal::ONE)
}
