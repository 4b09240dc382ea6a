// ==========================================
// 出店计划测算引擎 - 月度原价(COGS)计算
// ==========================================
// 主路径: Σ 时段营收 × 时段原价率 / 100 (只统计营收 > 0 的时段)
// 兜底路径(旧版): 时段合计为 0 且旧版时间存在时, 按月营收的 30% 计
// ==========================================
// 注: 时段营收重新计算, 不读取计划上缓存的结果字段
// ==========================================

use crate::domain::plan::PlanAssumptions;
use crate::engine::revenue::RevenueAggregator;
use crate::engine::rounding::round_half_up;
use crate::engine::slot_revenue::TimeSlotRevenueCalculator;
use rust_decimal::Decimal;
use tracing::debug;

/// 旧版固定原价率 (0.3)
pub const LEGACY_COST_RATIO: Decimal = Decimal::from_parts(3, 0, 0, false, 1);

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

#[derive(Debug, Clone, Copy, Default)]
pub struct CostOfGoodsCalculator {
    slot_calculator: TimeSlotRevenueCalculator,
    revenue: RevenueAggregator,
}

impl CostOfGoodsCalculator {
    pub fn new() -> Self {
        Self {
            slot_calculator: TimeSlotRevenueCalculator::new(),
            revenue: RevenueAggregator::new(),
        }
    }

    /// 计算月度原价
    pub fn compute_monthly_cogs(&self, assumptions: &PlanAssumptions) -> Decimal {
        let mut cogs = Decimal::ZERO;

        for slot in assumptions.slots() {
            let slot_revenue = self.slot_calculator.compute_slot_revenue(
                slot.price_per_customer,
                slot.customers_per_day,
                &slot.operating_days,
                &slot.monthly_coefficients,
            );
            if slot_revenue > Decimal::ZERO {
                let slot_cogs = slot_revenue.saturating_mul(slot.cost_rate_pct) / PERCENT;
                cogs = cogs.saturating_add(slot_cogs);
            }
        }

        if cogs.is_zero() && assumptions.legacy.is_some() {
            let monthly_revenue = self.revenue.compute_monthly_revenue(assumptions);
            cogs = monthly_revenue.saturating_mul(LEGACY_COST_RATIO);
            debug!(
                monthly_revenue = %monthly_revenue,
                "时段原价为0，按月营收30%计算原价"
            );
        }

        round_half_up(cogs)
    }
}
