// ==========================================
// 出店计划测算引擎 - 月营收汇总
// ==========================================
// 主路径: 月营收 = 午市营收 + 晚市营收
// 兜底路径(旧版): 时段合计为 0 且旧版营业开始/结束时间都存在时启用
//   营业小时数 = 结束 - 开始 (结束 ≤ 开始时视为次日, 加 24 小时)
//   翻台率 = 营业小时数 / 2.5 (平均停留小时数)
//   月营收 = 客单价 × 席数 × 翻台率 × 30 × 平均销售系数
// ==========================================
// 红线: 兜底条件必须严格为 "时段合计 == 0 且旧版时间存在",
//       不得简化为 "只要填写了任意时段字段就走主路径"
// ==========================================

use crate::domain::plan::{LegacyAssumptions, PlanAssumptions};
use crate::domain::projection::RevenueBasis;
use crate::engine::rounding::{decimal_from_float_repr, round_half_up};
use crate::engine::slot_revenue::TimeSlotRevenueCalculator;
use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;
use tracing::debug;

/// 平均停留小时数 (2.5)
pub const AVERAGE_STAY_HOURS: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// 旧版月营业天数 (30)
pub const LEGACY_OPERATING_DAYS_PER_MONTH: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

// ==========================================
// LegacyRevenue - 旧版营收明细
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRevenue {
    pub opening_hours: Decimal,
    pub turnover_rate: Decimal,
    pub average_coefficient: Decimal,
    pub revenue: Decimal,
}

// ==========================================
// RevenueAggregator - 月营收汇总器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RevenueAggregator {
    slot_calculator: TimeSlotRevenueCalculator,
}

impl RevenueAggregator {
    pub fn new() -> Self {
        Self {
            slot_calculator: TimeSlotRevenueCalculator::new(),
        }
    }

    /// 计算月营收
    pub fn compute_monthly_revenue(&self, assumptions: &PlanAssumptions) -> Decimal {
        self.compute_with_basis(assumptions).0
    }

    /// 计算月营收并返回营收口径
    pub fn compute_with_basis(&self, assumptions: &PlanAssumptions) -> (Decimal, RevenueBasis) {
        let lunch = self.slot_calculator.compute_for_slot(&assumptions.lunch);
        let dinner = self.slot_calculator.compute_for_slot(&assumptions.dinner);
        let total = round_half_up(lunch.saturating_add(dinner));

        if total.is_zero() {
            if let Some(legacy) = &assumptions.legacy {
                let legacy_revenue = self.compute_legacy_revenue(legacy);
                debug!(
                    revenue = %legacy_revenue.revenue,
                    opening_hours = %legacy_revenue.opening_hours,
                    turnover_rate = %legacy_revenue.turnover_rate,
                    "时段营收为0，使用旧版单时段营收"
                );
                return (
                    legacy_revenue.revenue,
                    RevenueBasis::Legacy {
                        opening_hours: legacy_revenue.opening_hours,
                        turnover_rate: legacy_revenue.turnover_rate,
                        average_coefficient: legacy_revenue.average_coefficient,
                    },
                );
            }
        }

        (total, RevenueBasis::SlotBased { lunch, dinner })
    }

    /// 旧版单时段营收
    pub fn compute_legacy_revenue(&self, legacy: &LegacyAssumptions) -> LegacyRevenue {
        let opening_hours = opening_duration_hours(legacy.opening_time, legacy.closing_time);
        let turnover_rate = opening_hours / AVERAGE_STAY_HOURS;
        let average_coefficient = legacy
            .sales_coefficients
            .mean()
            .map(decimal_from_float_repr)
            .unwrap_or(Decimal::ONE);

        let revenue = legacy
            .average_price_per_customer
            .saturating_mul(Decimal::from(legacy.number_of_seats))
            .saturating_mul(turnover_rate)
            .saturating_mul(LEGACY_OPERATING_DAYS_PER_MONTH)
            .saturating_mul(average_coefficient);

        LegacyRevenue {
            opening_hours,
            turnover_rate,
            average_coefficient,
            revenue: round_half_up(revenue),
        }
    }
}

/// 营业小时数
///
/// 结束时间 ≤ 开始时间时视为次日（只跨一次日）
pub fn opening_duration_hours(opening: NaiveTime, closing: NaiveTime) -> Decimal {
    let mut duration = closing.signed_duration_since(opening);
    if closing <= opening {
        duration = duration + Duration::hours(24);
    }
    decimal_from_float_repr(duration.num_seconds() as f64 / 3600.0)
}
