// ==========================================
// 出店计划测算引擎 - 月度固定费用
// ==========================================
// 人工费 = 正式员工数 × 月薪 + 兼职时数 × 时薪
// 固定费用 = 房租 + 人工费 + 水电 + 消耗品 + 广告 + 手续费 + 其他
// 超出 Decimal 范围时饱和
// ==========================================

use crate::domain::plan::FixedCostAssumptions;
use crate::engine::rounding::round_half_up;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, Default)]
pub struct OperatingExpenseCalculator;

impl OperatingExpenseCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 月度人工费（未取整）
    pub fn compute_labor_cost(&self, costs: &FixedCostAssumptions) -> Decimal {
        let staff = Decimal::from(costs.number_of_staff).saturating_mul(costs.staff_monthly_salary);
        let part_time = Decimal::from(costs.part_time_hours_per_month)
            .saturating_mul(costs.part_time_hourly_wage);
        staff.saturating_add(part_time)
    }

    /// 月度固定费用
    pub fn compute_monthly_fixed_cost(&self, costs: &FixedCostAssumptions) -> Decimal {
        let fixed_cost = [
            self.compute_labor_cost(costs),
            costs.monthly_utilities,
            costs.monthly_supplies,
            costs.monthly_advertising,
            costs.monthly_fees,
            costs.monthly_other_expenses,
        ]
        .into_iter()
        .fold(costs.monthly_rent, Decimal::saturating_add);

        round_half_up(fixed_cost)
    }
}
