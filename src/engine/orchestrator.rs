// ==========================================
// 出店计划测算引擎 - 引擎编排器
// ==========================================
// 用途: 协调五个计算器的执行顺序并一次性写回计划记录
// 顺序: 营收 → 原价 → 毛利 → 固定费用 → 净利润 → 回收期 → 写回 → 提交
// ==========================================
// 红线: 未设置所属公司时立即失败, 不做任何测算与写回
// 红线: 毛利/净利润只由本编排器根据恒等式写入, 不得单独修改
// 幂等: 假设不变时重复执行得到完全相同的结果
// ==========================================

use crate::domain::plan::{DerivedFigures, PlanAssumptions, StorePlan};
use crate::domain::projection::ProjectionResult;
use crate::engine::cogs::CostOfGoodsCalculator;
use crate::engine::commit::PlanCommitter;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::fixed_cost::OperatingExpenseCalculator;
use crate::engine::payback::PaybackCalculator;
use crate::engine::revenue::RevenueAggregator;
use chrono::Utc;
use tracing::{debug, info, instrument};

// ==========================================
// PlanProjectionEngine - 测算编排器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanProjectionEngine {
    revenue: RevenueAggregator,
    cogs: CostOfGoodsCalculator,
    expenses: OperatingExpenseCalculator,
    payback: PaybackCalculator,
}

impl PlanProjectionEngine {
    pub fn new() -> Self {
        Self {
            revenue: RevenueAggregator::new(),
            cogs: CostOfGoodsCalculator::new(),
            expenses: OperatingExpenseCalculator::new(),
            payback: PaybackCalculator::new(),
        }
    }

    /// 纯测算（不修改计划, 不提交）
    pub fn project(&self, assumptions: &PlanAssumptions) -> ProjectionResult {
        // 步骤1: 月营收
        let (monthly_revenue, revenue_basis) = self.revenue.compute_with_basis(assumptions);
        debug!(monthly_revenue = %monthly_revenue, legacy = revenue_basis.is_legacy(), "步骤1: 月营收");

        // 步骤2: 月度原价 / 毛利
        let monthly_cost_of_goods_sold = self.cogs.compute_monthly_cogs(assumptions);
        let monthly_gross_profit = monthly_revenue.saturating_sub(monthly_cost_of_goods_sold);
        debug!(
            monthly_cost_of_goods_sold = %monthly_cost_of_goods_sold,
            monthly_gross_profit = %monthly_gross_profit,
            "步骤2: 原价与毛利"
        );

        // 步骤3: 固定费用 / 净利润
        let monthly_cost = self
            .expenses
            .compute_monthly_fixed_cost(&assumptions.fixed_costs);
        let monthly_profit = monthly_gross_profit.saturating_sub(monthly_cost);
        debug!(monthly_cost = %monthly_cost, monthly_profit = %monthly_profit, "步骤3: 固定费用与净利润");

        // 步骤4: 投资回收期
        let payback = self
            .payback
            .compute_payback_period(assumptions.initial_investment, monthly_profit);
        debug!(years = payback.years, months = payback.months, "步骤4: 投资回收期");

        ProjectionResult {
            monthly_revenue,
            monthly_cost_of_goods_sold,
            monthly_gross_profit,
            monthly_cost,
            monthly_profit,
            payback,
            revenue_basis,
        }
    }

    /// 执行全部测算, 写回计划记录并提交
    ///
    /// # 参数
    /// - plan: 计划记录（必须已设置所属公司）
    /// - committer: 写回后的提交端口（只调用一次）
    ///
    /// # 返回
    /// - Ok(&mut StorePlan): 已写回测算结果的同一计划
    /// - Err(EngineError::MissingTenant): 未设置所属公司
    /// - Err(EngineError::Commit): 提交失败
    #[instrument(skip(self, plan, committer), fields(plan_id = %plan.plan_id))]
    pub fn calculate_all<'p, C>(
        &self,
        plan: &'p mut StorePlan,
        committer: &C,
    ) -> EngineResult<&'p mut StorePlan>
    where
        C: PlanCommitter + ?Sized,
    {
        if !plan.has_tenant() {
            return Err(EngineError::MissingTenant {
                plan_id: plan.plan_id.clone(),
            });
        }

        let assumptions = PlanAssumptions::from_plan(plan);
        let result = self.project(&assumptions);
        apply_projection(plan, &result);

        committer
            .commit(plan)
            .map_err(|source| EngineError::Commit {
                plan_id: plan.plan_id.clone(),
                source,
            })?;

        info!(
            monthly_revenue = %result.monthly_revenue,
            monthly_profit = %result.monthly_profit,
            payback_years = result.payback.years,
            payback_months = result.payback.months,
            "出店计划测算完成"
        );

        Ok(plan)
    }
}

/// 把测算结果写回计划记录（六个结果字段整体替换）
pub fn apply_projection(plan: &mut StorePlan, result: &ProjectionResult) {
    plan.derived = DerivedFigures {
        monthly_revenue: Some(result.monthly_revenue),
        monthly_cost_of_goods_sold: Some(result.monthly_cost_of_goods_sold),
        monthly_gross_profit: Some(result.monthly_gross_profit),
        monthly_cost: Some(result.monthly_cost),
        monthly_profit: Some(result.monthly_profit),
        payback_period_years: Some(result.payback.years),
        payback_period_months: Some(result.payback.months),
    };
    plan.updated_at = Utc::now().naive_utc();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::PaybackPeriod;
    use crate::engine::commit::{CommitError, NoOpCommitter};
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use std::cell::Cell;
    use std::collections::BTreeMap;

    fn slot_plan() -> StorePlan {
        let mut plan = StorePlan::new_draft("C001", "U001");
        plan.is_draft = false;
        plan.lunch.price_per_customer = Some(Decimal::from(1000));
        plan.lunch.customers_per_day = Some(20);
        plan.lunch.cost_rate = Some(Decimal::from(30));
        plan.lunch.operating_days = ["monday", "tuesday", "wednesday", "thursday", "friday"]
            .iter()
            .map(|d| d.to_string())
            .collect();
        plan.dinner.price_per_customer = Some(Decimal::from(3000));
        plan.dinner.customers_per_day = Some(15);
        plan.dinner.cost_rate = Some(Decimal::from(35));
        plan.dinner.operating_days = [
            "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
        ]
        .iter()
        .map(|d| d.to_string())
        .collect();
        plan.costs.monthly_rent = Decimal::from(300_000);
        plan.costs.number_of_staff = 2;
        plan.costs.staff_monthly_salary = Decimal::from(250_000);
        plan.initial_investment = Decimal::from(15_000_000);
        plan
    }

    #[test]
    fn test_calculate_all_writes_identities() {
        let engine = PlanProjectionEngine::new();
        let mut plan = slot_plan();
        engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();

        let d = &plan.derived;
        assert_eq!(d.monthly_revenue, Some(Decimal::from(1_796_950)));
        assert_eq!(d.monthly_cost_of_goods_sold, Some(Decimal::from(607_283)));
        assert_eq!(d.monthly_gross_profit, Some(Decimal::from(1_189_667)));
        assert_eq!(d.monthly_cost, Some(Decimal::from(800_000)));
        assert_eq!(d.monthly_profit, Some(Decimal::from(389_667)));
        // 15000000 / 389667 = 38.49... → 3 年 round(2.49) = 2 个月
        assert_eq!(d.payback_period_years, Some(3));
        assert_eq!(d.payback_period_months, Some(2));
    }

    #[test]
    fn test_missing_tenant_fails_before_any_write() {
        let engine = PlanProjectionEngine::new();
        let mut plan = slot_plan();
        plan.company_id = None;
        let commits = Cell::new(0);
        let committer = |_: &StorePlan| -> Result<(), CommitError> {
            commits.set(commits.get() + 1);
            Ok(())
        };

        let err = engine.calculate_all(&mut plan, &committer).unwrap_err();
        assert!(matches!(err, EngineError::MissingTenant { .. }));
        assert_eq!(plan.derived, DerivedFigures::default());
        assert_eq!(commits.get(), 0);
    }

    #[test]
    fn test_commit_called_once_with_written_fields() {
        let engine = PlanProjectionEngine::new();
        let mut plan = slot_plan();
        let commits = Cell::new(0);
        let committer = |p: &StorePlan| -> Result<(), CommitError> {
            assert_eq!(p.derived.monthly_revenue, Some(Decimal::from(1_796_950)));
            commits.set(commits.get() + 1);
            Ok(())
        };

        engine.calculate_all(&mut plan, &committer).unwrap();
        assert_eq!(commits.get(), 1);
    }

    #[test]
    fn test_commit_failure_is_reported() {
        let engine = PlanProjectionEngine::new();
        let mut plan = slot_plan();
        let committer = |_: &StorePlan| -> Result<(), CommitError> { Err("disk full".into()) };

        let err = engine.calculate_all(&mut plan, &committer).unwrap_err();
        match err {
            EngineError::Commit { plan_id, source } => {
                assert_eq!(plan_id, plan.plan_id);
                assert_eq!(source.to_string(), "disk full");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_idempotent() {
        let engine = PlanProjectionEngine::new();
        let mut plan = slot_plan();
        engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();
        let first = plan.derived.clone();
        engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();
        assert_eq!(plan.derived, first);
    }

    #[test]
    fn test_unprofitable_plan_gets_sentinel() {
        let engine = PlanProjectionEngine::new();
        let mut plan = slot_plan();
        plan.costs.monthly_rent = Decimal::from(5_000_000);
        engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();

        assert!(plan.derived.monthly_profit.unwrap() < Decimal::ZERO);
        assert_eq!(plan.derived.payback_period_years, Some(PaybackPeriod::UNRECOVERABLE.years));
        assert_eq!(plan.derived.payback_period_months, Some(PaybackPeriod::UNRECOVERABLE.months));
    }

    #[test]
    fn test_project_legacy_plan() {
        let engine = PlanProjectionEngine::new();
        let mut plan = StorePlan::new_draft("C001", "U001");
        plan.opening_hours_start = NaiveTime::from_hms_opt(17, 0, 0);
        plan.opening_hours_end = NaiveTime::from_hms_opt(23, 0, 0);
        plan.number_of_seats = 30;
        plan.average_price_per_customer = Decimal::from(3500);
        plan.sales_coefficients = BTreeMap::new();

        let result = engine.project(&PlanAssumptions::from_plan(&plan));
        assert_eq!(result.monthly_revenue, Decimal::from(7_560_000));
        assert_eq!(result.monthly_cost_of_goods_sold, Decimal::from(2_268_000));
        assert_eq!(result.monthly_gross_profit, Decimal::from(5_292_000));
        assert!(result.revenue_basis.is_legacy());
    }

    #[test]
    fn test_huge_slot_inputs_do_not_panic() {
        let engine = PlanProjectionEngine::new();
        let mut plan = slot_plan();
        plan.dinner.price_per_customer =
            Some(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0));
        plan.dinner.customers_per_day = Some(1_000_000_000);

        let result = engine.project(&PlanAssumptions::from_plan(&plan));
        assert_eq!(result.monthly_revenue, Decimal::MAX);
        assert_eq!(
            result.monthly_gross_profit,
            result.monthly_revenue - result.monthly_cost_of_goods_sold
        );
        assert!(result.monthly_profit > Decimal::ZERO);
        assert_eq!(result.payback, PaybackPeriod::IMMEDIATE);
    }
}
