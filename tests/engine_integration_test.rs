// ==========================================
// 测算引擎集成测试
// ==========================================
// 测试目标: 午市/晚市场景、旧版兜底、恒等式、幂等性、回收期哨兵
// ==========================================


use std::cell::Cell;
use store_opening_plan::domain::{MonthlyCoefficients, PaybackPeriod, PlanAssumptions, WeekdaySet};
use store_opening_plan::engine::{
    CommitError, NoOpCommitter, PaybackCalculator, PlanProjectionEngine, RevenueAggregator,
    TimeSlotRevenueCalculator,
};
use store_opening_plan::{EngineError, RevenueBasis, StorePlan};
use test_helpers::*;

fn project(plan: &StorePlan) -> store_opening_plan::ProjectionResult {
    PlanProjectionEngine::new().project(&PlanAssumptions::from_plan(plan))
}

#[test]
fn test_scenario_a_lunch_only() {
    let plan = with_lunch(StorePlan::new_draft(COMPANY_ID, USER_ID));
    let revenue =
        RevenueAggregator::new().compute_monthly_revenue(&PlanAssumptions::from_plan(&plan));
    assert_eq!(revenue, dec(433_000));
}

#[test]
fn test_scenario_b_lunch_and_dinner() {
    let result = project(&slot_plan());
    assert_eq!(result.monthly_revenue, dec(1_796_950));
    assert_eq!(
        result.revenue_basis,
        RevenueBasis::SlotBased {
            lunch: dec(433_000),
            dinner: dec(1_363_950),
        }
    );
}

#[test]
fn test_scenario_c_payback_thirty_months() {
    let period = PaybackCalculator::new().compute_payback_period(dec(15_000_000), dec(500_000));
    assert_eq!(period, PaybackPeriod::new(2, 6));
}

#[test]
fn test_scenario_d_zero_profit_sentinel() {
    for investment in [0, 1, 15_000_000, 1_000_000_000] {
        let period = PaybackCalculator::new().compute_payback_period(dec(investment), dec(0));
        assert_eq!(period, PaybackPeriod::UNRECOVERABLE);
    }
}

#[test]
fn test_scenario_e_legacy_fallback() {
    let result = project(&legacy_plan());
    assert_eq!(result.monthly_revenue, dec(7_560_000));
    match result.revenue_basis {
        RevenueBasis::Legacy {
            opening_hours,
            turnover_rate,
            average_coefficient,
        } => {
            assert_eq!(opening_hours, dec(6));
            assert_eq!(turnover_rate, "2.4".parse::<rust_decimal::Decimal>().unwrap());
            assert_eq!(average_coefficient, dec(1));
        }
        other => panic!("expected legacy basis, got {:?}", other),
    }
}

#[test]
fn test_zero_customers_yields_zero_revenue() {
    let calc = TimeSlotRevenueCalculator::new();
    let coefficients = MonthlyCoefficients::uniform(1.5);
    for price in [0, 1, 1000, 99_999] {
        let revenue =
            calc.compute_slot_revenue(dec(price), 0, &WeekdaySet::every_day(), &coefficients);
        assert_eq!(revenue, dec(0));
    }
}

#[test]
fn test_slot_plan_ignores_legacy_fields() {
    let mut plan = slot_plan();
    let legacy = legacy_plan();
    plan.number_of_seats = legacy.number_of_seats;
    plan.opening_hours_start = legacy.opening_hours_start;
    plan.opening_hours_end = legacy.opening_hours_end;
    plan.average_price_per_customer = legacy.average_price_per_customer;

    let result = project(&plan);
    assert_eq!(result.monthly_revenue, dec(1_796_950));
    assert_eq!(result.monthly_cost_of_goods_sold, dec(607_283));
    assert!(!result.revenue_basis.is_legacy());
}

#[test]
fn test_accounting_identities_hold() {
    let mut plans = vec![slot_plan(), legacy_plan(), izakaya_plan()];
    let mut unprofitable = slot_plan();
    unprofitable.costs.monthly_rent = dec(3_000_000);
    plans.push(unprofitable);

    let engine = PlanProjectionEngine::new();
    for mut plan in plans {
        engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();
        let d = &plan.derived;
        let revenue = d.monthly_revenue.unwrap();
        let cogs = d.monthly_cost_of_goods_sold.unwrap();
        let gross = d.monthly_gross_profit.unwrap();
        let cost = d.monthly_cost.unwrap();
        let profit = d.monthly_profit.unwrap();
        assert_eq!(gross, revenue - cogs);
        assert_eq!(profit, gross - cost);
        assert_eq!(revenue.scale(), 0);
        assert_eq!(cogs.scale(), 0);
    }
}

#[test]
fn test_calculate_all_is_idempotent() {
    let engine = PlanProjectionEngine::new();
    let mut plan = izakaya_plan();
    engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();
    let first = plan.derived.clone();
    engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();
    assert_eq!(plan.derived, first);
}

#[test]
fn test_negative_profit_gets_sentinel() {
    let engine = PlanProjectionEngine::new();
    let mut plan = slot_plan();
    plan.costs.monthly_rent = dec(3_000_000);
    engine.calculate_all(&mut plan, &NoOpCommitter).unwrap();

    assert!(plan.derived.monthly_profit.unwrap() < dec(0));
    assert_eq!(plan.derived.payback_period_years, Some(999));
    assert_eq!(plan.derived.payback_period_months, Some(999));
}

#[test]
fn test_missing_tenant_does_not_compute_or_commit() {
    let engine = PlanProjectionEngine::new();
    let mut plan = slot_plan();
    plan.company_id = Some("   ".to_string());
    let commits = Cell::new(0);
    let committer = |_: &StorePlan| -> Result<(), CommitError> {
        commits.set(commits.get() + 1);
        Ok(())
    };

    let err = engine.calculate_all(&mut plan, &committer).unwrap_err();
    assert!(matches!(err, EngineError::MissingTenant { .. }));
    assert!(plan.derived.monthly_revenue.is_none());
    assert_eq!(commits.get(), 0);
}

#[test]
fn test_izakaya_sample_projection() {
    let mut plan = izakaya_plan();
    plan.sales_coefficients = store_opening_plan::config::presets::default_sales_coefficients();

    let result = project(&plan);
    assert_eq!(result.monthly_revenue, dec(8_221_500));
    assert_eq!(result.monthly_cost_of_goods_sold, dec(2_466_450));
    assert_eq!(result.monthly_gross_profit, dec(5_755_050));
    assert_eq!(result.monthly_cost, dec(1_040_000));
    assert_eq!(result.monthly_profit, dec(4_715_050));
    assert_eq!(result.payback, PaybackPeriod::new(0, 3));
}
