// Dev utility: create the sample izakaya plan and run the full projection against a SQLite file.
//
// Usage:
//   cargo run --bin plan_projection_demo -- [db_path]
//
// Without db_path the default path is used (STORE_OPENING_PLAN_DB_PATH or the user data dir).

use anyhow::Context;
use chrono::NaiveTime;
use rust_decimal::Decimal;
use store_opening_plan::db::get_default_db_path;
use store_opening_plan::domain::RevenueBasis;
use store_opening_plan::engine::OperatingExpenseCalculator;
use store_opening_plan::{logging, PlanProjectionApi, StorePlan, APP_NAME, VERSION};

fn sample_plan() -> StorePlan {
    let mut plan = StorePlan::new_draft("DEMO-COMPANY", "demo-user");
    plan.is_draft = false;
    plan.store_concept = Some("テスト居酒屋".to_string());
    plan.target_customer = Some("会社帰りの会社員".to_string());

    plan.number_of_seats = 30;
    plan.opening_hours_start = NaiveTime::from_hms_opt(17, 0, 0);
    plan.opening_hours_end = NaiveTime::from_hms_opt(23, 0, 0);
    plan.average_price_per_customer = Decimal::from(3500);

    plan.costs.monthly_rent = Decimal::from(300_000);
    plan.costs.number_of_staff = 2;
    plan.costs.staff_monthly_salary = Decimal::from(250_000);
    plan.costs.part_time_hours_per_month = 200;
    plan.costs.part_time_hourly_wage = Decimal::from(1200);

    plan.initial_investment = Decimal::from(15_000_000);
    plan
}

fn main() -> anyhow::Result<()> {
    logging::init();
    tracing::info!(app = APP_NAME, version = VERSION, "示例测算启动");

    let db_path = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);

    let api = PlanProjectionApi::open(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;

    let plan = api.create_plan(sample_plan()).context("创建示例计划失败")?;
    let company_id = plan.company_id.clone().unwrap_or_default();
    let preview = api
        .preview(&company_id, &plan.plan_id)
        .context("生成预览失败")?;

    let projection = &preview.projection;
    tracing::info!(
        db_path = %db_path,
        plan_id = %plan.plan_id,
        monthly_revenue = %projection.monthly_revenue,
        monthly_cost_of_goods_sold = %projection.monthly_cost_of_goods_sold,
        monthly_gross_profit = %projection.monthly_gross_profit,
        monthly_cost = %projection.monthly_cost,
        monthly_profit = %projection.monthly_profit,
        payback = %projection.payback,
        "示例计划测算结果"
    );

    if let RevenueBasis::Legacy {
        opening_hours,
        turnover_rate,
        average_coefficient,
    } = &projection.revenue_basis
    {
        tracing::info!(
            opening_hours = %opening_hours,
            turnover_rate = %turnover_rate,
            average_coefficient = %average_coefficient,
            "营收明细（旧版单时段）"
        );
    }

    let labor_cost = OperatingExpenseCalculator::new().compute_labor_cost(&preview.plan.costs);
    tracing::info!(labor_cost = %labor_cost, "人工费");

    for point in &preview.annual_series {
        tracing::debug!(
            month = point.month,
            revenue = %point.revenue,
            total_cost = %point.total_cost(),
            cumulative_profit = %point.cumulative_profit,
            "年度收支"
        );
    }

    Ok(())
}
