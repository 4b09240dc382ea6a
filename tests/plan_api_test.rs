// ==========================================
// PlanProjectionApi 集成测试
// ==========================================
// 测试目标: 新建/更新/预览/列表的完整流程
// ==========================================


use store_opening_plan::{ApiError, PaybackPeriod, PlanProjectionApi, StorePlan};
use test_helpers::*;

fn open_api() -> (tempfile::NamedTempFile, PlanProjectionApi) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = PlanProjectionApi::open(&db_path).expect("Failed to open api");
    (temp_file, api)
}

#[test]
fn test_create_final_izakaya_plan() {
    let (_temp_file, api) = open_api();
    let plan = api.create_plan(izakaya_plan()).unwrap();

    // 未录入系数 → 补齐默认销售系数 (平均 1.0875)
    assert_eq!(plan.sales_coefficients.len(), 8);
    assert_eq!(plan.lunch.monthly_coefficients.len(), 12);

    let d = &plan.derived;
    assert_eq!(d.monthly_revenue, Some(dec(8_221_500)));
    assert_eq!(d.monthly_cost_of_goods_sold, Some(dec(2_466_450)));
    assert_eq!(d.monthly_gross_profit, Some(dec(5_755_050)));
    assert_eq!(d.monthly_cost, Some(dec(1_040_000)));
    assert_eq!(d.monthly_profit, Some(dec(4_715_050)));
    assert_eq!(d.payback_period_years, Some(0));
    assert_eq!(d.payback_period_months, Some(3));
}

#[test]
fn test_create_draft_skips_projection() {
    let (_temp_file, api) = open_api();
    let plan = api.create_plan(slot_plan()).unwrap();
    assert!(plan.is_draft);
    assert!(plan.derived.monthly_revenue.is_none());
}

#[test]
fn test_create_requires_tenant() {
    let (_temp_file, api) = open_api();
    let mut plan = slot_plan();
    plan.company_id = None;
    let err = api.create_plan(plan).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[test]
fn test_preview_recalculates_draft_and_persists() {
    let (_temp_file, api) = open_api();
    let plan = api.create_plan(slot_plan()).unwrap();

    let preview = api.preview(COMPANY_ID, &plan.plan_id).unwrap();
    assert!(preview.recalculated);
    assert_eq!(preview.plan.derived.monthly_revenue, Some(dec(1_796_950)));
    assert_eq!(preview.projection.payback, PaybackPeriod::new(3, 2));
    assert_eq!(preview.annual_series.len(), 12);
    assert_eq!(
        preview.annual_series[11].cumulative_profit,
        dec(389_667) * dec(12)
    );

    // 写回后再次读取
    let listed = api.list_plans(COMPANY_ID, USER_ID).unwrap();
    assert_eq!(listed[0].derived.monthly_revenue, Some(dec(1_796_950)));
}

#[test]
fn test_preview_of_final_plan_does_not_recalculate() {
    let (_temp_file, api) = open_api();
    let plan = api.create_plan(izakaya_plan()).unwrap();

    let preview = api.preview(COMPANY_ID, &plan.plan_id).unwrap();
    assert!(!preview.recalculated);
    assert_eq!(preview.plan.derived, plan.derived);
    assert_eq!(preview.projection.monthly_profit, dec(4_715_050));
}

#[test]
fn test_preview_other_company_is_not_found() {
    let (_temp_file, api) = open_api();
    let plan = api.create_plan(slot_plan()).unwrap();
    let err = api.preview("C999", &plan.plan_id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn test_update_final_plan_recalculates() {
    let (_temp_file, api) = open_api();
    let mut plan = api.create_plan(izakaya_plan()).unwrap();

    // 固定费用 6,740,000 > 毛利 5,755,050
    plan.costs.monthly_rent = dec(6_000_000);
    let updated = api.update_plan(plan).unwrap();

    assert_eq!(updated.derived.monthly_cost, Some(dec(6_740_000)));
    assert_eq!(updated.derived.monthly_profit, Some(dec(-984_950)));
    assert_eq!(updated.derived.payback_period_years, Some(999));
    assert_eq!(updated.derived.payback_period_months, Some(999));

    let preview = api.preview(COMPANY_ID, &updated.plan_id).unwrap();
    assert!(preview.projection.payback.is_unrecoverable());
    assert_eq!(
        preview.projection.payback.to_string(),
        "无法回收（月净利润为0或负数）"
    );
}

#[test]
fn test_update_draft_keeps_previous_projection() {
    let (_temp_file, api) = open_api();
    let plan = api.create_plan(slot_plan()).unwrap();
    let preview = api.preview(COMPANY_ID, &plan.plan_id).unwrap();

    let mut draft = preview.plan;
    draft.costs.monthly_rent = dec(350_000);
    let updated = api.update_plan(draft).unwrap();
    assert_eq!(updated.derived.monthly_cost, Some(dec(800_000)));
}

#[test]
fn test_24_hour_dinner_runs_every_day() {
    let (_temp_file, api) = open_api();
    let mut plan = StorePlan::new_draft(COMPANY_ID, USER_ID);
    plan.is_draft = false;
    plan.number_of_seats = 20;
    plan.dinner.is_24_hours = true;
    plan.dinner.price_per_customer = Some(dec(3000));
    plan.dinner.customers_per_day = Some(15);
    plan.dinner.operating_days = days(&["friday"]);

    let created = api.create_plan(plan).unwrap();
    assert_eq!(created.dinner.operating_days.len(), 7);
    assert_eq!(created.derived.monthly_revenue, Some(dec(1_363_950)));
}

#[test]
fn test_list_plans_newest_first() {
    let (_temp_file, api) = open_api();
    let first = api.create_plan(slot_plan()).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = api.create_plan(legacy_plan()).unwrap();

    let plans = api.list_plans(COMPANY_ID, USER_ID).unwrap();
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].plan_id, second.plan_id);
    assert_eq!(plans[1].plan_id, first.plan_id);
}

#[test]
fn test_update_by_other_author_is_not_found() {
    let (_temp_file, api) = open_api();
    let mut plan = api.create_plan(izakaya_plan()).unwrap();

    plan.user_id = Some("U999".to_string());
    plan.costs.monthly_rent = dec(1);
    let err = api.update_plan(plan.clone()).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let stored = api.preview(COMPANY_ID, &plan.plan_id).unwrap().plan;
    assert_eq!(stored.costs.monthly_rent, dec(300_000));
}

#[test]
fn test_update_does_not_refill_sales_coefficients() {
    let (_temp_file, api) = open_api();
    let mut plan = api.create_plan(izakaya_plan()).unwrap();
    assert_eq!(plan.derived.monthly_revenue, Some(dec(8_221_500)));

    // 清空系数后平均系数取 1.0: 3500 × 30 × 2.4 × 30
    plan.sales_coefficients.clear();
    let updated = api.update_plan(plan).unwrap();
    assert!(updated.sales_coefficients.is_empty());
    assert_eq!(updated.derived.monthly_revenue, Some(dec(7_560_000)));
}

#[test]
fn test_create_rejects_negative_costs() {
    let (_temp_file, api) = open_api();
    let mut plan = izakaya_plan();
    plan.costs.monthly_rent = dec(-5_000_000);
    let err = api.create_plan(plan).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    let mut plan = slot_plan();
    plan.is_draft = false;
    plan.number_of_seats = 30;
    plan.lunch.price_per_customer = Some(dec(-1000));
    assert!(matches!(
        api.create_plan(plan).unwrap_err(),
        ApiError::InvalidInput(_)
    ));

    assert!(api.list_plans(COMPANY_ID, USER_ID).unwrap().is_empty());
}

#[test]
fn test_create_rejects_out_of_range_price() {
    let (_temp_file, api) = open_api();
    let mut plan = slot_plan();
    plan.dinner.price_per_customer = Some(rust_decimal::Decimal::from_i128_with_scale(
        100_000_000_000_000_000_000,
        0,
    ));
    plan.dinner.customers_per_day = Some(1_000_000_000);
    let err = api.create_plan(plan).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
