// ==========================================
// 出店计划测算引擎 - 出店计划 API
// ==========================================
// 职责: 计划的新建、更新、预览、列表
// 流程: 校验 → 补齐默认系数(仅新建) → 保存假设 → (非草稿) 测算并写回
// 事务: 保存假设与测算写回在同一事务内, 任一步失败整体回滚
// ==========================================
// 红线: 所属公司与作成者必须设置
// 红线: 测算结果只通过引擎写回, API 不直接改写
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::domain::plan::{PlanAssumptions, StorePlan, TimeSlotFields};
use crate::domain::projection::{MonthlyProjectionPoint, ProjectionResult};
use crate::domain::types::{Weekday, WeekdaySet};
use crate::engine::orchestrator::PlanProjectionEngine;
use crate::engine::projection_series::build_annual_series;
use crate::repository::store_plan_repo::StorePlanRepository;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

// ==========================================
// PlanPreview - 预览数据
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanPreview {
    pub plan: StorePlan,
    pub projection: ProjectionResult,
    pub annual_series: Vec<MonthlyProjectionPoint>,
    pub recalculated: bool, // 本次预览是否重新测算并写回
}

// ==========================================
// PlanProjectionApi - 出店计划 API
// ==========================================
pub struct PlanProjectionApi {
    plan_repo: Arc<StorePlanRepository>,
    config_manager: Arc<ConfigManager>,
    engine: PlanProjectionEngine,
}

impl PlanProjectionApi {
    pub fn new(plan_repo: Arc<StorePlanRepository>, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            plan_repo,
            config_manager,
            engine: PlanProjectionEngine::new(),
        }
    }

    /// 打开数据库并创建 API（仓储与配置共享同一连接）
    pub fn open(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let plan_repo = Arc::new(StorePlanRepository::from_connection(conn.clone())?);
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| ApiError::ConfigError(e.to_string()))?,
        );

        Ok(Self::new(plan_repo, config_manager))
    }

    /// 新建计划
    ///
    /// # 返回
    /// - 保存后的计划（非草稿时已含测算结果）
    pub fn create_plan(&self, mut plan: StorePlan) -> ApiResult<StorePlan> {
        validate_plan(&plan)?;
        self.fill_default_coefficients(&mut plan)?;
        normalize_slot(&mut plan.lunch);
        normalize_slot(&mut plan.dinner);

        let now = Utc::now().naive_utc();
        plan.created_at = now;
        plan.updated_at = now;
        plan.derived = Default::default();

        self.plan_repo.in_transaction(|tx| -> ApiResult<()> {
            tx.insert(&plan)?;
            if !plan.is_draft {
                self.engine.calculate_all(&mut plan, tx)?;
            }
            Ok(())
        })?;

        info!(plan_id = %plan.plan_id, is_draft = plan.is_draft, "出店计划已创建");
        Ok(plan)
    }

    /// 更新计划假设（非草稿时重新测算）
    ///
    /// 只能更新本公司、本作成者的计划; 更新时不补齐默认系数
    pub fn update_plan(&self, mut plan: StorePlan) -> ApiResult<StorePlan> {
        validate_plan(&plan)?;
        let company_id = plan.company_id.clone().unwrap_or_default();
        let user_id = plan.user_id.clone().unwrap_or_default();

        let stored = self
            .plan_repo
            .find_by_id_for_owner(&company_id, &user_id, &plan.plan_id)?
            .ok_or_else(|| plan_not_found(&plan.plan_id))?;

        normalize_slot(&mut plan.lunch);
        normalize_slot(&mut plan.dinner);

        // 作成时间以库内为准, 测算结果保持到重新测算为止
        plan.created_at = stored.created_at;
        plan.derived = stored.derived;
        plan.updated_at = Utc::now().naive_utc();

        self.plan_repo.in_transaction(|tx| -> ApiResult<()> {
            tx.update_assumptions(&plan)?;
            if !plan.is_draft {
                self.engine.calculate_all(&mut plan, tx)?;
            }
            Ok(())
        })?;

        debug!(plan_id = %plan.plan_id, is_draft = plan.is_draft, "出店计划已更新");
        Ok(plan)
    }

    /// 预览计划（草稿或尚无营收时先测算并写回）
    pub fn preview(&self, company_id: &str, plan_id: &str) -> ApiResult<PlanPreview> {
        let mut plan = self
            .plan_repo
            .find_by_id_for_company(company_id, plan_id)?
            .ok_or_else(|| plan_not_found(plan_id))?;

        let recalculated = plan.needs_projection();
        if recalculated {
            self.plan_repo.in_transaction(|tx| -> ApiResult<()> {
                self.engine.calculate_all(&mut plan, tx)?;
                Ok(())
            })?;
        }

        let projection = self.engine.project(&PlanAssumptions::from_plan(&plan));
        let annual_series = build_annual_series(&projection);

        debug!(plan_id, recalculated, "预览数据已生成");
        Ok(PlanPreview {
            plan,
            projection,
            annual_series,
            recalculated,
        })
    }

    /// 列出某公司某作成者的计划（新→旧）
    pub fn list_plans(&self, company_id: &str, user_id: &str) -> ApiResult<Vec<StorePlan>> {
        if company_id.trim().is_empty() || user_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("公司与作成者不能为空".to_string()));
        }
        Ok(self.plan_repo.list_by_company_and_user(company_id, user_id)?)
    }

    fn fill_default_coefficients(&self, plan: &mut StorePlan) -> ApiResult<()> {
        if plan.sales_coefficients.is_empty() {
            plan.sales_coefficients = self
                .config_manager
                .get_default_sales_coefficients()
                .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        }

        for slot in [&mut plan.lunch, &mut plan.dinner] {
            if slot.monthly_coefficients.is_empty() {
                slot.monthly_coefficients = self
                    .config_manager
                    .get_default_monthly_coefficients()
                    .map_err(|e| ApiError::ConfigError(e.to_string()))?;
            }
        }
        Ok(())
    }
}

fn plan_not_found(plan_id: &str) -> ApiError {
    ApiError::NotFound(format!("出店计划(id={})不存在", plan_id))
}

/// 24 小时营业的时段: 全曜日营业, 清空起止时刻
fn normalize_slot(slot: &mut TimeSlotFields) {
    if slot.is_24_hours {
        slot.operating_days = WeekdaySet::every_day().to_ids();
        slot.start_time = None;
        slot.end_time = None;
    }
}

/// 金额上限 (1 兆)
const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// 人数/席数/时数上限
const MAX_COUNT: i64 = 1_000_000;

/// 系数上限
const MAX_COEFFICIENT: f64 = 100.0;

fn validate_plan(plan: &StorePlan) -> ApiResult<()> {
    if !plan.has_tenant() {
        return Err(ApiError::InvalidInput("所属公司不能为空".to_string()));
    }
    if !matches!(&plan.user_id, Some(id) if !id.trim().is_empty()) {
        return Err(ApiError::InvalidInput("作成者不能为空".to_string()));
    }

    // 草稿允许席数未填写(0), 正式计划至少 1 席
    let min_seats = if plan.is_draft { 0 } else { 1 };
    check_count("席数", plan.number_of_seats, min_seats)?;
    check_amount("客单价", plan.average_price_per_customer)?;
    check_coefficients("销售系数", &plan.sales_coefficients)?;

    for (name, slot) in [("lunch", &plan.lunch), ("dinner", &plan.dinner)] {
        if let Some(price) = slot.price_per_customer {
            check_amount(&format!("{} 客单价", name), price)?;
        }
        if let Some(customers) = slot.customers_per_day {
            check_count(&format!("{} 日客数", name), customers, 0)?;
        }
        if let Some(rate) = slot.cost_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                return Err(ApiError::InvalidInput(format!(
                    "{} 原价率必须在 0~100 之间: {}",
                    name, rate
                )));
            }
        }
        if let Some(invalid) = slot
            .operating_days
            .iter()
            .find(|d| d.parse::<Weekday>().is_err())
        {
            return Err(ApiError::InvalidInput(format!(
                "{} 营业曜日无效: {}",
                name, invalid
            )));
        }
        check_coefficients(&format!("{} 月度系数", name), &slot.monthly_coefficients)?;
    }

    let costs = &plan.costs;
    check_amount("房租", costs.monthly_rent)?;
    check_count("正式员工数", costs.number_of_staff, 0)?;
    check_amount("员工月薪", costs.staff_monthly_salary)?;
    check_count("兼职月时数", costs.part_time_hours_per_month, 0)?;
    check_amount("兼职时薪", costs.part_time_hourly_wage)?;
    check_amount("水电费", costs.monthly_utilities)?;
    check_amount("消耗品费", costs.monthly_supplies)?;
    check_amount("广告费", costs.monthly_advertising)?;
    check_amount("手续费", costs.monthly_fees)?;
    check_amount("其他费用", costs.monthly_other_expenses)?;
    check_amount("初期投资", plan.initial_investment)?;
    Ok(())
}

fn check_amount(field: &str, value: Decimal) -> ApiResult<()> {
    if value < Decimal::ZERO || value > Decimal::from(MAX_AMOUNT) {
        return Err(ApiError::InvalidInput(format!(
            "{} 必须在 0~{} 之间: {}",
            field, MAX_AMOUNT, value
        )));
    }
    Ok(())
}

fn check_count(field: &str, value: i64, min: i64) -> ApiResult<()> {
    if value < min || value > MAX_COUNT {
        return Err(ApiError::InvalidInput(format!(
            "{} 必须在 {}~{} 之间: {}",
            field, min, MAX_COUNT, value
        )));
    }
    Ok(())
}

fn check_coefficients(field: &str, coefficients: &BTreeMap<String, f64>) -> ApiResult<()> {
    if let Some((key, value)) = coefficients
        .iter()
        .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > MAX_COEFFICIENT)
    {
        return Err(ApiError::InvalidInput(format!(
            "{} 必须在 0~{} 之间: {}={}",
            field, MAX_COEFFICIENT, key, value
        )));
    }
    Ok(())
}
