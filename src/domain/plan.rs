// ==========================================
// 出店计划测算引擎 - 出店计划领域模型
// ==========================================
// StorePlan: 持久化的计划记录（假设字段 + 测算结果字段）
// PlanAssumptions: 测算用的类型化假设, 由 StorePlan 一次性解析得到
// ==========================================
// 红线: 测算结果字段只由引擎写入, 调用方不得直接修改
// ==========================================

use crate::domain::coefficients::{MonthlyCoefficients, SalesCoefficients};
use crate::domain::types::{SlotKind, WeekdaySet};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// TimeSlotFields - 营业时段字段（存储格式）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSlotFields {
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub price_per_customer: Option<Decimal>, // 客单价
    #[serde(default)]
    pub customers_per_day: Option<i64>,      // 日客数
    #[serde(default)]
    pub cost_rate: Option<Decimal>,          // 原价率 (%), 30 表示 30%
    #[serde(default)]
    pub operating_days: Vec<String>,         // 营业曜日 ["monday", ...]
    #[serde(default)]
    pub monthly_coefficients: BTreeMap<String, f64>, // {"1": 1.0, ...}
    #[serde(default)]
    pub is_24_hours: bool, // 24 小时营业: 全曜日营业, 时刻仅作参考
}

// ==========================================
// FixedCostAssumptions - 月度固定费用
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedCostAssumptions {
    #[serde(default)]
    pub monthly_rent: Decimal,
    #[serde(default)]
    pub number_of_staff: i64,
    #[serde(default)]
    pub staff_monthly_salary: Decimal,
    #[serde(default)]
    pub part_time_hours_per_month: i64,
    #[serde(default)]
    pub part_time_hourly_wage: Decimal,
    #[serde(default)]
    pub monthly_utilities: Decimal,
    #[serde(default)]
    pub monthly_supplies: Decimal,
    #[serde(default)]
    pub monthly_advertising: Decimal,
    #[serde(default)]
    pub monthly_fees: Decimal,
    #[serde(default)]
    pub monthly_other_expenses: Decimal,
}

// ==========================================
// DerivedFigures - 测算结果字段
// ==========================================
// None 表示尚未测算
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFigures {
    pub monthly_revenue: Option<Decimal>,
    pub monthly_cost_of_goods_sold: Option<Decimal>,
    pub monthly_gross_profit: Option<Decimal>,
    pub monthly_cost: Option<Decimal>,   // 月度固定费用
    pub monthly_profit: Option<Decimal>, // 月度净利润
    pub payback_period_years: Option<i32>,
    pub payback_period_months: Option<i32>,
}

impl DerivedFigures {
    /// 是否已有有效的月度营收（营收为空或为 0 视为未测算）
    pub fn has_revenue(&self) -> bool {
        matches!(self.monthly_revenue, Some(r) if !r.is_zero())
    }
}

// ==========================================
// StorePlan - 出店计划
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePlan {
    // ===== 标识与归属 =====
    pub plan_id: String,
    pub company_id: Option<String>, // 所属公司（租户）
    pub user_id: Option<String>,    // 作成者
    pub is_draft: bool,             // 草稿不要求收支平衡

    // ===== 基本信息 =====
    #[serde(default)]
    pub store_concept: Option<String>,
    #[serde(default)]
    pub target_customer: Option<String>,

    // ===== 营业时段 =====
    #[serde(default)]
    pub lunch: TimeSlotFields,
    #[serde(default)]
    pub dinner: TimeSlotFields,

    // ===== 旧版单时段字段（兼容） =====
    #[serde(default)]
    pub number_of_seats: i64,
    #[serde(default)]
    pub opening_hours_start: Option<NaiveTime>,
    #[serde(default)]
    pub opening_hours_end: Option<NaiveTime>,
    #[serde(default)]
    pub average_price_per_customer: Decimal,
    #[serde(default)]
    pub sales_coefficients: BTreeMap<String, f64>,

    // ===== 费用与投资 =====
    #[serde(default)]
    pub costs: FixedCostAssumptions,
    #[serde(default)]
    pub initial_investment: Decimal,

    // ===== 测算结果 =====
    #[serde(default)]
    pub derived: DerivedFigures,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StorePlan {
    /// 创建草稿计划（只有假设, 没有测算结果）
    pub fn new_draft(company_id: &str, user_id: &str) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            plan_id: uuid::Uuid::new_v4().to_string(),
            company_id: Some(company_id.to_string()),
            user_id: Some(user_id.to_string()),
            is_draft: true,
            store_concept: None,
            target_customer: None,
            lunch: TimeSlotFields::default(),
            dinner: TimeSlotFields::default(),
            number_of_seats: 0,
            opening_hours_start: None,
            opening_hours_end: None,
            average_price_per_customer: Decimal::ZERO,
            sales_coefficients: BTreeMap::new(),
            costs: FixedCostAssumptions::default(),
            initial_investment: Decimal::ZERO,
            derived: DerivedFigures::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 是否已设置所属公司
    pub fn has_tenant(&self) -> bool {
        matches!(&self.company_id, Some(id) if !id.trim().is_empty())
    }

    /// 预览/导出前是否需要重新测算
    pub fn needs_projection(&self) -> bool {
        self.is_draft || !self.derived.has_revenue()
    }
}

// ==========================================
// TimeSlotAssumptions - 营业时段假设（类型化）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlotAssumptions {
    pub kind: SlotKind,
    pub price_per_customer: Decimal,
    pub customers_per_day: i64,
    pub cost_rate_pct: Decimal,
    pub operating_days: WeekdaySet,
    pub monthly_coefficients: MonthlyCoefficients,
}

impl TimeSlotAssumptions {
    pub fn from_fields(kind: SlotKind, fields: &TimeSlotFields) -> Self {
        Self {
            kind,
            price_per_customer: fields.price_per_customer.unwrap_or(Decimal::ZERO),
            customers_per_day: fields.customers_per_day.unwrap_or(0),
            cost_rate_pct: fields.cost_rate.unwrap_or(Decimal::ZERO),
            operating_days: if fields.is_24_hours {
                WeekdaySet::every_day()
            } else {
                WeekdaySet::from_ids(&fields.operating_days)
            },
            monthly_coefficients: MonthlyCoefficients::from_map(&fields.monthly_coefficients),
        }
    }

    /// 未营业时段
    pub fn closed(kind: SlotKind) -> Self {
        Self {
            kind,
            price_per_customer: Decimal::ZERO,
            customers_per_day: 0,
            cost_rate_pct: Decimal::ZERO,
            operating_days: WeekdaySet::empty(),
            monthly_coefficients: MonthlyCoefficients::new(),
        }
    }
}

// ==========================================
// LegacyAssumptions - 旧版单时段假设
// ==========================================
// 仅当营业开始/结束时间都存在时才构造
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyAssumptions {
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub average_price_per_customer: Decimal,
    pub number_of_seats: i64,
    pub sales_coefficients: SalesCoefficients,
}

// ==========================================
// PlanAssumptions - 测算输入
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct PlanAssumptions {
    pub lunch: TimeSlotAssumptions,
    pub dinner: TimeSlotAssumptions,
    pub legacy: Option<LegacyAssumptions>,
    pub fixed_costs: FixedCostAssumptions,
    pub initial_investment: Decimal,
}

impl PlanAssumptions {
    /// 从计划记录解析测算输入
    pub fn from_plan(plan: &StorePlan) -> Self {
        let legacy = match (plan.opening_hours_start, plan.opening_hours_end) {
            (Some(opening_time), Some(closing_time)) => Some(LegacyAssumptions {
                opening_time,
                closing_time,
                average_price_per_customer: plan.average_price_per_customer,
                number_of_seats: plan.number_of_seats,
                sales_coefficients: SalesCoefficients::from_map(&plan.sales_coefficients),
            }),
            _ => None,
        };

        Self {
            lunch: TimeSlotAssumptions::from_fields(SlotKind::Lunch, &plan.lunch),
            dinner: TimeSlotAssumptions::from_fields(SlotKind::Dinner, &plan.dinner),
            legacy,
            fixed_costs: plan.costs.clone(),
            initial_investment: plan.initial_investment,
        }
    }

    /// 两个营业时段
    pub fn slots(&self) -> [&TimeSlotAssumptions; 2] {
        [&self.lunch, &self.dinner]
    }
}
