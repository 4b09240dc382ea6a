// ==========================================
// 出店计划测算引擎 - 出店计划仓储
// ==========================================
// 职责: 管理 store_plan 表 (按公司 + 作成者)
// 存储: 金额以十进制 TEXT 保存, 时刻以 HH:MM:SS 保存,
//       营业时段与系数以 JSON 列保存
// ==========================================
// 红线: Repository 不含测算逻辑, 只负责读写
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::plan::{DerivedFigures, FixedCostAssumptions, StorePlan};
use crate::engine::commit::{CommitError, PlanCommitter};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row, Transaction};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    plan_id,
    company_id,
    user_id,
    is_draft,
    store_concept,
    target_customer,
    lunch_slot,
    dinner_slot,
    number_of_seats,
    opening_hours_start,
    opening_hours_end,
    average_price_per_customer,
    sales_coefficients,
    monthly_rent,
    number_of_staff,
    staff_monthly_salary,
    part_time_hours_per_month,
    part_time_hourly_wage,
    monthly_utilities,
    monthly_supplies,
    monthly_advertising,
    monthly_fees,
    monthly_other_expenses,
    initial_investment,
    monthly_revenue,
    monthly_cost_of_goods_sold,
    monthly_gross_profit,
    monthly_cost,
    monthly_profit,
    payback_period_years,
    payback_period_months,
    created_at,
    updated_at
"#;

pub struct StorePlanRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StorePlanRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        let repo = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        repo.ensure_table()?;
        Ok(repo)
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        repo.ensure_table()?;
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn ensure_table(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS store_plan (
              plan_id TEXT PRIMARY KEY,
              company_id TEXT,
              user_id TEXT,
              is_draft INTEGER NOT NULL DEFAULT 1,
              store_concept TEXT,
              target_customer TEXT,
              lunch_slot TEXT NOT NULL DEFAULT '{}',
              dinner_slot TEXT NOT NULL DEFAULT '{}',
              number_of_seats INTEGER NOT NULL DEFAULT 0,
              opening_hours_start TEXT,
              opening_hours_end TEXT,
              average_price_per_customer TEXT NOT NULL DEFAULT '0',
              sales_coefficients TEXT NOT NULL DEFAULT '{}',
              monthly_rent TEXT NOT NULL DEFAULT '0',
              number_of_staff INTEGER NOT NULL DEFAULT 0,
              staff_monthly_salary TEXT NOT NULL DEFAULT '0',
              part_time_hours_per_month INTEGER NOT NULL DEFAULT 0,
              part_time_hourly_wage TEXT NOT NULL DEFAULT '0',
              monthly_utilities TEXT NOT NULL DEFAULT '0',
              monthly_supplies TEXT NOT NULL DEFAULT '0',
              monthly_advertising TEXT NOT NULL DEFAULT '0',
              monthly_fees TEXT NOT NULL DEFAULT '0',
              monthly_other_expenses TEXT NOT NULL DEFAULT '0',
              initial_investment TEXT NOT NULL DEFAULT '0',
              monthly_revenue TEXT,
              monthly_cost_of_goods_sold TEXT,
              monthly_gross_profit TEXT,
              monthly_cost TEXT,
              monthly_profit TEXT,
              payback_period_years INTEGER,
              payback_period_months INTEGER,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_store_plan_company_user
              ON store_plan(company_id, user_id, created_at);
            "#,
        )?;
        Ok(())
    }

    /// 新增计划（含当前测算结果字段）
    pub fn insert(&self, plan: &StorePlan) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        insert_plan(&conn, plan)
    }

    /// 更新假设字段（不触碰归属、作成时间与测算结果字段）
    pub fn update_assumptions(&self, plan: &StorePlan) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        update_plan_assumptions(&conn, plan)
    }

    /// 写回六个测算结果字段（单条语句）
    pub fn update_projection(&self, plan: &StorePlan) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        update_plan_projection(&conn, plan)
    }

    /// 在同一个事务内执行一组写操作
    ///
    /// # 说明
    /// - 闭包返回 Ok 时提交, 返回 Err 时回滚（事务随 drop 回滚）
    /// - 闭包内只能通过 PlanTransaction 写库, 不得再调用本仓储的方法（连接锁不可重入）
    pub fn in_transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&PlanTransaction<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction().map_err(RepositoryError::from)?;
        let unit = PlanTransaction { tx };

        let value = f(&unit)?;
        unit.tx.commit().map_err(RepositoryError::from)?;
        Ok(value)
    }

    pub fn find_by_id(&self, plan_id: &str) -> RepositoryResult<Option<StorePlan>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM store_plan WHERE plan_id = ?1",
            SELECT_COLUMNS
        ))?;

        match stmt.query_row(params![plan_id], map_row) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按公司限定读取（其他公司的计划视为不存在）
    pub fn find_by_id_for_company(
        &self,
        company_id: &str,
        plan_id: &str,
    ) -> RepositoryResult<Option<StorePlan>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM store_plan WHERE plan_id = ?1 AND company_id = ?2",
            SELECT_COLUMNS
        ))?;

        match stmt.query_row(params![plan_id, company_id], map_row) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按公司 + 作成者限定读取（更新前的归属校验）
    pub fn find_by_id_for_owner(
        &self,
        company_id: &str,
        user_id: &str,
        plan_id: &str,
    ) -> RepositoryResult<Option<StorePlan>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM store_plan WHERE plan_id = ?1 AND company_id = ?2 AND user_id = ?3",
            SELECT_COLUMNS
        ))?;

        match stmt.query_row(params![plan_id, company_id, user_id], map_row) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 列出某公司某作成者的计划（新→旧）
    pub fn list_by_company_and_user(
        &self,
        company_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Vec<StorePlan>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM store_plan
             WHERE company_id = ?1 AND user_id = ?2
             ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![company_id, user_id], map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}

// ==========================================
// PlanTransaction - 事务内写操作
// ==========================================
// 由 StorePlanRepository::in_transaction 创建, 生命周期内持有连接锁
pub struct PlanTransaction<'c> {
    tx: Transaction<'c>,
}

impl PlanTransaction<'_> {
    pub fn insert(&self, plan: &StorePlan) -> RepositoryResult<()> {
        insert_plan(&self.tx, plan)
    }

    pub fn update_assumptions(&self, plan: &StorePlan) -> RepositoryResult<()> {
        update_plan_assumptions(&self.tx, plan)
    }

    pub fn update_projection(&self, plan: &StorePlan) -> RepositoryResult<()> {
        update_plan_projection(&self.tx, plan)
    }
}

// ==========================================
// PlanCommitter 实现（引擎写回端口）
// ==========================================
impl PlanCommitter for StorePlanRepository {
    fn commit(&self, plan: &StorePlan) -> Result<(), CommitError> {
        self.update_projection(plan).map_err(CommitError::from)
    }
}

impl PlanCommitter for PlanTransaction<'_> {
    fn commit(&self, plan: &StorePlan) -> Result<(), CommitError> {
        self.update_projection(plan).map_err(CommitError::from)
    }
}

// ==========================================
// 写操作（连接或事务上执行）
// ==========================================

fn insert_plan(conn: &Connection, plan: &StorePlan) -> RepositoryResult<()> {
    let lunch_slot = serde_json::to_string(&plan.lunch)?;
    let dinner_slot = serde_json::to_string(&plan.dinner)?;
    let sales_coefficients = serde_json::to_string(&plan.sales_coefficients)?;
    let costs = &plan.costs;
    let derived = &plan.derived;

    conn.execute(
        &format!(
            "INSERT INTO store_plan ({}) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
                ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22,
                ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33
            )",
            SELECT_COLUMNS
        ),
        params![
            plan.plan_id,
            plan.company_id,
            plan.user_id,
            plan.is_draft,
            plan.store_concept,
            plan.target_customer,
            lunch_slot,
            dinner_slot,
            plan.number_of_seats,
            plan.opening_hours_start,
            plan.opening_hours_end,
            plan.average_price_per_customer.to_string(),
            sales_coefficients,
            costs.monthly_rent.to_string(),
            costs.number_of_staff,
            costs.staff_monthly_salary.to_string(),
            costs.part_time_hours_per_month,
            costs.part_time_hourly_wage.to_string(),
            costs.monthly_utilities.to_string(),
            costs.monthly_supplies.to_string(),
            costs.monthly_advertising.to_string(),
            costs.monthly_fees.to_string(),
            costs.monthly_other_expenses.to_string(),
            plan.initial_investment.to_string(),
            decimal_text(derived.monthly_revenue),
            decimal_text(derived.monthly_cost_of_goods_sold),
            decimal_text(derived.monthly_gross_profit),
            decimal_text(derived.monthly_cost),
            decimal_text(derived.monthly_profit),
            derived.payback_period_years,
            derived.payback_period_months,
            plan.created_at,
            plan.updated_at,
        ],
    )?;

    tracing::debug!(plan_id = %plan.plan_id, "出店计划已新增");
    Ok(())
}

fn update_plan_assumptions(conn: &Connection, plan: &StorePlan) -> RepositoryResult<()> {
    let lunch_slot = serde_json::to_string(&plan.lunch)?;
    let dinner_slot = serde_json::to_string(&plan.dinner)?;
    let sales_coefficients = serde_json::to_string(&plan.sales_coefficients)?;
    let costs = &plan.costs;

    let affected = conn.execute(
        r#"
        UPDATE store_plan SET
            is_draft = ?2,
            store_concept = ?3,
            target_customer = ?4,
            lunch_slot = ?5,
            dinner_slot = ?6,
            number_of_seats = ?7,
            opening_hours_start = ?8,
            opening_hours_end = ?9,
            average_price_per_customer = ?10,
            sales_coefficients = ?11,
            monthly_rent = ?12,
            number_of_staff = ?13,
            staff_monthly_salary = ?14,
            part_time_hours_per_month = ?15,
            part_time_hourly_wage = ?16,
            monthly_utilities = ?17,
            monthly_supplies = ?18,
            monthly_advertising = ?19,
            monthly_fees = ?20,
            monthly_other_expenses = ?21,
            initial_investment = ?22,
            updated_at = ?23
        WHERE plan_id = ?1
        "#,
        params![
            plan.plan_id,
            plan.is_draft,
            plan.store_concept,
            plan.target_customer,
            lunch_slot,
            dinner_slot,
            plan.number_of_seats,
            plan.opening_hours_start,
            plan.opening_hours_end,
            plan.average_price_per_customer.to_string(),
            sales_coefficients,
            costs.monthly_rent.to_string(),
            costs.number_of_staff,
            costs.staff_monthly_salary.to_string(),
            costs.part_time_hours_per_month,
            costs.part_time_hourly_wage.to_string(),
            costs.monthly_utilities.to_string(),
            costs.monthly_supplies.to_string(),
            costs.monthly_advertising.to_string(),
            costs.monthly_fees.to_string(),
            costs.monthly_other_expenses.to_string(),
            plan.initial_investment.to_string(),
            plan.updated_at,
        ],
    )?;

    if affected == 0 {
        return Err(not_found(&plan.plan_id));
    }
    Ok(())
}

fn update_plan_projection(conn: &Connection, plan: &StorePlan) -> RepositoryResult<()> {
    let derived = &plan.derived;

    let affected = conn.execute(
        r#"
        UPDATE store_plan SET
            monthly_revenue = ?2,
            monthly_cost_of_goods_sold = ?3,
            monthly_gross_profit = ?4,
            monthly_cost = ?5,
            monthly_profit = ?6,
            payback_period_years = ?7,
            payback_period_months = ?8,
            updated_at = ?9
        WHERE plan_id = ?1
        "#,
        params![
            plan.plan_id,
            decimal_text(derived.monthly_revenue),
            decimal_text(derived.monthly_cost_of_goods_sold),
            decimal_text(derived.monthly_gross_profit),
            decimal_text(derived.monthly_cost),
            decimal_text(derived.monthly_profit),
            derived.payback_period_years,
            derived.payback_period_months,
            plan.updated_at,
        ],
    )?;

    if affected == 0 {
        return Err(not_found(&plan.plan_id));
    }

    tracing::debug!(plan_id = %plan.plan_id, "测算结果已写回");
    Ok(())
}

fn not_found(plan_id: &str) -> RepositoryError {
    RepositoryError::NotFound {
        entity: "StorePlan".to_string(),
        id: plan_id.to_string(),
    }
}

fn decimal_text(value: Option<Decimal>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn parse_decimal(idx: usize, raw: &str) -> SqliteResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn decimal_at(row: &Row, idx: usize) -> SqliteResult<Decimal> {
    let raw: String = row.get(idx)?;
    parse_decimal(idx, &raw)
}

fn opt_decimal_at(row: &Row, idx: usize) -> SqliteResult<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|r| parse_decimal(idx, &r)).transpose()
}

fn json_at<T: DeserializeOwned>(row: &Row, idx: usize) -> SqliteResult<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_row(row: &Row) -> SqliteResult<StorePlan> {
    Ok(StorePlan {
        plan_id: row.get(0)?,
        company_id: row.get(1)?,
        user_id: row.get(2)?,
        is_draft: row.get(3)?,
        store_concept: row.get(4)?,
        target_customer: row.get(5)?,
        lunch: json_at(row, 6)?,
        dinner: json_at(row, 7)?,
        number_of_seats: row.get(8)?,
        opening_hours_start: row.get(9)?,
        opening_hours_end: row.get(10)?,
        average_price_per_customer: decimal_at(row, 11)?,
        sales_coefficients: json_at(row, 12)?,
        costs: FixedCostAssumptions {
            monthly_rent: decimal_at(row, 13)?,
            number_of_staff: row.get(14)?,
            staff_monthly_salary: decimal_at(row, 15)?,
            part_time_hours_per_month: row.get(16)?,
            part_time_hourly_wage: decimal_at(row, 17)?,
            monthly_utilities: decimal_at(row, 18)?,
            monthly_supplies: decimal_at(row, 19)?,
            monthly_advertising: decimal_at(row, 20)?,
            monthly_fees: decimal_at(row, 21)?,
            monthly_other_expenses: decimal_at(row, 22)?,
        },
        initial_investment: decimal_at(row, 23)?,
        derived: DerivedFigures {
            monthly_revenue: opt_decimal_at(row, 24)?,
            monthly_cost_of_goods_sold: opt_decimal_at(row, 25)?,
            monthly_gross_profit: opt_decimal_at(row, 26)?,
            monthly_cost: opt_decimal_at(row, 27)?,
            monthly_profit: opt_decimal_at(row, 28)?,
            payback_period_years: row.get(29)?,
            payback_period_months: row.get(30)?,
        },
        created_at: row.get(31)?,
        updated_at: row.get(32)?,
    })
}
