// ==========================================
// 出店计划测算引擎 - 领域模型层
// ==========================================
// 职责: 定义计划实体、测算输入与测算结果
// 红线: 不含数据访问逻辑,不含测算逻辑
// ==========================================

pub mod coefficients;
pub mod plan;
pub mod projection;
pub mod types;

// 重导出核心类型
pub use coefficients::{MonthlyCoefficients, SalesCoefficients};
pub use plan::{
    DerivedFigures, FixedCostAssumptions, LegacyAssumptions, PlanAssumptions, StorePlan,
    TimeSlotAssumptions, TimeSlotFields,
};
pub use projection::{MonthlyProjectionPoint, PaybackPeriod, ProjectionResult, RevenueBasis};
pub use types::{SlotKind, Weekday, WeekdaySet};
