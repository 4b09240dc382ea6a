// ==========================================
// 出店计划测算引擎 - 引擎层
// ==========================================
// 职责: 营收、原价、固定费用、回收期的纯计算与编排
// 红线: Engine 不拼 SQL, 通过 PlanCommitter 端口写回
// 红线: 所有金额以 Decimal 计算, 整数单位四舍五入
// ==========================================

pub mod cogs;
pub mod commit;
pub mod error;
pub mod fixed_cost;
pub mod orchestrator;
pub mod payback;
pub mod projection_series;
pub mod revenue;
pub mod rounding;
pub mod slot_revenue;

// 重导出核心引擎
pub use cogs::CostOfGoodsCalculator;
pub use commit::{CommitError, NoOpCommitter, PlanCommitter};
pub use error::{EngineError, EngineResult};
pub use fixed_cost::OperatingExpenseCalculator;
pub use orchestrator::{apply_projection, PlanProjectionEngine};
pub use payback::PaybackCalculator;
pub use projection_series::build_annual_series;
pub use revenue::{LegacyRevenue, RevenueAggregator};
pub use slot_revenue::TimeSlotRevenueCalculator;
