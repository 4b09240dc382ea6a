// ==========================================
// 出店计划测算引擎 - API 层
// ==========================================
// 职责: 提供出店计划的用例接口, 编排仓储、配置与引擎
// ==========================================

pub mod error;
pub mod plan_projection_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use plan_projection_api::{PlanPreview, PlanProjectionApi};
