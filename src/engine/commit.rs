// ==========================================
// 出店计划测算引擎 - 测算结果提交端口
// ==========================================
// 职责: 定义写回计划记录的 trait, 实现依赖倒置
// 说明: Engine 层定义 trait, Repository 层实现适配器
//       Engine 本身不依赖任何存储
// ==========================================

use crate::domain::plan::StorePlan;
use std::error::Error;

/// 提交失败时的错误类型
pub type CommitError = Box<dyn Error + Send + Sync>;

/// 测算结果提交者
///
/// 编排器在写回全部测算字段后调用一次 `commit`。
/// 调用方负责把测算与提交放在同一个事务单元内。
pub trait PlanCommitter {
    fn commit(&self, plan: &StorePlan) -> Result<(), CommitError>;
}

/// 闭包形式的提交者
impl<F> PlanCommitter for F
where
    F: Fn(&StorePlan) -> Result<(), CommitError>,
{
    fn commit(&self, plan: &StorePlan) -> Result<(), CommitError> {
        self(plan)
    }
}

/// 空操作提交者
///
/// 用于只需要内存中结果的场景（如预览试算、单元测试）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCommitter;

impl PlanCommitter for NoOpCommitter {
    fn commit(&self, plan: &StorePlan) -> Result<(), CommitError> {
        tracing::debug!(plan_id = %plan.plan_id, "NoOpCommitter: 跳过测算结果提交");
        Ok(())
    }
}
