// ==========================================
// 出店计划测算引擎 - 引擎层错误类型
// ==========================================
// 数值边界（空系数、零利润、零营业时长）一律就地替换为默认值,
// 不作为错误抛出; 只有结构性前置条件才报错
// ==========================================

use crate::engine::commit::CommitError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// 未设置所属公司, 不做任何测算与写回
    #[error("出店计划未设置所属公司: plan_id={plan_id}")]
    MissingTenant { plan_id: String },

    #[error("测算结果提交失败: plan_id={plan_id}, 原因={source}")]
    Commit {
        plan_id: String,
        #[source]
        source: CommitError,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
