// ==========================================
// 出店计划测算引擎 - 金额取整
// ==========================================
// 红线: 所有金额结果取整到 1 单位, 四舍五入 (0.5 → 1, 非银行家舍入)
// 红线: 金额计算不得使用二进制浮点
// ==========================================

use rust_decimal::prelude::*;

/// 四舍五入到整数（中点远离 0）
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// 四舍五入后转换为 i32（超出范围时饱和）
pub fn round_half_up_i32(value: Decimal) -> i32 {
    let rounded = round_half_up(value);
    rounded.to_i32().unwrap_or(if rounded.is_sign_negative() {
        i32::MIN
    } else {
        i32::MAX
    })
}

/// 浮点数按其最短往返十进制表示转换为 Decimal
///
/// 系数平均值、营业小时数等先以浮点计算, 再按文本表示进入定点运算,
/// 与历史数据的测算结果保持一致。非有限值返回 0。
pub fn decimal_from_float_repr(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value))
        .unwrap_or(Decimal::ZERO)
}
