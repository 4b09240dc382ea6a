// ==========================================
// 出店计划测算引擎 - 投资回收期
// ==========================================
// 回收月数 = 初期投资 / 月净利润
// 年 = floor(回收月数 / 12), 月 = 四舍五入(回收月数 mod 12)
// ==========================================
// 红线: 月净利润 ≤ 0 → (999, 999) 哨兵值, 调用方必须先检查
// 注: 余月单独取整, years×12 + months 可能与 round(回收月数) 不一致,
//     也可能出现 months = 12, 保持历史行为不修正
// ==========================================

use crate::domain::projection::PaybackPeriod;
use crate::engine::rounding::round_half_up_i32;
use rust_decimal::prelude::*;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, Default)]
pub struct PaybackCalculator;

impl PaybackCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 计算投资回收期
    ///
    /// # 返回
    /// - 月净利润 ≤ 0: PaybackPeriod::UNRECOVERABLE
    /// - 初期投资 ≤ 0: PaybackPeriod::IMMEDIATE
    pub fn compute_payback_period(
        &self,
        initial_investment: Decimal,
        monthly_profit: Decimal,
    ) -> PaybackPeriod {
        if monthly_profit <= Decimal::ZERO {
            return PaybackPeriod::UNRECOVERABLE;
        }
        if initial_investment <= Decimal::ZERO {
            return PaybackPeriod::IMMEDIATE;
        }

        let payback_months = initial_investment
            .checked_div(monthly_profit)
            .unwrap_or(Decimal::MAX);
        let years = (payback_months / MONTHS_PER_YEAR)
            .floor()
            .to_i32()
            .unwrap_or(i32::MAX);
        let remainder_months = round_half_up_i32(payback_months % MONTHS_PER_YEAR);

        PaybackPeriod::new(years, remainder_months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_months() {
        let calc = PaybackCalculator::new();
        let period = calc.compute_payback_period(Decimal::from(15_000_000), Decimal::from(500_000));
        assert_eq!(period, PaybackPeriod::new(2, 6));
    }

    #[test]
    fn test_zero_profit_is_unrecoverable() {
        let calc = PaybackCalculator::new();
        assert_eq!(
            calc.compute_payback_period(Decimal::from(15_000_000), Decimal::ZERO),
            PaybackPeriod::UNRECOVERABLE
        );
        assert_eq!(
            calc.compute_payback_period(Decimal::ZERO, Decimal::ZERO),
            PaybackPeriod::UNRECOVERABLE
        );
    }

    #[test]
    fn test_negative_profit_is_unrecoverable() {
        let calc = PaybackCalculator::new();
        assert!(calc
            .compute_payback_period(Decimal::from(1_000_000), Decimal::from(-1))
            .is_unrecoverable());
    }

    #[test]
    fn test_no_investment_is_immediate() {
        let calc = PaybackCalculator::new();
        assert_eq!(
            calc.compute_payback_period(Decimal::ZERO, Decimal::from(100_000)),
            PaybackPeriod::IMMEDIATE
        );
        assert_eq!(
            calc.compute_payback_period(Decimal::from(-5), Decimal::from(100_000)),
            PaybackPeriod::IMMEDIATE
        );
    }

    #[test]
    fn test_remainder_rounded_independently() {
        let calc = PaybackCalculator::new();
        // 23.6 个月 → 1 年 + round(11.6) = 12 个月
        let period = calc.compute_payback_period(Decimal::from(2_360_000), Decimal::from(100_000));
        assert_eq!(period, PaybackPeriod::new(1, 12));

        // 3.18 个月 → 0 年 3 个月
        let period =
            calc.compute_payback_period(Decimal::from(15_000_000), Decimal::from(4_715_050));
        assert_eq!(period, PaybackPeriod::new(0, 3));
    }

    #[test]
    fn test_remainder_midpoint_rounds_up() {
        let calc = PaybackCalculator::new();
        // 14.5 个月 → 1 年 3 个月
        let period = calc.compute_payback_period(Decimal::from(1_450_000), Decimal::from(100_000));
        assert_eq!(period, PaybackPeriod::new(1, 3));
    }
}
