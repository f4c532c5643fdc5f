//! 包裝粒度捨入策略

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RoundingMode;

/// 數量捨入策略（可注入）
pub trait RoundingPolicy: Send + Sync {
    /// 捨入單一數量
    fn round(&self, quantity: Decimal) -> Decimal;

    /// `lines` 筆數量捨入後最多可能超出的總量
    fn max_excess(&self, lines: usize) -> Decimal;

    /// 捨入，但原本已達下限的數量不會被捨到下限以下
    fn round_with_floor(&self, quantity: Decimal, floor: Decimal) -> Decimal {
        let rounded = self.round(quantity);
        if rounded < floor && quantity >= floor {
            self.round_up_to(floor)
        } else {
            rounded
        }
    }

    /// 不小於 `quantity` 的最小可用數量
    fn round_up_to(&self, quantity: Decimal) -> Decimal {
        quantity
    }

    /// 一組未固定數量捨入後最多可能超出的總量
    ///
    /// 除了 `max_excess` 之外，每筆被 `round_with_floor` 提升至下限的數量
    /// 最多再多出 `round_up_to(floor) - floor`。
    fn tolerance_for(&self, floors: &[Decimal]) -> Decimal {
        floors.iter().fold(self.max_excess(floors.len()), |acc, floor| {
            let bump = (self.round_up_to(*floor) - *floor).max(Decimal::ZERO);
            acc.checked_add(bump).unwrap_or(Decimal::MAX)
        })
    }
}

/// 依包裝粒度捨入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackagingRounding {
    /// 包裝粒度（None 表示不捨入）
    pub granularity: Option<Decimal>,

    /// 捨入方向
    pub mode: RoundingMode,
}

impl PackagingRounding {
    pub fn new(granularity: Option<Decimal>, mode: RoundingMode) -> Self {
        Self {
            granularity: granularity.filter(|g| *g > Decimal::ZERO),
            mode,
        }
    }

    /// 不捨入
    pub fn none() -> Self {
        Self::new(None, RoundingMode::Down)
    }

    /// 超出可表示範圍時回傳 None
    fn to_multiple(quantity: Decimal, granularity: Decimal, strategy: RoundingStrategy) -> Option<Decimal> {
        quantity
            .checked_div(granularity)?
            .round_dp_with_strategy(0, strategy)
            .checked_mul(granularity)
    }
}

impl RoundingPolicy for PackagingRounding {
    fn round(&self, quantity: Decimal) -> Decimal {
        let Some(granularity) = self.granularity else {
            return quantity;
        };

        let strategy = match self.mode {
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::Nearest => RoundingStrategy::MidpointAwayFromZero,
        };

        Self::to_multiple(quantity, granularity, strategy)
            .map(|rounded| rounded.normalize())
            .unwrap_or(quantity)
    }

    fn max_excess(&self, lines: usize) -> Decimal {
        let Some(granularity) = self.granularity else {
            return Decimal::ZERO;
        };

        let per_line = match self.mode {
            RoundingMode::Down => Decimal::ZERO,
            RoundingMode::Up => granularity,
            RoundingMode::Nearest => granularity / Decimal::TWO,
        };

        per_line
            .checked_mul(Decimal::from(lines))
            .unwrap_or(Decimal::MAX)
    }

    fn round_up_to(&self, quantity: Decimal) -> Decimal {
        match self.granularity {
            Some(granularity) => {
                Self::to_multiple(quantity, granularity, RoundingStrategy::AwayFromZero)
                    .map(|rounded| rounded.normalize())
                    .unwrap_or(quantity)
            }
            None => quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RoundingMode::Down, 123, 120)]
    #[case(RoundingMode::Up, 123, 130)]
    #[case(RoundingMode::Nearest, 123, 120)]
    #[case(RoundingMode::Nearest, 125, 130)]
    #[case(RoundingMode::Up, 120, 120)]
    fn test_round_to_granularity(#[case] mode: RoundingMode, #[case] input: i64, #[case] expected: i64) {
        let rounding = PackagingRounding::new(Some(Decimal::from(10)), mode);
        assert_eq!(rounding.round(Decimal::from(input)), Decimal::from(expected));
    }

    #[test]
    fn test_no_granularity_is_identity() {
        let rounding = PackagingRounding::none();
        let qty = Decimal::new(33333, 2);

        assert_eq!(rounding.round(qty), qty);
        assert_eq!(rounding.max_excess(10), Decimal::ZERO);
    }

    #[test]
    fn test_round_with_floor() {
        // 最小生產量 105 不是粒度 10 的倍數
        let rounding = PackagingRounding::new(Some(Decimal::from(10)), RoundingMode::Down);

        // 108 向下捨入為 100 會低於 105，改為 110
        assert_eq!(
            rounding.round_with_floor(Decimal::from(108), Decimal::from(105)),
            Decimal::from(110)
        );
        // 原本就低於下限的數量照常捨入
        assert_eq!(
            rounding.round_with_floor(Decimal::from(58), Decimal::from(105)),
            Decimal::from(50)
        );
    }

    #[test]
    fn test_max_excess() {
        let up = PackagingRounding::new(Some(Decimal::from(10)), RoundingMode::Up);
        let nearest = PackagingRounding::new(Some(Decimal::from(10)), RoundingMode::Nearest);
        let down = PackagingRounding::new(Some(Decimal::from(10)), RoundingMode::Down);

        assert_eq!(up.max_excess(3), Decimal::from(30));
        assert_eq!(nearest.max_excess(3), Decimal::from(15));
        assert_eq!(down.max_excess(3), Decimal::ZERO);
    }

    #[test]
    fn test_tolerance_includes_floor_bump() {
        let down = PackagingRounding::new(Some(Decimal::from(10)), RoundingMode::Down);
        let nearest = PackagingRounding::new(Some(Decimal::from(10)), RoundingMode::Nearest);

        // 105 → 110 多出 5；100 剛好是倍數
        let floors = [Decimal::from(105), Decimal::from(100)];
        assert_eq!(down.tolerance_for(&floors), Decimal::from(5));
        assert_eq!(nearest.tolerance_for(&floors), Decimal::from(15));
        assert_eq!(PackagingRounding::none().tolerance_for(&floors), Decimal::ZERO);
    }

    #[test]
    fn test_rounding_near_decimal_max_keeps_quantity() {
        // Decimal::MAX 向上捨入到 10 的倍數會超出可表示範圍
        let rounding = PackagingRounding::new(Some(Decimal::from(10)), RoundingMode::Up);

        assert_eq!(rounding.round(Decimal::MAX), Decimal::MAX);
        assert_eq!(rounding.round_up_to(Decimal::MAX), Decimal::MAX);
        assert_eq!(rounding.tolerance_for(&[Decimal::MAX]), Decimal::from(10));
    }

    #[test]
    fn test_zero_granularity_ignored() {
        let rounding = PackagingRounding::new(Some(Decimal::ZERO), RoundingMode::Up);
        assert_eq!(rounding.granularity, None);
    }
}
