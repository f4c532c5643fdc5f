//! 超量偵測

use batch_core::{BatchDraftLine, BatchError};
use rust_decimal::{Decimal, RoundingStrategy};

/// 超量偵測結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowReport {
    /// 總量超出產能（扣除容許誤差後）
    pub is_overflow: bool,

    /// 總量 ÷ 產能 × 100，取兩位小數
    pub overflow_percentage: Decimal,

    /// 總量（固定 + 分配）
    pub total: Decimal,

    /// 超出產能的數量（未超出時為 0）
    pub excess: Decimal,
}

/// 超量偵測器
///
/// 固定數量超量、下限耗盡，以及使用者事後修改草稿後的重新檢查都使用同一套邏輯。
#[derive(Debug, Clone, Copy, Default)]
pub struct OverflowDetector {
    /// 捨入容許誤差
    tolerance: Decimal,
}

impl OverflowDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// 允許總量超出產能 `tolerance`（包裝捨入造成）
    pub fn with_tolerance(tolerance: Decimal) -> Self {
        Self {
            tolerance: tolerance.max(Decimal::ZERO),
        }
    }

    /// 偵測超量
    pub fn detect(
        &self,
        capacity: Decimal,
        fixed_sum: Decimal,
        final_allocations: &[Decimal],
    ) -> batch_core::Result<OverflowReport> {
        if capacity <= Decimal::ZERO {
            return Err(BatchError::InvalidControlValue(format!(
                "產能必須大於 0: {}",
                capacity
            )));
        }

        let total = final_allocations
            .iter()
            .try_fold(fixed_sum, |acc, quantity| acc.checked_add(*quantity))
            .ok_or_else(|| BatchError::InvalidControlValue("分配總量超出可計算範圍".to_string()))?;

        let overflow_percentage = Self::percentage(total, capacity)
            .ok_or_else(|| {
                BatchError::InvalidControlValue(format!(
                    "總量 {} 相對產能 {} 的比例超出可計算範圍",
                    total, capacity
                ))
            })?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        // 上限超出可表示範圍時，任何總量都不算超量
        let is_overflow = capacity
            .checked_add(self.tolerance)
            .is_some_and(|limit| total > limit);

        Ok(OverflowReport {
            is_overflow,
            overflow_percentage,
            total,
            excess: (total - capacity).max(Decimal::ZERO),
        })
    }

    /// total × 100 ÷ capacity；乘法溢出時改為先除後乘
    fn percentage(total: Decimal, capacity: Decimal) -> Option<Decimal> {
        match total.checked_mul(Decimal::ONE_HUNDRED) {
            Some(scaled) => scaled.checked_div(capacity),
            None => total
                .checked_div(capacity)?
                .checked_mul(Decimal::ONE_HUNDRED),
        }
    }

    /// 使用者修改草稿數量後重新檢查
    pub fn revalidate(
        &self,
        capacity: Decimal,
        lines: &[BatchDraftLine],
    ) -> batch_core::Result<OverflowReport> {
        let quantities: Vec<Decimal> = lines.iter().map(|l| l.planned_quantity).collect();
        self.detect(capacity, Decimal::ZERO, &quantities)
    }
}
