//! 產能解析

use batch_core::{BatchError, CandidateVariant, ControlMode, SemiProduct};
use rust_decimal::Decimal;

/// 產能解析器
pub struct CapacityResolver;

impl CapacityResolver {
    /// 依控制模式與控制值解析目標產能
    pub fn resolve(
        semi_product: &SemiProduct,
        control_mode: ControlMode,
        control_value: Decimal,
        candidates: &[CandidateVariant],
    ) -> batch_core::Result<Decimal> {
        if control_value <= Decimal::ZERO {
            return Err(BatchError::InvalidControlValue(format!(
                "控制值必須大於 0: {}",
                control_value
            )));
        }

        let capacity = match control_mode {
            ControlMode::MmqMultiplier => Self::mmq_multiplier(semi_product, control_value)?,
            ControlMode::TotalWeight => control_value,
            ControlMode::TargetDaysCoverage => Self::days_coverage(candidates, control_value)?,
        };

        if capacity <= Decimal::ZERO {
            return Err(BatchError::InvalidControlValue(format!(
                "半成品 {} 解析後產能為 {}",
                semi_product.code, capacity
            )));
        }

        tracing::debug!(
            "半成品 {} 產能解析：{:?} × {} = {}",
            semi_product.code,
            control_mode,
            control_value,
            capacity
        );

        Ok(capacity)
    }

    /// 半成品最小生產量 × 倍數
    fn mmq_multiplier(semi_product: &SemiProduct, multiplier: Decimal) -> batch_core::Result<Decimal> {
        let mmq = semi_product
            .minimal_manufacturing_quantity
            .filter(|mmq| *mmq > Decimal::ZERO)
            .ok_or_else(|| {
                BatchError::InvalidControlValue(format!(
                    "半成品 {} 缺少最小生產量",
                    semi_product.code
                ))
            })?;

        mmq.checked_mul(multiplier).ok_or_else(|| {
            BatchError::InvalidControlValue(format!(
                "半成品 {} 最小生產量 {} × {} 超出可計算範圍",
                semi_product.code, mmq, multiplier
            ))
        })
    }

    /// Σ 日消耗量 × 天數
    fn days_coverage(candidates: &[CandidateVariant], days: Decimal) -> batch_core::Result<Decimal> {
        let mut capacity = Decimal::ZERO;

        for candidate in candidates {
            let rate = candidate.daily_consumption_rate.ok_or_else(|| {
                BatchError::InvalidControlValue(format!("{} 缺少日消耗量", candidate.code))
            })?;
            capacity = rate
                .checked_mul(days)
                .and_then(|quantity| capacity.checked_add(quantity))
                .ok_or_else(|| {
                    BatchError::InvalidControlValue(format!(
                        "{} 日消耗量 {} × {} 天超出可計算範圍",
                        candidate.code, rate, days
                    ))
                })?;
        }

        Ok(capacity)
    }
}
