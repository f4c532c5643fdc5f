//! 比例分配（含最小生產量下限的迭代注水法）

use batch_core::{
    AllocationResult, BatchError, CandidateAllocation, CandidateVariant, RoundingPolicy,
};
use rust_decimal::Decimal;

use crate::overflow::{OverflowDetector, OverflowReport};

/// 分配過程中單一候選物料的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    /// 使用者固定
    Fixed,
    /// 仍參與比例分配
    Free,
    /// 已提升至最小生產量
    Floored,
}

#[derive(Debug, Clone)]
struct Slot {
    state: SlotState,
    quantity: Decimal,
    below_minimum: bool,
    fixed_overflowing: bool,
}

/// 比例分配器
pub struct ProportionalAllocator;

impl ProportionalAllocator {
    /// 將產能分配給候選物料
    ///
    /// 不可行（固定數量超出產能、下限耗盡產能）不會回傳錯誤，而是以旗標呈現在結果中。
    /// 只有產能不是正數時才會失敗。
    pub fn allocate(
        semi_product_code: &str,
        capacity: Decimal,
        candidates: &[CandidateVariant],
        rounding: &dyn RoundingPolicy,
    ) -> batch_core::Result<AllocationResult> {
        if capacity <= Decimal::ZERO {
            return Err(BatchError::InvalidControlValue(format!(
                "產能必須大於 0: {}",
                capacity
            )));
        }

        // Step 1: 區分固定與未固定
        let mut slots: Vec<Slot> = candidates
            .iter()
            .map(|c| match c.pinned_quantity() {
                Some(quantity) => Slot {
                    state: SlotState::Fixed,
                    quantity,
                    below_minimum: false,
                    fixed_overflowing: false,
                },
                None => Slot {
                    state: SlotState::Free,
                    quantity: Decimal::ZERO,
                    below_minimum: false,
                    fixed_overflowing: false,
                },
            })
            .collect();

        let mut fixed_sum = Decimal::ZERO;
        for (slot, candidate) in slots.iter().zip(candidates) {
            if slot.state != SlotState::Fixed {
                continue;
            }
            fixed_sum = fixed_sum.checked_add(slot.quantity).ok_or_else(|| {
                BatchError::InvalidCandidate {
                    code: candidate.code.clone(),
                    reason: "固定數量合計超出可計算範圍".to_string(),
                }
            })?;
        }

        // Step 2: 固定數量本身已超出產能
        if fixed_sum > capacity {
            tracing::warn!(
                "半成品 {} 固定數量 {} 超出產能 {}",
                semi_product_code,
                fixed_sum,
                capacity
            );

            for slot in slots.iter_mut() {
                if slot.state == SlotState::Fixed {
                    slot.fixed_overflowing = true;
                }
            }

            let report = OverflowDetector::new().detect(capacity, fixed_sum, &[])?;
            return Ok(Self::build_result(
                semi_product_code,
                capacity,
                candidates,
                &slots,
                fixed_sum,
                &report,
                false,
            ));
        }

        // Step 3-6: 迭代比例分配
        let remaining = capacity - fixed_sum;
        let floors_exhausted = Self::water_fill(candidates, &mut slots, remaining)?;

        // 收斂後才依包裝粒度捨入
        let mut free_quantities = Vec::new();
        let mut floors = Vec::new();
        for (slot, candidate) in slots.iter_mut().zip(candidates) {
            if slot.state == SlotState::Fixed {
                continue;
            }
            slot.quantity =
                rounding.round_with_floor(slot.quantity, candidate.minimal_manufacturing_quantity);
            free_quantities.push(slot.quantity);
            floors.push(candidate.minimal_manufacturing_quantity);
        }

        // 捨入前總量恰為產能，超出部分只來自捨入與下限提升
        let report = OverflowDetector::with_tolerance(rounding.tolerance_for(&floors))
            .detect(capacity, fixed_sum, &free_quantities)?;

        if floors_exhausted {
            tracing::warn!(
                "半成品 {} 產能不足以滿足所有最小生產量（{}%）",
                semi_product_code,
                report.overflow_percentage
            );
        }

        Ok(Self::build_result(
            semi_product_code,
            capacity,
            candidates,
            &slots,
            fixed_sum,
            &report,
            floors_exhausted,
        ))
    }

    /// 迭代注水：低於下限者提升至下限後移出，剩餘量重新按權重分配
    ///
    /// 回傳下限是否耗盡產能。每輪至少移出一個候選物料，迭代次數不超過候選數。
    fn water_fill(
        candidates: &[CandidateVariant],
        slots: &mut [Slot],
        mut remaining: Decimal,
    ) -> batch_core::Result<bool> {
        let mut free: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state == SlotState::Free)
            .map(|(idx, _)| idx)
            .collect();

        let max_iterations = free.len() + 1;

        for iteration in 0..max_iterations {
            if free.is_empty() {
                return Ok(false);
            }

            let shares = Self::proportional_shares(candidates, &free, remaining)?;

            // 剛好等於下限視為滿足
            let violators: Vec<usize> = free
                .iter()
                .zip(&shares)
                .filter(|(idx, share)| **share < candidates[**idx].minimal_manufacturing_quantity)
                .map(|(idx, _)| *idx)
                .collect();

            tracing::debug!(
                "第 {} 輪：剩餘 {}，未固定 {} 個，低於下限 {} 個",
                iteration,
                remaining,
                free.len(),
                violators.len()
            );

            if violators.is_empty() {
                for (idx, share) in free.iter().zip(shares) {
                    slots[*idx].quantity = share;
                }
                return Ok(false);
            }

            // 合計溢出時必然超過剩餘量
            let floor_sum = violators.iter().try_fold(Decimal::ZERO, |acc, idx| {
                acc.checked_add(candidates[*idx].minimal_manufacturing_quantity)
            });

            let Some(floor_sum) = floor_sum.filter(|sum| *sum <= remaining) else {
                // 下限耗盡：剩餘候選保留各自的比例份額並標示
                for (idx, share) in free.iter().zip(shares) {
                    let slot = &mut slots[*idx];
                    slot.quantity = share;
                    slot.below_minimum = share < candidates[*idx].minimal_manufacturing_quantity;
                }
                return Ok(true);
            };

            for idx in &violators {
                let slot = &mut slots[*idx];
                slot.state = SlotState::Floored;
                slot.quantity = candidates[*idx].minimal_manufacturing_quantity;
            }
            free.retain(|idx| !violators.contains(idx));
            remaining -= floor_sum;
        }

        Ok(false)
    }

    /// 按權重計算份額；最後一個取餘數，使份額總和恰為剩餘量
    ///
    /// 先算權重比例再乘剩餘量，中間值不會超過剩餘量。
    fn proportional_shares(
        candidates: &[CandidateVariant],
        free: &[usize],
        remaining: Decimal,
    ) -> batch_core::Result<Vec<Decimal>> {
        let mut total_weight = Decimal::ZERO;
        for idx in free {
            let candidate = &candidates[*idx];
            total_weight = total_weight
                .checked_add(candidate.weight_factor)
                .ok_or_else(|| BatchError::InvalidCandidate {
                    code: candidate.code.clone(),
                    reason: "權重合計超出可計算範圍".to_string(),
                })?;
        }
        let count = Decimal::from(free.len());

        let mut shares = Vec::with_capacity(free.len());
        let mut distributed = Decimal::ZERO;

        for (position, idx) in free.iter().enumerate() {
            let share = if position + 1 == free.len() {
                remaining - distributed
            } else if total_weight > Decimal::ZERO {
                let ratio = candidates[*idx].weight_factor / total_weight;
                remaining.checked_mul(ratio).ok_or_else(|| BatchError::InvalidCandidate {
                    code: candidates[*idx].code.clone(),
                    reason: format!("份額 {} × {} 超出可計算範圍", remaining, ratio),
                })?
            } else {
                // 權重全為 0 時平均分配
                remaining / count
            };
            distributed += share;
            shares.push(share);
        }

        Ok(shares)
    }

    fn build_result(
        semi_product_code: &str,
        capacity: Decimal,
        candidates: &[CandidateVariant],
        slots: &[Slot],
        fixed_sum: Decimal,
        report: &OverflowReport,
        floors_exhausted: bool,
    ) -> AllocationResult {
        let allocations: Vec<CandidateAllocation> = candidates
            .iter()
            .zip(slots)
            .map(|(candidate, slot)| CandidateAllocation {
                code: candidate.code.clone(),
                display_name: candidate.display_name.clone(),
                minimal_manufacturing_quantity: candidate.minimal_manufacturing_quantity,
                is_fixed: slot.state == SlotState::Fixed,
                allocated_quantity: slot.quantity,
                is_below_minimum: slot.below_minimum,
                is_fixed_and_overflowing: slot.fixed_overflowing,
                shelf_life_days: candidate.shelf_life_days,
            })
            .collect();

        AllocationResult {
            semi_product_code: semi_product_code.to_string(),
            capacity,
            allocations,
            is_overflow: report.is_overflow,
            overflow_percentage: report.overflow_percentage,
            fixed_sum,
            total_allocated: report.total,
            floors_exhausted,
        }
    }
}
