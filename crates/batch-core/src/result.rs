//! 分配結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 單一候選物料的分配結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAllocation {
    /// 物料代碼
    pub code: String,

    /// 顯示名稱
    pub display_name: String,

    /// 最小生產量
    pub minimal_manufacturing_quantity: Decimal,

    /// 是否為使用者固定
    pub is_fixed: bool,

    /// 分配數量
    pub allocated_quantity: Decimal,

    /// 分配量低於最小生產量（且非因產能耗盡而被提升）
    pub is_below_minimum: bool,

    /// 固定數量造成超出產能
    pub is_fixed_and_overflowing: bool,

    /// 保存期限（天），草稿產生時使用
    pub shelf_life_days: Option<u32>,
}

impl CandidateAllocation {
    /// 是否會成為製令行
    pub fn is_scheduled(&self) -> bool {
        self.allocated_quantity > Decimal::ZERO
    }

    /// 是否需要在畫面上標示
    pub fn is_flagged(&self) -> bool {
        self.is_below_minimum || self.is_fixed_and_overflowing
    }
}

/// 一次重算的分配結果（不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// 半成品代碼
    pub semi_product_code: String,

    /// 解析後的目標產能
    pub capacity: Decimal,

    /// 各候選物料分配（順序與請求相同）
    pub allocations: Vec<CandidateAllocation>,

    /// 固定數量總和已超出產能
    pub is_overflow: bool,

    /// 總分配量 ÷ 產能 × 100（可超過 100）
    pub overflow_percentage: Decimal,

    /// 固定數量總和
    pub fixed_sum: Decimal,

    /// 全部分配量總和（含固定）
    pub total_allocated: Decimal,

    /// 最小生產量下限耗盡產能（未固定的物料無法全部達到下限）
    pub floors_exhausted: bool,
}

impl AllocationResult {
    /// 依代碼查詢分配結果
    pub fn get(&self, code: &str) -> Option<&CandidateAllocation> {
        self.allocations.iter().find(|a| a.code == code)
    }

    /// 分配數量（找不到時為 0）
    pub fn quantity_of(&self, code: &str) -> Decimal {
        self.get(code)
            .map(|a| a.allocated_quantity)
            .unwrap_or(Decimal::ZERO)
    }

    /// 尚未分配的產能（超量時為負）
    pub fn remaining_capacity(&self) -> Decimal {
        self.capacity - self.total_allocated
    }

    /// 是否為可行的分配（無任何標示）
    pub fn is_feasible(&self) -> bool {
        !self.is_overflow && !self.floors_exhausted
    }

    /// 會成為製令行的分配
    pub fn scheduled(&self) -> impl Iterator<Item = &CandidateAllocation> {
        self.allocations.iter().filter(|a| a.is_scheduled())
    }

    /// 需要在畫面上標示的分配
    pub fn flagged(&self) -> impl Iterator<Item = &CandidateAllocation> {
        self.allocations.iter().filter(|a| a.is_flagged())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation(code: &str, quantity: i64, below: bool) -> CandidateAllocation {
        CandidateAllocation {
            code: code.to_string(),
            display_name: code.to_string(),
            minimal_manufacturing_quantity: Decimal::from(100),
            is_fixed: false,
            allocated_quantity: Decimal::from(quantity),
            is_below_minimum: below,
            is_fixed_and_overflowing: false,
            shelf_life_days: Some(365),
        }
    }

    #[test]
    fn test_result_queries() {
        let result = AllocationResult {
            semi_product_code: "SEMI-001".to_string(),
            capacity: Decimal::from(300),
            allocations: vec![allocation("A", 50, true), allocation("B", 0, true), allocation("C", 200, false)],
            is_overflow: false,
            overflow_percentage: Decimal::new(8333, 2),
            fixed_sum: Decimal::ZERO,
            total_allocated: Decimal::from(250),
            floors_exhausted: true,
        };

        assert_eq!(result.quantity_of("C"), Decimal::from(200));
        assert_eq!(result.quantity_of("Z"), Decimal::ZERO);
        assert_eq!(result.remaining_capacity(), Decimal::from(50));
        assert_eq!(result.scheduled().count(), 2);
        assert_eq!(result.flagged().count(), 2);
        assert!(!result.is_feasible());
    }
}
