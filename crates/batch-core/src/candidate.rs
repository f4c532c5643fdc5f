//! 候選物料與半成品主資料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 半成品主資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemiProduct {
    /// 半成品代碼
    pub code: String,

    /// 名稱
    pub name: String,

    /// 半成品最小生產量（MmqMultiplier 模式需要）
    pub minimal_manufacturing_quantity: Option<Decimal>,

    /// 包裝粒度（分配結果按此倍數捨入）
    pub packaging_granularity: Option<Decimal>,
}

impl SemiProduct {
    /// 創建新的半成品
    pub fn new(code: String, name: String) -> Self {
        Self {
            code,
            name,
            minimal_manufacturing_quantity: None,
            packaging_granularity: None,
        }
    }

    /// 建構器模式：設置最小生產量
    pub fn with_minimal_manufacturing_quantity(mut self, mmq: Decimal) -> Self {
        self.minimal_manufacturing_quantity = Some(mmq);
        self
    }

    /// 建構器模式：設置包裝粒度
    pub fn with_packaging_granularity(mut self, granularity: Decimal) -> Self {
        self.packaging_granularity = Some(granularity);
        self
    }
}

/// 候選物料（半成品族中可生產的一個變體）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateVariant {
    /// 物料代碼（族內唯一）
    pub code: String,

    /// 顯示名稱
    pub display_name: String,

    /// 最小生產量（MMQ）
    pub minimal_manufacturing_quantity: Decimal,

    /// 相對需求權重（同族內可比較，總和不必為 1）
    pub weight_factor: Decimal,

    /// 使用者是否固定數量
    pub is_fixed: bool,

    /// 使用者固定數量（僅在 is_fixed 時有意義）
    pub fixed_quantity: Option<Decimal>,

    /// 保存期限（天）
    pub shelf_life_days: Option<u32>,

    /// 日消耗量（TargetDaysCoverage 模式需要）
    pub daily_consumption_rate: Option<Decimal>,
}

impl CandidateVariant {
    /// 創建新的候選物料
    pub fn new(code: String, minimal_manufacturing_quantity: Decimal, weight_factor: Decimal) -> Self {
        Self {
            display_name: code.clone(),
            code,
            minimal_manufacturing_quantity,
            weight_factor,
            is_fixed: false,
            fixed_quantity: None,
            shelf_life_days: None,
            daily_consumption_rate: None,
        }
    }

    /// 建構器模式：設置顯示名稱
    pub fn with_display_name(mut self, display_name: String) -> Self {
        self.display_name = display_name;
        self
    }

    /// 建構器模式：固定數量
    pub fn with_fixed_quantity(mut self, quantity: Decimal) -> Self {
        self.is_fixed = true;
        self.fixed_quantity = Some(quantity);
        self
    }

    /// 建構器模式：設置保存期限
    pub fn with_shelf_life_days(mut self, days: u32) -> Self {
        self.shelf_life_days = Some(days);
        self
    }

    /// 建構器模式：設置日消耗量
    pub fn with_daily_consumption_rate(mut self, rate: Decimal) -> Self {
        self.daily_consumption_rate = Some(rate);
        self
    }

    /// 取消固定
    pub fn release(&mut self) {
        self.is_fixed = false;
        self.fixed_quantity = None;
    }

    /// 固定數量（未固定時為 None）
    pub fn pinned_quantity(&self) -> Option<Decimal> {
        if self.is_fixed {
            self.fixed_quantity
        } else {
            None
        }
    }
}

/// 使用者對某候選物料的固定數量覆寫
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedOverride {
    pub code: String,
    pub quantity: Decimal,
}

impl FixedOverride {
    pub fn new(code: String, quantity: Decimal) -> Self {
        Self { code, quantity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_candidate() {
        let candidate = CandidateVariant::new("VAR-A".to_string(), Decimal::from(100), Decimal::new(5, 1));

        assert_eq!(candidate.code, "VAR-A");
        assert_eq!(candidate.display_name, "VAR-A");
        assert!(!candidate.is_fixed);
        assert_eq!(candidate.pinned_quantity(), None);
    }

    #[test]
    fn test_candidate_builder() {
        let mut candidate = CandidateVariant::new("VAR-B".to_string(), Decimal::from(50), Decimal::ONE)
            .with_display_name("Krém 50 ml".to_string())
            .with_fixed_quantity(Decimal::from(200))
            .with_shelf_life_days(730)
            .with_daily_consumption_rate(Decimal::from(12));

        assert_eq!(candidate.display_name, "Krém 50 ml");
        assert_eq!(candidate.pinned_quantity(), Some(Decimal::from(200)));
        assert_eq!(candidate.shelf_life_days, Some(730));
        assert_eq!(candidate.daily_consumption_rate, Some(Decimal::from(12)));

        candidate.release();
        assert_eq!(candidate.pinned_quantity(), None);
    }

    #[test]
    fn test_semi_product_builder() {
        let semi = SemiProduct::new("SEMI-001".to_string(), "Base cream".to_string())
            .with_minimal_manufacturing_quantity(Decimal::from(1000))
            .with_packaging_granularity(Decimal::from(10));

        assert_eq!(semi.minimal_manufacturing_quantity, Some(Decimal::from(1000)));
        assert_eq!(semi.packaging_granularity, Some(Decimal::from(10)));
    }
}
