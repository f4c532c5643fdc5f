//! 批次規劃配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BatchError, Result};

/// 包裝粒度捨入方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingMode {
    /// 向下捨入（總量不超過產能）
    Down,
    /// 向上捨入
    Up,
    /// 四捨五入到最近倍數
    Nearest,
}

/// 規劃器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// 捨入方向
    pub rounding_mode: RoundingMode,

    /// 預設包裝粒度（半成品沒有設定時使用）
    pub default_packaging_granularity: Option<Decimal>,

    /// 批號日期格式（chrono 格式字串）
    pub lot_date_format: String,

    /// 超量警示門檻（百分比）
    pub overflow_warning_threshold: Decimal,

    /// 單次請求允許的最大候選物料數
    pub max_candidates: usize,
}

impl PlannerConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            rounding_mode: RoundingMode::Down,
            default_packaging_granularity: None,
            lot_date_format: "%Y%m%d".to_string(),
            overflow_warning_threshold: Decimal::ONE_HUNDRED,
            max_candidates: 500,
        }
    }

    /// 建構器模式：設置捨入方向
    pub fn with_rounding_mode(mut self, mode: RoundingMode) -> Self {
        self.rounding_mode = mode;
        self
    }

    /// 建構器模式：設置預設包裝粒度
    pub fn with_default_packaging_granularity(mut self, granularity: Decimal) -> Self {
        self.default_packaging_granularity = Some(granularity);
        self
    }

    /// 建構器模式：設置批號日期格式
    pub fn with_lot_date_format(mut self, format: String) -> Self {
        self.lot_date_format = format;
        self
    }

    /// 建構器模式：設置超量警示門檻
    pub fn with_overflow_warning_threshold(mut self, threshold: Decimal) -> Self {
        self.overflow_warning_threshold = threshold;
        self
    }

    /// 建構器模式：設置最大候選物料數
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| BatchError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if let Some(granularity) = self.default_packaging_granularity {
            if granularity <= Decimal::ZERO {
                return Err(BatchError::InvalidConfig(format!(
                    "包裝粒度必須大於 0: {}",
                    granularity
                )));
            }
        }

        if self.lot_date_format.trim().is_empty() {
            return Err(BatchError::InvalidConfig("批號日期格式不可為空".to_string()));
        }

        if self.overflow_warning_threshold <= Decimal::ZERO {
            return Err(BatchError::InvalidConfig(format!(
                "超量警示門檻必須大於 0: {}",
                self.overflow_warning_threshold
            )));
        }

        if self.max_candidates == 0 {
            return Err(BatchError::InvalidConfig("最大候選物料數必須大於 0".to_string()));
        }

        Ok(())
    }

    /// 決定半成品實際使用的包裝粒度
    pub fn granularity_for(&self, semi_product_granularity: Option<Decimal>) -> Option<Decimal> {
        semi_product_granularity
            .filter(|g| *g > Decimal::ZERO)
            .or(self.default_packaging_granularity)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
