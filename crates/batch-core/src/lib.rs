//! # Batch Core
//!
//! 批次規劃核心資料模型與類型定義

pub mod candidate;
pub mod catalog;
pub mod config;
pub mod draft;
pub mod order;
pub mod request;
pub mod result;
pub mod rounding;

// Re-export 主要類型
pub use candidate::{CandidateVariant, FixedOverride, SemiProduct};
pub use catalog::{CatalogSource, InMemoryCatalog};
pub use config::{PlannerConfig, RoundingMode};
pub use draft::BatchDraftLine;
pub use order::{InMemoryOrderSink, ManufactureOrderReceipt, ManufactureOrderSink};
pub use request::{AllocationRequest, ControlMode};
pub use result::{AllocationResult, CandidateAllocation};
pub use rounding::{PackagingRounding, RoundingPolicy};

/// 批次規劃錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("無效的控制值: {0}")]
    InvalidControlValue(String),

    #[error("找不到半成品: {0}")]
    UnknownSemiProduct(String),

    #[error("缺少保存期限資料: {0}")]
    MissingShelfLife(String),

    #[error("主資料無法取得: {0}")]
    MetadataUnavailable(String),

    #[error("無效的候選物料 {code}: {reason}")]
    InvalidCandidate { code: String, reason: String },

    #[error("無效的批次草稿: {0}")]
    InvalidDraft(String),

    #[error("無效的日期: {0}")]
    InvalidDate(String),

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

impl BatchError {
    /// 是否為輸入錯誤（應以表單驗證呈現）
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            BatchError::InvalidControlValue(_)
                | BatchError::UnknownSemiProduct(_)
                | BatchError::MissingShelfLife(_)
                | BatchError::InvalidCandidate { .. }
                | BatchError::InvalidDraft(_)
        )
    }

    /// 是否為主資料取得失敗（硬性中止）
    pub fn is_metadata_error(&self) -> bool {
        matches!(self, BatchError::MetadataUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
