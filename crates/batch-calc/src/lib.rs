//! # Batch Calculation Engine
//!
//! 半成品批次分配引擎：產能解析、比例分配、超量偵測、製令草稿

pub mod allocator;
pub mod capacity;
pub mod draft;
pub mod overflow;
pub mod planner;
pub mod validation;

// Re-export 主要類型
pub use allocator::ProportionalAllocator;
pub use capacity::CapacityResolver;
pub use draft::BatchDraftGenerator;
pub use overflow::{OverflowDetector, OverflowReport};
pub use planner::BatchPlanner;
pub use validation::RequestValidator;

/// 一次重算的輸出
#[derive(Debug, Clone)]
pub struct PlanningOutcome {
    /// 分配結果
    pub result: batch_core::AllocationResult,

    /// 提示訊息（畫面以通知顯示）
    pub warnings: Vec<PlanningWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl PlanningOutcome {
    /// 是否有錯誤等級的提示
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.severity == WarningSeverity::Error)
    }
}

/// 規劃提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanningWarning {
    /// 半成品或物料代碼
    pub code: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanningWarning {
    pub fn new(code: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            code,
            message,
            severity,
        }
    }

    pub fn info(code: String, message: String) -> Self {
        Self::new(code, message, WarningSeverity::Info)
    }

    pub fn warning(code: String, message: String) -> Self {
        Self::new(code, message, WarningSeverity::Warning)
    }

    pub fn error(code: String, message: String) -> Self {
        Self::new(code, message, WarningSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Info,
    Warning,
    Error,
}
