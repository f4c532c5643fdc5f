//! # Batch Plan
//!
//! 半成品批次規劃：依控制模式解析產能，按需求權重分配給各變體，
//! 並產生可供使用者修改後提交的製令草稿。

pub mod logging;

pub use batch_calc::{
    BatchDraftGenerator, BatchPlanner, CapacityResolver, OverflowDetector, OverflowReport,
    PlanningOutcome, PlanningWarning, ProportionalAllocator, RequestValidator, WarningSeverity,
};
pub use batch_core::*;
