//! 分配請求模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::candidate::{CandidateVariant, FixedOverride};
use crate::catalog::CatalogSource;
use crate::{BatchError, Result};

/// 產能控制模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// 半成品最小生產量的倍數（控制值為無單位倍數）
    MmqMultiplier,
    /// 總重量（控制值即為生產單位的數量）
    TotalWeight,
    /// 目標覆蓋天數（控制值為天數）
    TargetDaysCoverage,
}

/// 一次重算請求（每次使用者觸發重算時重新建立，不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// 半成品代碼
    pub semi_product_code: String,

    /// 控制模式
    pub control_mode: ControlMode,

    /// 控制值（意義依模式而定）
    pub control_value: Decimal,

    /// 候選物料（含使用者固定覆寫）
    pub candidates: Vec<CandidateVariant>,
}

impl AllocationRequest {
    /// 創建新的分配請求
    pub fn new(
        semi_product_code: String,
        control_mode: ControlMode,
        control_value: Decimal,
        candidates: Vec<CandidateVariant>,
    ) -> Self {
        Self {
            semi_product_code,
            control_mode,
            control_value,
            candidates,
        }
    }

    /// 從主資料建立請求，並套用使用者的固定覆寫
    ///
    /// 候選物料每次都從主資料重新讀取；覆寫中出現主資料沒有的代碼時回傳錯誤。
    pub fn from_catalog(
        catalog: &dyn CatalogSource,
        semi_product_code: &str,
        control_mode: ControlMode,
        control_value: Decimal,
        overrides: &[FixedOverride],
    ) -> Result<Self> {
        let mut candidates = catalog.candidates(semi_product_code)?;

        for fixed in overrides {
            let candidate = candidates
                .iter_mut()
                .find(|c| c.code == fixed.code)
                .ok_or_else(|| BatchError::InvalidCandidate {
                    code: fixed.code.clone(),
                    reason: format!("不屬於半成品 {}", semi_product_code),
                })?;
            candidate.is_fixed = true;
            candidate.fixed_quantity = Some(fixed.quantity);
        }

        Ok(Self::new(
            semi_product_code.to_string(),
            control_mode,
            control_value,
            candidates,
        ))
    }

    /// 固定候選物料數量
    pub fn fixed_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_fixed).count()
    }
}
