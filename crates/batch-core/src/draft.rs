//! 批次製令草稿行

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BatchError, Result};

/// 製令草稿行（提交前可由使用者修改）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDraftLine {
    /// 物料代碼
    pub variant_code: String,

    /// 計劃數量
    pub planned_quantity: Decimal,

    /// 批號
    pub lot_number: String,

    /// 生產日期
    pub manufacture_date: NaiveDate,

    /// 有效日期
    pub expiration_date: NaiveDate,
}

impl BatchDraftLine {
    /// 創建新的草稿行
    pub fn new(
        variant_code: String,
        planned_quantity: Decimal,
        lot_number: String,
        manufacture_date: NaiveDate,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            variant_code,
            planned_quantity,
            lot_number,
            manufacture_date,
            expiration_date,
        }
    }

    /// 建構器模式：覆寫批號
    pub fn with_lot_number(mut self, lot_number: String) -> Self {
        self.lot_number = lot_number;
        self
    }

    /// 修改批號
    pub fn set_lot_number(&mut self, lot_number: String) {
        self.lot_number = lot_number;
    }

    /// 修改有效日期
    pub fn set_expiration_date(&mut self, expiration_date: NaiveDate) {
        self.expiration_date = expiration_date;
    }

    /// 修改計劃數量
    pub fn set_planned_quantity(&mut self, quantity: Decimal) {
        self.planned_quantity = quantity;
    }

    /// 保存期限（天）
    pub fn shelf_life_days(&self) -> i64 {
        (self.expiration_date - self.manufacture_date).num_days()
    }

    /// 提交前檢查
    pub fn validate(&self) -> Result<()> {
        if self.planned_quantity <= Decimal::ZERO {
            return Err(BatchError::InvalidDraft(format!(
                "{} 的計劃數量必須大於 0: {}",
                self.variant_code, self.planned_quantity
            )));
        }

        if self.lot_number.trim().is_empty() {
            return Err(BatchError::InvalidDraft(format!(
                "{} 的批號不可為空",
                self.variant_code
            )));
        }

        if self.expiration_date < self.manufacture_date {
            return Err(BatchError::InvalidDraft(format!(
                "{} 的有效日期 {} 早於生產日期 {}",
                self.variant_code, self.expiration_date, self.manufacture_date
            )));
        }

        Ok(())
    }
}
