//! 批次製令草稿產生

use std::fmt::Write;

use batch_core::{AllocationResult, BatchDraftLine, BatchError};
use chrono::{Days, NaiveDate};

/// 草稿產生器
#[derive(Debug, Clone)]
pub struct BatchDraftGenerator {
    /// 批號日期格式
    lot_date_format: String,
}

impl BatchDraftGenerator {
    pub fn new(lot_date_format: String) -> Self {
        Self { lot_date_format }
    }

    /// 將分配結果轉為製令草稿行
    ///
    /// 分配量為 0 的候選物料不產生草稿行；有分配量卻缺少保存期限時失敗。
    /// 生產日期由呼叫端提供，不讀取系統時間。
    pub fn generate(
        &self,
        result: &AllocationResult,
        manufacture_date: NaiveDate,
    ) -> batch_core::Result<Vec<BatchDraftLine>> {
        let date_part = self.format_date(manufacture_date)?;

        result
            .scheduled()
            .map(|allocation| -> batch_core::Result<BatchDraftLine> {
                let shelf_life_days = allocation
                    .shelf_life_days
                    .ok_or_else(|| BatchError::MissingShelfLife(allocation.code.clone()))?;

                let expiration_date = Self::expiration_date(manufacture_date, shelf_life_days)?;

                Ok(BatchDraftLine::new(
                    allocation.code.clone(),
                    allocation.allocated_quantity,
                    Self::lot_number(&allocation.code, &date_part),
                    manufacture_date,
                    expiration_date,
                ))
            })
            .collect()
    }

    /// 預設批號：`<物料代碼>-<生產日期>`
    pub fn lot_number(variant_code: &str, date_part: &str) -> String {
        format!("{}-{}", variant_code, date_part)
    }

    /// 有效日期 = 生產日期 + 保存期限（考慮閏年）
    pub fn expiration_date(manufacture_date: NaiveDate, shelf_life_days: u32) -> batch_core::Result<NaiveDate> {
        manufacture_date
            .checked_add_days(Days::new(u64::from(shelf_life_days)))
            .ok_or_else(|| {
                BatchError::InvalidDate(format!("{} + {} 天溢出", manufacture_date, shelf_life_days))
            })
    }

    fn format_date(&self, date: NaiveDate) -> batch_core::Result<String> {
        let mut formatted = String::new();
        write!(formatted, "{}", date.format(&self.lot_date_format)).map_err(|_| {
            BatchError::InvalidConfig(format!("無效的批號日期格式: {}", self.lot_date_format))
        })?;
        Ok(formatted)
    }
}

impl Default for BatchDraftGenerator {
    fn default() -> Self {
        Self::new("%Y%m%d".to_string())
    }
}
