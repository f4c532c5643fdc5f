//! 製令建立服務介面

use std::sync::Mutex;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::draft::BatchDraftLine;
use crate::{BatchError, Result};

/// 製令建立回執
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufactureOrderReceipt {
    /// 製令ID
    pub order_id: Uuid,

    /// 半成品代碼
    pub semi_product_code: String,

    /// 製令行數
    pub line_count: usize,

    /// 總計劃數量
    pub total_quantity: Decimal,
}

/// 製令建立服務
///
/// 交出草稿後所有權轉移，後續狀態轉換由該服務負責。
pub trait ManufactureOrderSink: Send + Sync {
    fn create_order(
        &self,
        semi_product_code: &str,
        lines: Vec<BatchDraftLine>,
    ) -> Result<ManufactureOrderReceipt>;
}

/// 記憶體內製令服務（測試與示例使用）
#[derive(Debug, Default)]
pub struct InMemoryOrderSink {
    orders: Mutex<Vec<(ManufactureOrderReceipt, Vec<BatchDraftLine>)>>,
}

impl InMemoryOrderSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已建立的製令數
    pub fn order_count(&self) -> usize {
        self.orders.lock().map(|orders| orders.len()).unwrap_or(0)
    }

    /// 取得已建立製令的行
    pub fn lines_of(&self, order_id: Uuid) -> Option<Vec<BatchDraftLine>> {
        let orders = self.orders.lock().ok()?;
        orders
            .iter()
            .find(|(receipt, _)| receipt.order_id == order_id)
            .map(|(_, lines)| lines.clone())
    }
}

impl ManufactureOrderSink for InMemoryOrderSink {
    fn create_order(
        &self,
        semi_product_code: &str,
        lines: Vec<BatchDraftLine>,
    ) -> Result<ManufactureOrderReceipt> {
        let total_quantity = lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.planned_quantity))
            .ok_or_else(|| {
                BatchError::InvalidDraft(format!("半成品 {} 製令數量合計超出可計算範圍", semi_product_code))
            })?;

        let receipt = ManufactureOrderReceipt {
            order_id: Uuid::new_v4(),
            semi_product_code: semi_product_code.to_string(),
            line_count: lines.len(),
            total_quantity,
        };

        let mut orders = self
            .orders
            .lock()
            .map_err(|_| BatchError::Other("製令儲存區已損毀".to_string()))?;
        orders.push((receipt.clone(), lines));

        Ok(receipt)
    }
}
