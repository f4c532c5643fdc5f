//! 主資料（目錄）來源

use std::collections::HashMap;

use crate::candidate::{CandidateVariant, SemiProduct};
use crate::{BatchError, Result};

/// 主資料服務介面
///
/// 每次重算都重新讀取，引擎不得修改回傳的快照。
pub trait CatalogSource: Send + Sync {
    /// 取得半成品主資料
    fn semi_product(&self, code: &str) -> Result<SemiProduct>;

    /// 取得半成品族的候選物料
    fn candidates(&self, code: &str) -> Result<Vec<CandidateVariant>>;
}

/// 記憶體內主資料（測試與示例使用）
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    families: HashMap<String, (SemiProduct, Vec<CandidateVariant>)>,
    offline: bool,
}

impl InMemoryCatalog {
    /// 創建空的主資料
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增（或取代）一個半成品族
    pub fn insert(&mut self, semi_product: SemiProduct, candidates: Vec<CandidateVariant>) {
        self.families
            .insert(semi_product.code.clone(), (semi_product, candidates));
    }

    /// 模擬服務中斷
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn family(&self, code: &str) -> Result<&(SemiProduct, Vec<CandidateVariant>)> {
        if self.offline {
            return Err(BatchError::MetadataUnavailable(format!(
                "主資料服務離線，無法讀取 {}",
                code
            )));
        }

        self.families
            .get(code)
            .ok_or_else(|| BatchError::UnknownSemiProduct(code.to_string()))
    }
}

impl CatalogSource for InMemoryCatalog {
    fn semi_product(&self, code: &str) -> Result<SemiProduct> {
        self.family(code).map(|(semi, _)| semi.clone())
    }

    fn candidates(&self, code: &str) -> Result<Vec<CandidateVariant>> {
        self.family(code).map(|(_, candidates)| candidates.clone())
    }
}
