//! 批次規劃主流程

use batch_core::{
    AllocationRequest, AllocationResult, BatchDraftLine, BatchError, CatalogSource,
    ManufactureOrderReceipt, ManufactureOrderSink, PackagingRounding, PlannerConfig,
    RoundingPolicy,
};
use chrono::NaiveDate;
use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::allocator::ProportionalAllocator;
use crate::capacity::CapacityResolver;
use crate::draft::BatchDraftGenerator;
use crate::validation::RequestValidator;
use crate::{PlanningOutcome, PlanningWarning};

/// 批次規劃器
///
/// 不保存任何請求之間的狀態；每次重算都重新讀取主資料。
pub struct BatchPlanner<C: CatalogSource> {
    /// 主資料來源
    catalog: C,

    /// 規劃配置
    config: PlannerConfig,
}

impl<C: CatalogSource> BatchPlanner<C> {
    /// 創建新的規劃器
    pub fn new(catalog: C, config: PlannerConfig) -> batch_core::Result<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    /// 使用預設配置
    pub fn with_default_config(catalog: C) -> Self {
        Self {
            catalog,
            config: PlannerConfig::default(),
        }
    }

    /// 重算入口（使用配置的包裝捨入）
    pub fn recompute(&self, request: &AllocationRequest) -> batch_core::Result<PlanningOutcome> {
        self.recompute_inner(request, None)
    }

    /// 重算入口（注入捨入策略）
    pub fn recompute_with_policy(
        &self,
        request: &AllocationRequest,
        rounding: &dyn RoundingPolicy,
    ) -> batch_core::Result<PlanningOutcome> {
        self.recompute_inner(request, Some(rounding))
    }

    fn recompute_inner(
        &self,
        request: &AllocationRequest,
        rounding: Option<&dyn RoundingPolicy>,
    ) -> batch_core::Result<PlanningOutcome> {
        tracing::info!(
            "開始批次重算：半成品 {}，模式 {:?}，控制值 {}，候選 {} 筆",
            request.semi_product_code,
            request.control_mode,
            request.control_value,
            request.candidates.len()
        );

        let start_time = std::time::Instant::now();

        // Step 1: 驗證與正規化
        let request = RequestValidator::normalize(request, &self.config)?;

        // Step 2: 讀取半成品主資料
        let semi_product = self.catalog.semi_product(&request.semi_product_code)?;

        // Step 3: 解析產能
        let capacity = CapacityResolver::resolve(
            &semi_product,
            request.control_mode,
            request.control_value,
            &request.candidates,
        )?;

        // Step 4: 比例分配
        let packaging = PackagingRounding::new(
            self.config.granularity_for(semi_product.packaging_granularity),
            self.config.rounding_mode,
        );
        let rounding: &dyn RoundingPolicy = match rounding {
            Some(rounding) => rounding,
            None => &packaging,
        };

        let result = ProportionalAllocator::allocate(
            &request.semi_product_code,
            capacity,
            &request.candidates,
            rounding,
        )?;

        // Step 5: 提示訊息
        let warnings = self.collect_warnings(&result);

        tracing::info!(
            "批次重算完成，耗時 {:?}，產能 {}，分配 {}（{}%）",
            start_time.elapsed(),
            result.capacity,
            result.total_allocated,
            result.overflow_percentage
        );

        Ok(PlanningOutcome {
            result,
            warnings,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        })
    }

    /// 平行重算多個互不相關的請求
    pub fn recompute_many(
        &self,
        requests: &[AllocationRequest],
    ) -> Vec<batch_core::Result<PlanningOutcome>> {
        requests
            .par_iter()
            .map(|request| self.recompute(request))
            .collect()
    }

    /// 由分配結果產生製令草稿
    pub fn drafts(
        &self,
        result: &AllocationResult,
        manufacture_date: NaiveDate,
    ) -> batch_core::Result<Vec<BatchDraftLine>> {
        BatchDraftGenerator::new(self.config.lot_date_format.clone())
            .generate(result, manufacture_date)
    }

    /// 重算並產生草稿
    pub fn recompute_with_drafts(
        &self,
        request: &AllocationRequest,
        manufacture_date: NaiveDate,
    ) -> batch_core::Result<(PlanningOutcome, Vec<BatchDraftLine>)> {
        let outcome = self.recompute(request)?;
        let drafts = self.drafts(&outcome.result, manufacture_date)?;
        Ok((outcome, drafts))
    }

    /// 使用者確認後交給製令建立服務
    pub fn commit(
        &self,
        semi_product_code: &str,
        lines: Vec<BatchDraftLine>,
        sink: &dyn ManufactureOrderSink,
    ) -> batch_core::Result<ManufactureOrderReceipt> {
        if lines.is_empty() {
            return Err(BatchError::InvalidDraft(format!(
                "半成品 {} 沒有任何製令行",
                semi_product_code
            )));
        }

        for line in &lines {
            line.validate()?;
        }

        let receipt = sink.create_order(semi_product_code, lines)?;

        tracing::info!(
            "半成品 {} 製令已建立：{}（{} 行，共 {}）",
            semi_product_code,
            receipt.order_id,
            receipt.line_count,
            receipt.total_quantity
        );

        Ok(receipt)
    }

    /// 產生給畫面顯示的提示訊息
    fn collect_warnings(&self, result: &AllocationResult) -> Vec<PlanningWarning> {
        let mut warnings = Vec::new();

        if result.fixed_sum > result.capacity {
            warnings.push(PlanningWarning::error(
                result.semi_product_code.clone(),
                format!(
                    "固定數量合計 {} 超出產能 {}（{}%）",
                    result.fixed_sum, result.capacity, result.overflow_percentage
                ),
            ));
        } else if result.is_overflow {
            warnings.push(PlanningWarning::warning(
                result.semi_product_code.clone(),
                format!("分配總量超出產能（{}%）", result.overflow_percentage),
            ));
        } else if result.overflow_percentage > self.config.overflow_warning_threshold {
            // 包裝捨入與下限提升造成的超出在容許範圍內
            warnings.push(PlanningWarning::info(
                result.semi_product_code.clone(),
                format!("包裝捨入後分配總量為產能的 {}%", result.overflow_percentage),
            ));
        }

        for allocation in result.allocations.iter().filter(|a| a.is_below_minimum) {
            warnings.push(PlanningWarning::warning(
                allocation.code.clone(),
                format!(
                    "分配量 {} 低於最小生產量 {}",
                    allocation.allocated_quantity, allocation.minimal_manufacturing_quantity
                ),
            ));
        }

        if !result.is_overflow && result.remaining_capacity() > Decimal::ZERO {
            warnings.push(PlanningWarning::info(
                result.semi_product_code.clone(),
                format!("尚有 {} 產能未分配", result.remaining_capacity()),
            ));
        }

        for warning in &warnings {
            tracing::debug!("{:?} {}: {}", warning.severity, warning.code, warning.message);
        }

        warnings
    }

    /// 獲取配置引用
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 獲取主資料來源引用
    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}
