//! 請求驗證與正規化

use std::collections::HashSet;

use batch_core::{AllocationRequest, BatchError, CandidateVariant, PlannerConfig};
use rust_decimal::Decimal;

/// 請求驗證器
pub struct RequestValidator;

impl RequestValidator {
    /// 驗證並回傳正規化後的請求（原請求不變）
    ///
    /// - 代碼去除前後空白
    /// - 未固定的候選物料忽略固定數量
    /// - 候選物料順序保持不變
    pub fn normalize(
        request: &AllocationRequest,
        config: &PlannerConfig,
    ) -> batch_core::Result<AllocationRequest> {
        let semi_product_code = request.semi_product_code.trim();
        if semi_product_code.is_empty() {
            return Err(BatchError::UnknownSemiProduct(request.semi_product_code.clone()));
        }

        if request.control_value <= Decimal::ZERO {
            return Err(BatchError::InvalidControlValue(format!(
                "控制值必須大於 0: {}",
                request.control_value
            )));
        }

        if request.candidates.len() > config.max_candidates {
            return Err(BatchError::InvalidCandidate {
                code: semi_product_code.to_string(),
                reason: format!(
                    "候選物料 {} 個，超過上限 {}",
                    request.candidates.len(),
                    config.max_candidates
                ),
            });
        }

        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(request.candidates.len());

        for candidate in &request.candidates {
            let normalized = Self::normalize_candidate(candidate)?;
            if !seen.insert(normalized.code.clone()) {
                return Err(BatchError::InvalidCandidate {
                    code: normalized.code,
                    reason: "重複的代碼".to_string(),
                });
            }
            candidates.push(normalized);
        }

        Ok(AllocationRequest::new(
            semi_product_code.to_string(),
            request.control_mode,
            request.control_value,
            candidates,
        ))
    }

    fn normalize_candidate(candidate: &CandidateVariant) -> batch_core::Result<CandidateVariant> {
        let code = candidate.code.trim().to_string();
        let invalid = |reason: String| BatchError::InvalidCandidate {
            code: code.clone(),
            reason,
        };

        if code.is_empty() {
            return Err(invalid("代碼不可為空".to_string()));
        }

        if candidate.minimal_manufacturing_quantity < Decimal::ZERO {
            return Err(invalid(format!(
                "最小生產量不可為負: {}",
                candidate.minimal_manufacturing_quantity
            )));
        }

        if candidate.weight_factor < Decimal::ZERO {
            return Err(invalid(format!("權重不可為負: {}", candidate.weight_factor)));
        }

        if let Some(rate) = candidate.daily_consumption_rate {
            if rate < Decimal::ZERO {
                return Err(invalid(format!("日消耗量不可為負: {}", rate)));
            }
        }

        let fixed_quantity = if candidate.is_fixed {
            match candidate.fixed_quantity {
                Some(quantity) if quantity >= Decimal::ZERO => Some(quantity),
                Some(quantity) => return Err(invalid(format!("固定數量不可為負: {}", quantity))),
                None => return Err(invalid("已固定但缺少固定數量".to_string())),
            }
        } else {
            None
        };

        let mut normalized = candidate.clone();
        normalized.display_name = candidate.display_name.trim().to_string();
        if normalized.display_name.is_empty() {
            normalized.display_name = code.clone();
        }
        normalized.code = code;
        normalized.fixed_quantity = fixed_quantity;

        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batch_core::ControlMode;

    fn request(candidates: Vec<CandidateVariant>) -> AllocationRequest {
        AllocationRequest::new(
            " SEMI-001 ".to_string(),
            ControlMode::TotalWeight,
            Decimal::from(1000),
            candidates,
        )
    }

    fn candidate(code: &str) -> CandidateVariant {
        CandidateVariant::new(code.to_string(), Decimal::from(100), Decimal::ONE)
    }

    #[test]
    fn test_normalize_trims_and_keeps_order() {
        let mut loose = candidate("B");
        loose.fixed_quantity = Some(Decimal::from(50)); // 未固定，應忽略

        let normalized = RequestValidator::normalize(
            &request(vec![candidate(" A "), loose]),
            &PlannerConfig::default(),
        )
        .unwrap();

        assert_eq!(normalized.semi_product_code, "SEMI-001");
        assert_eq!(normalized.candidates[0].code, "A");
        assert_eq!(normalized.candidates[0].display_name, "A");
        assert_eq!(normalized.candidates[1].code, "B");
        assert_eq!(normalized.candidates[1].fixed_quantity, None);
    }

    #[test]
    fn test_empty_semi_product_code() {
        let mut req = request(vec![candidate("A")]);
        req.semi_product_code = "  ".to_string();

        let err = RequestValidator::normalize(&req, &PlannerConfig::default()).unwrap_err();
        assert!(matches!(err, BatchError::UnknownSemiProduct(_)));
    }

    #[test]
    fn test_invalid_control_value() {
        let mut req = request(vec![candidate("A")]);
        req.control_value = Decimal::ZERO;

        let err = RequestValidator::normalize(&req, &PlannerConfig::default()).unwrap_err();
        assert!(matches!(err, BatchError::InvalidControlValue(_)));
    }

    #[test]
    fn test_duplicate_code() {
        let err = RequestValidator::normalize(
            &request(vec![candidate("A"), candidate("A ")]),
            &PlannerConfig::default(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            BatchError::InvalidCandidate {
                code: "A".to_string(),
                reason: "重複的代碼".to_string(),
            }
        );
    }

    #[test]
    fn test_fixed_without_quantity() {
        let mut fixed = candidate("A");
        fixed.is_fixed = true;

        let err = RequestValidator::normalize(&request(vec![fixed]), &PlannerConfig::default())
            .unwrap_err();
        assert!(matches!(err, BatchError::InvalidCandidate { .. }));
    }

    #[test]
    fn test_negative_values_rejected() {
        let negative_fixed = candidate("A").with_fixed_quantity(Decimal::from(-1));
        let negative_mmq = CandidateVariant::new("B".to_string(), Decimal::from(-5), Decimal::ONE);
        let negative_weight = CandidateVariant::new("C".to_string(), Decimal::ZERO, Decimal::from(-1));

        for bad in [negative_fixed, negative_mmq, negative_weight] {
            let result = RequestValidator::normalize(&request(vec![bad]), &PlannerConfig::default());
            assert!(matches!(result, Err(BatchError::InvalidCandidate { .. })));
        }
    }

    #[test]
    fn test_too_many_candidates() {
        let config = PlannerConfig::new().with_max_candidates(1);

        let err = RequestValidator::normalize(&request(vec![candidate("A"), candidate("B")]), &config)
            .unwrap_err();
        assert!(err.is_input_error());
    }
}
