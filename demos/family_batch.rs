//! 半成品批次規劃完整範例
//!
//! 展示從主資料讀取、重算、產生草稿到提交製令的流程

use batch_plan::*;
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    batch_plan::logging::init();

    println!("===== Semi-product Batch Planning Example =====\n");

    // 步驟 1: 建立主資料
    println!("[1] Load Catalog");
    let mut catalog = InMemoryCatalog::new();
    catalog.insert(
        SemiProduct::new("SEMI-SERUM".to_string(), "Serum base".to_string())
            .with_minimal_manufacturing_quantity(Decimal::from(2000))
            .with_packaging_granularity(Decimal::from(10)),
        vec![
            CandidateVariant::new("SERUM-15".to_string(), Decimal::from(300), Decimal::new(2, 1))
                .with_display_name("Serum 15 ml".to_string())
                .with_shelf_life_days(548),
            CandidateVariant::new("SERUM-30".to_string(), Decimal::from(500), Decimal::new(5, 1))
                .with_display_name("Serum 30 ml".to_string())
                .with_shelf_life_days(548),
            CandidateVariant::new("SERUM-50".to_string(), Decimal::from(1000), Decimal::new(3, 1))
                .with_display_name("Serum 50 ml".to_string())
                .with_shelf_life_days(730),
        ],
    );
    println!("    SEMI-SERUM: MMQ 2000, 3 variants\n");

    let planner = BatchPlanner::new(catalog, PlannerConfig::default())?;

    // 步驟 2: 重算（2 倍最小生產量，使用者固定 SERUM-15）
    println!("[2] Recompute (MMQ x 2, SERUM-15 fixed at 600)");
    let request = AllocationRequest::from_catalog(
        planner.catalog(),
        "SEMI-SERUM",
        ControlMode::MmqMultiplier,
        Decimal::from(2),
        &[FixedOverride::new("SERUM-15".to_string(), Decimal::from(600))],
    )?;
    let manufacture_date = NaiveDate::from_ymd_opt(2025, 1, 10)
        .ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    let (outcome, mut drafts) = planner.recompute_with_drafts(&request, manufacture_date)?;

    println!(
        "    Capacity: {}, allocated: {} ({}%)",
        outcome.result.capacity, outcome.result.total_allocated, outcome.result.overflow_percentage
    );
    for allocation in &outcome.result.allocations {
        println!(
            "    - {:<10} {:>8} {}{}",
            allocation.code,
            allocation.allocated_quantity,
            if allocation.is_fixed { "[fixed]" } else { "" },
            if allocation.is_below_minimum { "[below MMQ]" } else { "" }
        );
    }
    for warning in &outcome.warnings {
        println!("    ! {:?} {}: {}", warning.severity, warning.code, warning.message);
    }

    // 步驟 3: 使用者修改批號後提交
    println!("\n[3] Edit Drafts & Commit");
    if let Some(first) = drafts.first_mut() {
        first.set_lot_number(format!("{}-A", first.lot_number));
    }
    for draft in &drafts {
        println!(
            "    - {} qty {} lot {} exp {}",
            draft.variant_code, draft.planned_quantity, draft.lot_number, draft.expiration_date
        );
    }

    let sink = InMemoryOrderSink::new();
    let receipt = planner.commit("SEMI-SERUM", drafts, &sink)?;
    println!(
        "    Order {} created: {} lines, total {}",
        receipt.order_id, receipt.line_count, receipt.total_quantity
    );

    Ok(())
}
