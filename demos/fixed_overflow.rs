//! 固定數量超出產能範例

use batch_plan::*;
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    batch_plan::logging::init();

    println!("=== 固定數量超出產能範例 ===\n");

    let candidates = vec![
        CandidateVariant::new("A".to_string(), Decimal::ZERO, Decimal::ONE)
            .with_fixed_quantity(Decimal::from(200)),
        CandidateVariant::new("B".to_string(), Decimal::ZERO, Decimal::ONE)
            .with_fixed_quantity(Decimal::from(150)),
        CandidateVariant::new("C".to_string(), Decimal::from(50), Decimal::ONE),
    ];

    let result = ProportionalAllocator::allocate(
        "SEMI-001",
        Decimal::from(300),
        &candidates,
        &PackagingRounding::none(),
    )?;

    println!(
        "產能 {}，固定合計 {}，超量: {}（{}%）",
        result.capacity, result.fixed_sum, result.is_overflow, result.overflow_percentage
    );
    for allocation in &result.allocations {
        println!(
            "  - {}: {}{}",
            allocation.code,
            allocation.allocated_quantity,
            if allocation.is_fixed_and_overflowing { " ⚠" } else { "" }
        );
    }

    Ok(())
}
