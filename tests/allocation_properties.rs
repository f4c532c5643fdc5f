//! 分配性質測試

use batch_plan::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
struct VariantShape {
    mmq: u32,
    weight: u32,
    fixed: Option<u32>,
}

fn variant_shape() -> impl Strategy<Value = VariantShape> {
    (0u32..300, 1u32..100, prop::option::weighted(0.25, 0u32..200)).prop_map(|(mmq, weight, fixed)| {
        VariantShape { mmq, weight, fixed }
    })
}

fn candidates(shapes: &[VariantShape]) -> Vec<CandidateVariant> {
    shapes
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let candidate = CandidateVariant::new(
                format!("VAR-{idx}"),
                Decimal::from(s.mmq),
                Decimal::from(s.weight),
            );
            match s.fixed {
                Some(quantity) => candidate.with_fixed_quantity(Decimal::from(quantity)),
                None => candidate,
            }
        })
        .collect()
}

/// 固定數量 + 所有未固定物料的下限 <= 產能
fn is_feasible(shapes: &[VariantShape], capacity: u32) -> bool {
    let required: u32 = shapes
        .iter()
        .map(|s| s.fixed.unwrap_or(s.mmq))
        .sum();
    required <= capacity
}

fn allocate(shapes: &[VariantShape], capacity: u32) -> AllocationResult {
    allocate_with(shapes, capacity, &PackagingRounding::none())
}

fn allocate_with(shapes: &[VariantShape], capacity: u32, rounding: &dyn RoundingPolicy) -> AllocationResult {
    ProportionalAllocator::allocate("SEMI", Decimal::from(capacity), &candidates(shapes), rounding)
        .unwrap()
}

fn packaging() -> impl Strategy<Value = PackagingRounding> {
    (
        prop::option::of(1u32..50),
        prop_oneof![
            Just(RoundingMode::Down),
            Just(RoundingMode::Up),
            Just(RoundingMode::Nearest),
        ],
    )
        .prop_map(|(granularity, mode)| PackagingRounding::new(granularity.map(Decimal::from), mode))
}

proptest! {
    #[test]
    fn feasible_allocation_stays_within_capacity(
        shapes in prop::collection::vec(variant_shape(), 1..8),
        capacity in 1u32..5000,
    ) {
        prop_assume!(is_feasible(&shapes, capacity));

        let result = allocate(&shapes, capacity);

        prop_assert!(!result.is_overflow);
        prop_assert!(!result.floors_exhausted);
        prop_assert!(result.total_allocated <= Decimal::from(capacity));
        prop_assert!(result.allocations.iter().all(|a| !a.is_below_minimum));
        for (allocation, s) in result.allocations.iter().zip(&shapes) {
            if s.fixed.is_none() {
                prop_assert!(allocation.allocated_quantity >= Decimal::from(s.mmq));
            }
        }
    }

    #[test]
    fn feasible_allocation_with_packaging_is_not_overflow(
        shapes in prop::collection::vec(variant_shape(), 1..8),
        capacity in 1u32..5000,
        rounding in packaging(),
    ) {
        prop_assume!(is_feasible(&shapes, capacity));

        let result = allocate_with(&shapes, capacity, &rounding);

        let floors: Vec<Decimal> = shapes
            .iter()
            .filter(|s| s.fixed.is_none())
            .map(|s| Decimal::from(s.mmq))
            .collect();
        let limit = Decimal::from(capacity) + rounding.tolerance_for(&floors);

        prop_assert!(!result.is_overflow);
        prop_assert!(result.is_feasible());
        prop_assert!(result.total_allocated <= limit);
        for (allocation, s) in result.allocations.iter().zip(&shapes) {
            prop_assert!(!allocation.is_below_minimum);
            if s.fixed.is_none() {
                prop_assert!(allocation.allocated_quantity >= Decimal::from(s.mmq));
            }
        }
    }

    #[test]
    fn allocation_is_idempotent(
        shapes in prop::collection::vec(variant_shape(), 1..8),
        capacity in 1u32..5000,
    ) {
        prop_assert_eq!(allocate(&shapes, capacity), allocate(&shapes, capacity));
    }

    #[test]
    fn larger_capacity_never_shrinks_allocation(
        shapes in prop::collection::vec(variant_shape(), 1..8),
        capacity in 1u32..5000,
        extra in 0u32..2000,
    ) {
        prop_assume!(is_feasible(&shapes, capacity));

        let smaller = allocate(&shapes, capacity);
        let larger = allocate(&shapes, capacity + extra);
        let tolerance = Decimal::new(1, 20);

        for (a, b) in smaller.allocations.iter().zip(&larger.allocations) {
            prop_assert!(b.allocated_quantity + tolerance >= a.allocated_quantity);
        }
    }

    #[test]
    fn fixed_overflow_zeroes_free_candidates(
        shapes in prop::collection::vec(variant_shape(), 1..8),
        capacity in 1u32..500,
    ) {
        let fixed_sum: u32 = shapes.iter().filter_map(|s| s.fixed).sum();
        prop_assume!(fixed_sum > capacity);

        let result = allocate(&shapes, capacity);

        prop_assert!(result.is_overflow);
        for (allocation, s) in result.allocations.iter().zip(&shapes) {
            match s.fixed {
                Some(quantity) => {
                    prop_assert!(allocation.is_fixed_and_overflowing);
                    prop_assert_eq!(allocation.allocated_quantity, Decimal::from(quantity));
                }
                None => prop_assert_eq!(allocation.allocated_quantity, Decimal::ZERO),
            }
        }
    }
}
