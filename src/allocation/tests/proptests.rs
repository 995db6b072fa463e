use crate::allocation::allocator::{AllocationResult, FailureReason, allocate};
use crate::allocation::tests::utils::{arb_inventory, arb_vehicle_type, request};
use crate::vehicle::VehicleType::{Government, Private, Public};
use proptest::prelude::*;
use proptest::proptest;

proptest! {
    #[test]
    fn test_government_gets_minimal_floor(spots in arb_inventory()) {
        let free = spots.iter().filter(|s| !s.is_occupied()).collect::<Vec<_>>();
        let result = allocate(&spots, &request(Government, 1.0)).unwrap();

        match result {
            AllocationResult::Success { spot_id, floor } => {
                for other in &free {
                    prop_assert!(floor <= other.floor, "spot {} on floor {} beats floor {}", other.id, other.floor, floor);
                    if other.floor == floor {
                        prop_assert!(spot_id <= other.id);
                    }
                }
            }
            AllocationResult::Failure { .. } => prop_assert!(free.is_empty()),
        }
    }

    #[test]
    fn test_public_gets_maximal_id(spots in arb_inventory()) {
        let max_free = spots.iter().filter(|s| !s.is_occupied()).map(|s| s.id).max();
        let result = allocate(&spots, &request(Public, 3.0)).unwrap();

        prop_assert_eq!(result.spot_id(), max_free);
    }

    #[test]
    fn test_private_long_stay_respects_upper_floors(spots in arb_inventory(), hours in 4.01..48.0f64) {
        let upper_free = spots.iter().any(|s| !s.is_occupied() && s.floor >= 2);
        let any_free = spots.iter().any(|s| !s.is_occupied());
        let result = allocate(&spots, &request(Private, hours)).unwrap();

        match result {
            AllocationResult::Success { spot_id, floor } => {
                let chosen = spots.iter().find(|s| s.id == spot_id).unwrap();
                prop_assert!(!chosen.is_occupied());
                if upper_free {
                    prop_assert!(floor >= 2);
                }
            }
            AllocationResult::Failure { .. } => prop_assert!(!any_free),
        }
    }

    #[test]
    fn test_private_short_stay_respects_lower_floors(spots in arb_inventory(), hours in 0.1..=4.0f64) {
        let lower_free = spots.iter().any(|s| !s.is_occupied() && s.floor <= 1);
        let result = allocate(&spots, &request(Private, hours)).unwrap();

        if let AllocationResult::Success { floor, .. } = result {
            if lower_free {
                prop_assert!(floor <= 1);
            }
        }
    }

    #[test]
    fn test_fails_only_without_capacity(spots in arb_inventory(), vehicle_type in arb_vehicle_type(), hours in 0.5..24.0f64) {
        let any_free = spots.iter().any(|s| !s.is_occupied());
        let result = allocate(&spots, &request(vehicle_type, hours)).unwrap();

        if any_free {
            prop_assert!(result.is_success());
        } else {
            prop_assert_eq!(result, AllocationResult::Failure { reason: FailureReason::NoCapacity });
        }
    }

    #[test]
    fn test_allocation_is_repeatable(spots in arb_inventory(), vehicle_type in arb_vehicle_type(), hours in 0.5..24.0f64) {
        let req = request(vehicle_type, hours);
        let first = allocate(&spots, &req).unwrap();
        let second = allocate(&spots, &req).unwrap();

        prop_assert_eq!(first, second);
    }
}
