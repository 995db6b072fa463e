use crate::spot::{Occupant, ParkingSpot, SpotId};
use crate::time::TimeOfDay;
use crate::vehicle::{VehicleEntry, VehicleType};
use proptest::collection::vec;
use proptest::prelude::{Strategy, any};
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn layout(floors: u32, per_floor: u32) -> Vec<ParkingSpot> {
    (0..floors)
        .flat_map(|floor| (0..per_floor).map(move |n| ParkingSpot::vacant(floor * per_floor + n + 1, floor)))
        .collect()
}

pub fn occupant(plate: &str) -> Occupant {
    Occupant {
        vehicle_type: VehicleType::Private,
        license_plate: Arc::from(plate),
        arrival_time: TimeOfDay::new(9, 0).unwrap(),
        expected_departure: TimeOfDay::new(17, 0).unwrap(),
    }
}

pub fn occupy(spots: &mut [ParkingSpot], ids: &[SpotId]) {
    spots
        .iter_mut()
        .filter(|s| ids.contains(&s.id))
        .for_each(|s| s.occupant = Some(occupant(&format!("OCC{}", s.id))));
}

pub fn occupy_all_except(spots: &mut [ParkingSpot], free: &[SpotId]) {
    spots
        .iter_mut()
        .filter(|s| !free.contains(&s.id))
        .for_each(|s| s.occupant = Some(occupant(&format!("OCC{}", s.id))));
}

pub fn request(vehicle_type: VehicleType, stay_duration: f64) -> VehicleEntry {
    VehicleEntry::new("TEST 001", vehicle_type, TimeOfDay::new(9, 0).unwrap(), stay_duration)
}

pub fn arb_vehicle_type() -> impl Strategy<Value = VehicleType> {
    prop_oneof![
        Just(VehicleType::Government),
        Just(VehicleType::Private),
        Just(VehicleType::Public),
    ]
}

/// Floor-major inventory of 1-5 floors with a random occupancy mask.
pub fn arb_inventory() -> impl Strategy<Value = Vec<ParkingSpot>> {
    (1..=5u32, 1..=8u32)
        .prop_flat_map(|(floors, per_floor)| vec(any::<bool>(), (floors * per_floor) as usize).prop_map(move |mask| (floors, per_floor, mask)))
        .prop_map(|(floors, per_floor, mask)| {
            let mut spots = layout(floors, per_floor);
            spots
                .iter_mut()
                .zip(mask)
                .filter(|(_, taken)| *taken)
                .for_each(|(s, _)| s.occupant = Some(occupant(&format!("OCC{}", s.id))));
            spots
        })
}
