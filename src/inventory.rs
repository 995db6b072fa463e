use crate::spot::{Occupant, ParkingSpot, SpotId};
use crate::vehicle::VehicleEntry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("a facility needs at least one floor and one spot per floor")]
    EmptyLayout,
    #[error("spot id must be positive")]
    ZeroSpotId,
    #[error("spot {0} is listed more than once")]
    DuplicateSpot(SpotId),
    #[error("spot {0} does not exist")]
    UnknownSpot(SpotId),
    #[error("spot {0} is already occupied")]
    SpotTaken(SpotId),
    #[error("spot {0} is not occupied")]
    SpotVacant(SpotId),
    #[error("cannot read scenario: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every spot of the facility, in layout order.
#[derive(Debug, Clone)]
pub struct Inventory {
    spots: Vec<ParkingSpot>,
    spots_index: HashMap<SpotId, usize>,
}

#[derive(Serialize, Deserialize)]
struct Scenario {
    spots: Vec<ParkingSpot>,
}

impl Inventory {
    /// Floor-major layout: floor 0 holds ids `1..=spots_per_floor`, and so on.
    pub fn with_layout(floors: u32, spots_per_floor: u32) -> Result<Inventory, InventoryError> {
        if floors == 0 || spots_per_floor == 0 {
            return Err(InventoryError::EmptyLayout);
        }
        let spots = (0..floors)
            .flat_map(|floor| {
                (0..spots_per_floor).map(move |n| ParkingSpot::vacant(floor * spots_per_floor + n + 1, floor))
            })
            .collect();
        Inventory::from_spots(spots)
    }

    pub fn from_spots(spots: Vec<ParkingSpot>) -> Result<Inventory, InventoryError> {
        if spots.is_empty() {
            return Err(InventoryError::EmptyLayout);
        }
        let mut spots_index = HashMap::with_capacity(spots.len());
        for (i, spot) in spots.iter().enumerate() {
            if spot.id == 0 {
                return Err(InventoryError::ZeroSpotId);
            }
            if spots_index.insert(spot.id, i).is_some() {
                return Err(InventoryError::DuplicateSpot(spot.id));
            }
        }
        Ok(Inventory { spots, spots_index })
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Inventory, InventoryError> {
        let data = std::fs::read_to_string(path)?;
        let raw: Scenario = serde_json::from_str(&data)?;
        Inventory::from_spots(raw.spots)
    }

    pub fn spots(&self) -> &[ParkingSpot] {
        &self.spots
    }

    pub fn get(&self, id: SpotId) -> Option<&ParkingSpot> {
        self.spots_index.get(&id).map(|i| &self.spots[*i])
    }

    pub fn available(&self) -> impl Iterator<Item = &ParkingSpot> {
        self.spots.iter().filter(|s| !s.is_occupied())
    }

    /// Distinct floor numbers, ascending.
    pub fn floors(&self) -> Vec<u32> {
        let mut floors = self.spots.iter().map(|s| s.floor).collect::<Vec<_>>();
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    pub fn find_by_plate(&self, plate: &str) -> Option<&ParkingSpot> {
        self.spots.iter().find(|s| {
            s.occupant
                .as_ref()
                .is_some_and(|o| o.license_plate.eq_ignore_ascii_case(plate.trim()))
        })
    }

    /// Marks `id` as taken by `entry`. Fails if someone got there first.
    pub fn occupy(&mut self, id: SpotId, entry: &VehicleEntry) -> Result<(), InventoryError> {
        let idx = *self.spots_index.get(&id).ok_or(InventoryError::UnknownSpot(id))?;
        let spot = &mut self.spots[idx];
        if spot.is_occupied() {
            return Err(InventoryError::SpotTaken(id));
        }
        spot.occupant = Some(Occupant::from(entry));
        Ok(())
    }

    pub fn release(&mut self, id: SpotId) -> Result<Occupant, InventoryError> {
        let idx = *self.spots_index.get(&id).ok_or(InventoryError::UnknownSpot(id))?;
        self.spots[idx].occupant.take().ok_or(InventoryError::SpotVacant(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;
    use crate::vehicle::VehicleType;

    fn entry(plate: &str) -> VehicleEntry {
        VehicleEntry::new(plate, VehicleType::Private, TimeOfDay::new(8, 15).unwrap(), 2.0)
    }

    #[test]
    fn test_layout_is_floor_major() {
        let inventory = Inventory::with_layout(4, 10).unwrap();
        assert_eq!(inventory.spots().len(), 40);
        assert_eq!(inventory.spots()[0].id, 1);
        assert_eq!(inventory.get(10).map(|s| s.floor), Some(0));
        assert_eq!(inventory.get(11).map(|s| s.floor), Some(1));
        assert_eq!(inventory.get(40).map(|s| s.floor), Some(3));
        assert!(inventory.get(41).is_none());
        assert_eq!(inventory.floors(), vec![0, 1, 2, 3]);
        assert_eq!(inventory.available().count(), 40);
    }

    #[test]
    fn test_rejects_bad_layouts() {
        assert!(matches!(Inventory::with_layout(0, 10), Err(InventoryError::EmptyLayout)));
        assert!(matches!(Inventory::from_spots(vec![]), Err(InventoryError::EmptyLayout)));
        assert!(matches!(
            Inventory::from_spots(vec![ParkingSpot::vacant(0, 0)]),
            Err(InventoryError::ZeroSpotId)
        ));
        assert!(matches!(
            Inventory::from_spots(vec![ParkingSpot::vacant(3, 0), ParkingSpot::vacant(3, 1)]),
            Err(InventoryError::DuplicateSpot(3))
        ));
    }

    #[test]
    fn test_occupy_and_release() {
        let mut inventory = Inventory::with_layout(2, 2).unwrap();
        inventory.occupy(3, &entry("WA 777")).unwrap();

        let spot = inventory.find_by_plate("wa 777").unwrap();
        assert_eq!(spot.id, 3);
        assert_eq!(inventory.available().count(), 3);

        assert!(matches!(inventory.occupy(3, &entry("KR 1")), Err(InventoryError::SpotTaken(3))));
        assert!(matches!(inventory.occupy(9, &entry("KR 1")), Err(InventoryError::UnknownSpot(9))));

        let occupant = inventory.release(3).unwrap();
        assert_eq!(&*occupant.license_plate, "WA 777");
        assert_eq!(occupant.expected_departure, TimeOfDay::new(10, 15).unwrap());
        assert!(matches!(inventory.release(3), Err(InventoryError::SpotVacant(3))));
        assert!(inventory.find_by_plate("WA 777").is_none());
    }

    #[test]
    fn test_scenario_json() {
        let raw = r#"{
            "spots": [
                {"id": 1, "floor": 0},
                {"id": 2, "floor": 0, "occupant": {
                    "vehicle_type": "government",
                    "license_plate": "GOV 1",
                    "arrival_time": "09:00",
                    "expected_departure": "17:00"
                }},
                {"id": 3, "floor": 1, "occupant": null}
            ]
        }"#;
        let scenario: Scenario = serde_json::from_str(raw).unwrap();
        let inventory = Inventory::from_spots(scenario.spots).unwrap();

        assert_eq!(inventory.available().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);
        let taken = inventory.get(2).and_then(|s| s.occupant.as_ref()).unwrap();
        assert_eq!(taken.vehicle_type, VehicleType::Government);
        assert_eq!(taken.arrival_time, TimeOfDay::new(9, 0).unwrap());

        let dumped = serde_json::to_string(&Scenario { spots: inventory.spots().to_vec() }).unwrap();
        let reloaded: Scenario = serde_json::from_str(&dumped).unwrap();
        assert_eq!(reloaded.spots, inventory.spots());
    }

    #[test]
    fn test_malformed_time_in_scenario() {
        let raw = r#"{"spots": [{"id": 1, "floor": 0, "occupant": {
            "vehicle_type": "private", "license_plate": "X",
            "arrival_time": "9am", "expected_departure": "17:00"}}]}"#;
        assert!(serde_json::from_str::<Scenario>(raw).is_err());
    }

    #[test]
    fn test_load_demo_scenario() {
        let inventory = Inventory::load_from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/data/demo.json")).unwrap();
        assert_eq!(inventory.spots().len(), 40);
        assert_eq!(inventory.floors(), vec![0, 1, 2, 3]);
        assert_eq!(inventory.available().count(), 30);
        assert_eq!(inventory.find_by_plate("BUS 0007").map(|s| s.id), Some(40));
    }

    #[test]
    fn test_missing_scenario_file() {
        assert!(matches!(
            Inventory::load_from_file("/nonexistent/garage.json"),
            Err(InventoryError::Io(_))
        ));
    }
}
