use crate::time::TimeOfDay;
use crate::vehicle::{LicensePlate, VehicleEntry, VehicleType};
use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

pub type SpotId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupant {
    pub vehicle_type: VehicleType,
    pub license_plate: LicensePlate,
    pub arrival_time: TimeOfDay,
    pub expected_departure: TimeOfDay,
}

impl From<&VehicleEntry> for Occupant {
    fn from(entry: &VehicleEntry) -> Self {
        Occupant {
            vehicle_type: entry.vehicle_type,
            license_plate: entry.license_plate.clone(),
            arrival_time: entry.arrival_time,
            expected_departure: entry.expected_departure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSpot {
    pub id: SpotId,
    pub floor: u32,
    #[serde(default)]
    pub occupant: Option<Occupant>,
}

impl ParkingSpot {
    pub fn vacant(id: SpotId, floor: u32) -> ParkingSpot {
        ParkingSpot { id, floor, occupant: None }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    pub fn row(&self) -> SpotRow {
        let occupant = self.occupant.as_ref();
        SpotRow {
            id: self.id,
            // floors are shown one-based
            floor: self.floor + 1,
            status: if self.is_occupied() { "occupied" } else { "free" },
            vehicle_type: occupant.map(|o| o.vehicle_type.to_string()).unwrap_or_default(),
            plate: occupant.map(|o| o.license_plate.to_string()).unwrap_or_default(),
            arrival: occupant.map(|o| o.arrival_time.to_string()).unwrap_or_default(),
            departure: occupant.map(|o| o.expected_departure.to_string()).unwrap_or_default(),
        }
    }
}

impl fmt::Display for ParkingSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Floor {}, Spot {}", self.floor + 1, self.id)
    }
}

#[derive(Tabled)]
pub struct SpotRow {
    pub id: SpotId,
    pub floor: u32,
    pub status: &'static str,
    #[tabled(rename = "type")]
    pub vehicle_type: String,
    pub plate: String,
    pub arrival: String,
    pub departure: String,
}
