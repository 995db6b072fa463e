use crate::allocation::{AllocationResult, allocate};
use crate::inventory::{Inventory, InventoryError};
use crate::spot::SpotId;
use crate::stats::Statistics;
use crate::time::TimeOfDay;
use crate::vehicle::{LicensePlate, ValidationError, VehicleEntry, VehicleType};
use serde::Serialize;
use tabled::Tabled;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum FacilityError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("vehicle {0} is already parked")]
    AlreadyParked(LicensePlate),
    #[error("vehicle {0} is not parked here")]
    NotParked(String),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// A finished stay, written when a vehicle leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct StayRecord {
    pub license_plate: LicensePlate,
    pub vehicle_type: VehicleType,
    pub spot_id: SpotId,
    pub floor: u32,
    pub arrival_time: TimeOfDay,
    pub expected_departure: TimeOfDay,
    pub exit_time: TimeOfDay,
    pub duration_minutes: u16,
}

impl StayRecord {
    pub fn duration(&self) -> String {
        format!("{}h {:02}m", self.duration_minutes / 60, self.duration_minutes % 60)
    }
}

/// Owner of the inventory. Selecting a spot and occupying it happen inside
/// one `&mut self` call, so two admissions can never race for the same spot.
/// Share across threads behind a `Mutex`.
pub struct Facility {
    inventory: Inventory,
    history: Vec<StayRecord>,
}

impl Facility {
    pub fn new(inventory: Inventory) -> Facility {
        Facility {
            inventory,
            history: Vec::new(),
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn admit(&mut self, entry: &VehicleEntry) -> Result<AllocationResult, FacilityError> {
        entry.validate()?;
        if self.inventory.find_by_plate(&entry.license_plate).is_some() {
            warn!(plate = %entry.license_plate, "rejected duplicate admission");
            return Err(FacilityError::AlreadyParked(entry.license_plate.clone()));
        }

        let result = allocate(self.inventory.spots(), entry)?;
        match result {
            AllocationResult::Success { spot_id, floor } => {
                self.inventory.occupy(spot_id, entry)?;
                info!(
                    plate = %entry.license_plate,
                    vehicle_type = %entry.vehicle_type,
                    spot = spot_id,
                    floor,
                    "vehicle admitted"
                );
            }
            AllocationResult::Failure { reason } => {
                warn!(plate = %entry.license_plate, %reason, "vehicle turned away");
            }
        }
        Ok(result)
    }

    pub fn depart(&mut self, plate: &str, exit_time: TimeOfDay) -> Result<StayRecord, FacilityError> {
        let (spot_id, floor) = self
            .inventory
            .find_by_plate(plate)
            .map(|s| (s.id, s.floor))
            .ok_or_else(|| FacilityError::NotParked(plate.trim().to_string()))?;
        let occupant = self.inventory.release(spot_id)?;

        let record = StayRecord {
            license_plate: occupant.license_plate,
            vehicle_type: occupant.vehicle_type,
            spot_id,
            floor,
            arrival_time: occupant.arrival_time,
            expected_departure: occupant.expected_departure,
            exit_time,
            duration_minutes: exit_time - occupant.arrival_time,
        };
        info!(plate = %record.license_plate, spot = spot_id, duration = %record.duration(), "vehicle left");
        self.history.push(record.clone());
        Ok(record)
    }

    /// Past stays of `plate`, most recent first.
    pub fn history<'a>(&'a self, plate: &'a str) -> impl Iterator<Item = &'a StayRecord> + 'a {
        self.history
            .iter()
            .rev()
            .filter(move |r| r.license_plate.eq_ignore_ascii_case(plate.trim()))
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::collect(self.inventory.spots())
    }
}
