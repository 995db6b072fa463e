//! JSON shapes exchanged with dashboard clients.
//!
//! Vehicle types travel as `vehicle_plate_type` codes (0 private, 1 public,
//! 2 government) and body kinds as `vehicle_type` codes (0 car, 1 truck,
//! 2 motorcycle). A full facility answers `success: false`, never an error.

use crate::allocation::AllocationResult;
use crate::facility::StayRecord;
use crate::spot::{ParkingSpot, SpotId};
use crate::time::TimeOfDay;
use crate::vehicle::{BodyKind, LicensePlate, ValidationError, VehicleEntry, VehicleType, priority_level};
use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Tag reported for allocations made by the vehicle-type policy.
pub const ALGORITHM_TAG: &str = "ai";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub vehicle_plate_num: String,
    pub vehicle_plate_type: i64,
    pub vehicle_type: i64,
    pub arrival_time: DateTime<Utc>,
    pub departure_time: DateTime<Utc>,
    #[serde(default)]
    pub priority_level: Option<i64>,
}

fn time_of_day(at: &DateTime<Utc>) -> TimeOfDay {
    TimeOfDay::from_minutes(at.hour() as u64 * 60 + at.minute() as u64)
}

impl AllocateRequest {
    /// Encodes `entry` as a dashboard request arriving at `arrival`.
    /// Stays past the representable range end at `DateTime::MAX_UTC`; a
    /// non-finite stay departs at `arrival` and is rejected on decode.
    pub fn from_entry(entry: &VehicleEntry, arrival: DateTime<Utc>) -> AllocateRequest {
        let departure = if entry.stay_duration.is_finite() {
            TimeDelta::try_minutes((entry.stay_duration * 60.0).round() as i64)
                .and_then(|stay| arrival.checked_add_signed(stay))
                .unwrap_or(if entry.stay_duration > 0.0 { DateTime::<Utc>::MAX_UTC } else { arrival })
        } else {
            arrival
        };
        AllocateRequest {
            vehicle_plate_num: entry.license_plate.to_string(),
            vehicle_plate_type: entry.vehicle_type.code() as i64,
            vehicle_type: entry.vehicle_type.default_body().code() as i64,
            arrival_time: arrival,
            departure_time: departure,
            priority_level: Some(priority_level(entry.vehicle_type, None) as i64),
        }
    }

    pub fn body_kind(&self) -> Result<BodyKind, ValidationError> {
        BodyKind::from_code(self.vehicle_type)
    }

    pub fn priority(&self) -> Result<u8, ValidationError> {
        let vehicle_type = VehicleType::from_code(self.vehicle_plate_type)?;
        Ok(priority_level(vehicle_type, self.priority_level))
    }

    /// Decodes into an allocator request; the stay is the span between the
    /// two instants, in hours.
    pub fn into_entry(&self) -> Result<VehicleEntry, ValidationError> {
        let vehicle_type = VehicleType::from_code(self.vehicle_plate_type)?;
        self.body_kind()?;
        let minutes = (self.departure_time - self.arrival_time).num_minutes();
        let stay_duration = minutes as f64 / 60.0;

        let entry = VehicleEntry {
            license_plate: LicensePlate::from(self.vehicle_plate_num.trim()),
            vehicle_type,
            arrival_time: time_of_day(&self.arrival_time),
            expected_departure: time_of_day(&self.departure_time),
            stay_duration,
        };
        entry.validate()?;
        Ok(entry)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_id: Option<SpotId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<u32>,
    pub message: String,
    pub algorithm_used: String,
}

impl AllocateResponse {
    pub fn from_result(plate: &str, result: &AllocationResult) -> AllocateResponse {
        match *result {
            AllocationResult::Success { spot_id, floor } => AllocateResponse {
                success: true,
                spot_id: Some(spot_id),
                floor: Some(floor),
                message: format!(
                    "Vehicle {} has been allocated to Floor {}, Spot {}.",
                    plate,
                    floor + 1,
                    spot_id
                ),
                algorithm_used: ALGORITHM_TAG.to_string(),
            },
            AllocationResult::Failure { .. } => AllocateResponse::rejected("No parking spots available. Please try again later."),
        }
    }

    pub fn rejected(message: impl Into<String>) -> AllocateResponse {
        AllocateResponse {
            success: false,
            spot_id: None,
            floor: None,
            message: message.into(),
            algorithm_used: ALGORITHM_TAG.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSpot {
    pub id: SpotId,
    pub floor: u32,
    pub status: SpotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_plate_num: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_plate_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<TimeOfDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocated_by: Option<String>,
}

impl From<&ParkingSpot> for ApiSpot {
    fn from(spot: &ParkingSpot) -> Self {
        let occupant = spot.occupant.as_ref();
        ApiSpot {
            id: spot.id,
            floor: spot.floor,
            status: if spot.is_occupied() { SpotStatus::Occupied } else { SpotStatus::Available },
            vehicle_plate_num: occupant.map(|o| o.license_plate.to_string()),
            vehicle_plate_type: occupant.map(|o| o.vehicle_type.code()),
            vehicle_type: occupant.map(|o| o.vehicle_type.default_body().code()),
            arrival_time: occupant.map(|o| o.arrival_time),
            departure_time: occupant.map(|o| o.expected_departure),
            allocated_by: occupant.map(|_| ALGORITHM_TAG.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub spots: Vec<ApiSpot>,
    pub timestamp: DateTime<Utc>,
}

impl StatusResponse {
    pub fn new(spots: &[ParkingSpot], timestamp: DateTime<Utc>) -> StatusResponse {
        StatusResponse {
            spots: spots.iter().map(ApiSpot::from).collect(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitRequest {
    pub vehicle_plate_num: String,
    pub exit_time: DateTime<Utc>,
}

impl ExitRequest {
    pub fn exit_time_of_day(&self) -> TimeOfDay {
        time_of_day(&self.exit_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitResponse {
    pub success: bool,
    pub vehicle_plate_num: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parking_duration: Option<String>,
    pub message: String,
}

impl ExitResponse {
    pub fn from_record(record: &StayRecord) -> ExitResponse {
        ExitResponse {
            success: true,
            vehicle_plate_num: record.license_plate.to_string(),
            parking_duration: Some(record.duration()),
            message: format!(
                "Vehicle {} left Floor {}, Spot {}.",
                record.license_plate,
                record.floor + 1,
                record.spot_id
            ),
        }
    }

    pub fn not_parked(plate: &str) -> ExitResponse {
        ExitResponse {
            success: false,
            vehicle_plate_num: plate.to_string(),
            parking_duration: None,
            message: format!("No active allocation found for {}.", plate),
        }
    }
}
