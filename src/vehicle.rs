use crate::time::TimeOfDay;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

pub type LicensePlate = Arc<str>;

/// Rejected request shape. Never produced for a well-formed request,
/// whatever the state of the inventory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("license plate must not be empty")]
    EmptyPlate,
    #[error("stay duration must be a positive number of hours, got {0}")]
    NonPositiveStay(f64),
    #[error("unknown vehicle type '{0}', expected government, private or public")]
    UnknownVehicleType(String),
    #[error("unknown vehicle type code {0}, expected 0 (private), 1 (public) or 2 (government)")]
    UnknownVehicleCode(i64),
    #[error("unknown body kind code {0}, expected 0 (car), 1 (truck) or 2 (motorcycle)")]
    UnknownBodyCode(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Government,
    Private,
    Public,
}

impl VehicleType {
    pub const ALL: [VehicleType; 3] = [VehicleType::Government, VehicleType::Private, VehicleType::Public];

    pub fn code(self) -> u8 {
        match self {
            VehicleType::Private => 0,
            VehicleType::Public => 1,
            VehicleType::Government => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<VehicleType, ValidationError> {
        match code {
            0 => Ok(VehicleType::Private),
            1 => Ok(VehicleType::Public),
            2 => Ok(VehicleType::Government),
            other => Err(ValidationError::UnknownVehicleCode(other)),
        }
    }

    /// Default priority: government 3, public 2, private 1.
    pub fn priority(self) -> u8 {
        match self {
            VehicleType::Government => 3,
            VehicleType::Public => 2,
            VehicleType::Private => 1,
        }
    }

    pub fn default_body(self) -> BodyKind {
        match self {
            VehicleType::Public => BodyKind::Truck,
            VehicleType::Government | VehicleType::Private => BodyKind::Car,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleType::Government => "government",
            VehicleType::Private => "private",
            VehicleType::Public => "public",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for VehicleType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "gov" | "government" => Ok(VehicleType::Government),
            "p" | "pri" | "private" => Ok(VehicleType::Private),
            "u" | "pub" | "public" => Ok(VehicleType::Public),
            _ => Err(ValidationError::UnknownVehicleType(s.to_string())),
        }
    }
}

/// Priority sent alongside an allocation request, clamped to `0..=3`.
pub fn priority_level(vehicle_type: VehicleType, override_level: Option<i64>) -> u8 {
    match override_level {
        Some(level) => level.clamp(0, 3) as u8,
        None => vehicle_type.priority(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Car,
    Truck,
    Motorcycle,
}

impl BodyKind {
    pub fn code(self) -> u8 {
        match self {
            BodyKind::Car => 0,
            BodyKind::Truck => 1,
            BodyKind::Motorcycle => 2,
        }
    }

    pub fn from_code(code: i64) -> Result<BodyKind, ValidationError> {
        match code {
            0 => Ok(BodyKind::Car),
            1 => Ok(BodyKind::Truck),
            2 => Ok(BodyKind::Motorcycle),
            other => Err(ValidationError::UnknownBodyCode(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleEntry {
    pub license_plate: LicensePlate,
    pub vehicle_type: VehicleType,
    pub arrival_time: TimeOfDay,
    pub expected_departure: TimeOfDay,
    /// Hours; only used to bucket private vehicles by floor.
    pub stay_duration: f64,
}

impl VehicleEntry {
    pub fn new(plate: &str, vehicle_type: VehicleType, arrival_time: TimeOfDay, stay_duration: f64) -> VehicleEntry {
        VehicleEntry {
            license_plate: Arc::from(plate.trim()),
            vehicle_type,
            arrival_time,
            expected_departure: arrival_time.add_hours(stay_duration),
            stay_duration,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.license_plate.trim().is_empty() {
            return Err(ValidationError::EmptyPlate);
        }
        if !self.stay_duration.is_finite() || self.stay_duration <= 0.0 {
            return Err(ValidationError::NonPositiveStay(self.stay_duration));
        }
        Ok(())
    }
}
