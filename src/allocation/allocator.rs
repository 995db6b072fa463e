use crate::spot::{ParkingSpot, SpotId};
use crate::vehicle::{ValidationError, VehicleEntry, VehicleType};
use serde::Serialize;
use std::cmp::Reverse;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureReason {
    NoCapacity,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoCapacity => write!(f, "no parking spots available"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllocationResult {
    Success { spot_id: SpotId, floor: u32 },
    Failure { reason: FailureReason },
}

impl AllocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AllocationResult::Success { .. })
    }

    pub fn spot_id(&self) -> Option<SpotId> {
        match self {
            AllocationResult::Success { spot_id, .. } => Some(*spot_id),
            AllocationResult::Failure { .. } => None,
        }
    }
}

/// Placement rule derived from the vehicle type and, for private vehicles,
/// the expected stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Government: lowest floor first.
    LowestFloor,
    /// Public service: highest id, modelled as nearest the exit.
    NearestExit,
    /// Private long stay: floors `UPPER_FLOOR_MIN` and above.
    UpperFloors,
    /// Private short stay: floors up to `LOWER_FLOOR_MAX`.
    LowerFloors,
}

impl Policy {
    pub const LONG_STAY_HOURS: f64 = 4.0;
    pub const UPPER_FLOOR_MIN: u32 = 2;
    pub const LOWER_FLOOR_MAX: u32 = 1;

    pub fn for_request(request: &VehicleEntry) -> Policy {
        match request.vehicle_type {
            VehicleType::Government => Policy::LowestFloor,
            VehicleType::Public => Policy::NearestExit,
            VehicleType::Private if request.stay_duration > Self::LONG_STAY_HOURS => Policy::UpperFloors,
            VehicleType::Private => Policy::LowerFloors,
        }
    }

    fn prefers(self, spot: &ParkingSpot) -> bool {
        match self {
            Policy::LowestFloor | Policy::NearestExit => true,
            Policy::UpperFloors => spot.floor >= Self::UPPER_FLOOR_MIN,
            Policy::LowerFloors => spot.floor <= Self::LOWER_FLOOR_MAX,
        }
    }

    fn pick<'a>(self, candidates: &[&'a ParkingSpot]) -> Option<&'a ParkingSpot> {
        let candidates = candidates.iter().copied();
        match self {
            Policy::LowestFloor => candidates.min_by_key(|s| (s.floor, s.id)),
            Policy::NearestExit => candidates.min_by_key(|s| Reverse(s.id)),
            Policy::UpperFloors | Policy::LowerFloors => candidates.min_by_key(|s| s.id),
        }
    }
}

/// Chooses a free spot for `request` without touching `spots`.
///
/// A malformed request is rejected before the inventory is looked at. When
/// nothing is free the result is `Failure { reason: NoCapacity }`. A policy
/// filter that leaves no candidate falls back to every free spot, so a
/// request only fails for lack of capacity.
pub fn allocate(spots: &[ParkingSpot], request: &VehicleEntry) -> Result<AllocationResult, ValidationError> {
    request.validate()?;

    let available = spots.iter().filter(|s| !s.is_occupied()).collect::<Vec<_>>();
    if available.is_empty() {
        debug!(plate = %request.license_plate, "no free spot left");
        return Ok(AllocationResult::Failure { reason: FailureReason::NoCapacity });
    }

    let policy = Policy::for_request(request);
    let preferred = available.iter().copied().filter(|s| policy.prefers(s)).collect::<Vec<_>>();
    let candidates = if preferred.is_empty() {
        debug!(?policy, "preferred floors full, falling back to any free spot");
        &available
    } else {
        &preferred
    };

    Ok(match policy.pick(candidates) {
        Some(spot) => {
            debug!(plate = %request.license_plate, ?policy, spot = spot.id, floor = spot.floor, "spot selected");
            AllocationResult::Success { spot_id: spot.id, floor: spot.floor }
        }
        None => AllocationResult::Failure { reason: FailureReason::NoCapacity },
    })
}
