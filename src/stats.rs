use crate::spot::ParkingSpot;
use crate::vehicle::VehicleType;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub government: usize,
    pub private: usize,
    pub public: usize,
}

impl TypeCounts {
    fn bump(&mut self, vehicle_type: VehicleType) {
        match vehicle_type {
            VehicleType::Government => self.government += 1,
            VehicleType::Private => self.private += 1,
            VehicleType::Public => self.public += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorStats {
    pub floor: u32,
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub occupancy_rate: f64,
}

impl FloorStats {
    pub fn row(&self) -> FloorRow {
        FloorRow {
            floor: self.floor + 1,
            total: self.total,
            occupied: self.occupied,
            available: self.available,
            occupancy: format!("{:.1}%", self.occupancy_rate),
        }
    }
}

#[derive(Tabled)]
pub struct FloorRow {
    pub floor: u32,
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub occupancy: String,
}

fn rate(occupied: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        occupied as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_spots: usize,
    pub occupied_spots: usize,
    pub available_spots: usize,
    pub occupancy_rate: f64,
    pub vehicle_types: TypeCounts,
    pub floor_statistics: Vec<FloorStats>,
}

impl Statistics {
    pub fn collect(spots: &[ParkingSpot]) -> Statistics {
        let mut vehicle_types = TypeCounts::default();
        // floor -> (total, occupied)
        let mut floors = BTreeMap::<u32, (usize, usize)>::new();

        for spot in spots {
            let entry = floors.entry(spot.floor).or_default();
            entry.0 += 1;
            if let Some(occupant) = &spot.occupant {
                entry.1 += 1;
                vehicle_types.bump(occupant.vehicle_type);
            }
        }

        let occupied_spots = floors.values().map(|(_, occupied)| occupied).sum::<usize>();
        let floor_statistics = floors
            .into_iter()
            .map(|(floor, (total, occupied))| FloorStats {
                floor,
                total,
                occupied,
                available: total - occupied,
                occupancy_rate: rate(occupied, total),
            })
            .collect();

        Statistics {
            total_spots: spots.len(),
            occupied_spots,
            available_spots: spots.len() - occupied_spots,
            occupancy_rate: rate(occupied_spots, spots.len()),
            vehicle_types,
            floor_statistics,
        }
    }
}
