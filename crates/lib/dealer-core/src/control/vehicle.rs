use dealer_store::Vehicle;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DealerControlPlane;
use crate::matcher::matches_color;

/// Inventory row returned by the vehicle search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VehicleSummary {
    pub id: String,
    pub model: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub color: String,
    pub year: Value,
    pub price: Value,
    pub status: String,
}

impl From<Vehicle> for VehicleSummary {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            model: vehicle.model,
            vehicle_type: vehicle.vehicle_type,
            color: vehicle.color,
            year: vehicle.year,
            price: vehicle.price,
            status: vehicle.status,
        }
    }
}

impl DealerControlPlane {
    /// Searches inventory by exact body type and an optional color filter.
    #[must_use]
    pub fn search_vehicles(&self, vehicle_type: &str, color: Option<&str>) -> Vec<VehicleSummary> {
        self.store
            .vehicles()
            .into_iter()
            .filter(|vehicle| vehicle.vehicle_type == vehicle_type)
            .filter(|vehicle| matches_color(&vehicle.color, color))
            .map(VehicleSummary::from)
            .collect()
    }
}
