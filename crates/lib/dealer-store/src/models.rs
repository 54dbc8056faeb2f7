use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Dealership customer.
///
/// Fields beyond `id`, `name`, and `phone` are kept in `extra` so a customer
/// lookup can hand back the record exactly as the source stores it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Sales or lease contract for a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    pub id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    pub contract_date: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub amount: Value,
    pub status: String,
}

/// Showroom or service visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visit {
    pub id: String,
    pub customer_id: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub visit_date: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_service_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Visit {
    /// Date the visit is due: the next service date when present, otherwise
    /// the visit date. Empty strings count as absent.
    #[must_use]
    pub fn scheduled_date(&self) -> Option<&str> {
        self.next_service_date
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| Some(self.visit_date.as_str()).filter(|value| !value.is_empty()))
    }
}

/// Vehicle in dealership inventory.
///
/// `year` and `price` are display values and pass through in whatever JSON
/// shape the source uses (`2024`, `"2025年モデル"`, `3200000.0`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: String,
    pub model: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub color: String,
    pub year: Value,
    pub price: Value,
    pub status: String,
}
