use std::fmt;

pub const COLLECTION_CUSTOMERS: &str = "customers";
pub const COLLECTION_CONTRACTS: &str = "contracts";
pub const COLLECTION_VISITS: &str = "visits";
pub const COLLECTION_VEHICLES: &str = "vehicles";

pub const VEHICLE_TYPE_SUV: &str = "SUV";
pub const VEHICLE_TYPE_SEDAN: &str = "セダン";
pub const VEHICLE_TYPE_KEI: &str = "軽自動車";
pub const VEHICLE_TYPE_MINIVAN: &str = "ミニバン";

/// Vehicle body types callers are expected to pass to the vehicle search.
pub const VEHICLE_TYPES: [&str; 4] = [
    VEHICLE_TYPE_SUV,
    VEHICLE_TYPE_SEDAN,
    VEHICLE_TYPE_KEI,
    VEHICLE_TYPE_MINIVAN,
];

/// The four named record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Customers,
    Contracts,
    Visits,
    Vehicles,
}

impl Collection {
    pub const ALL: [Self; 4] = [
        Self::Customers,
        Self::Contracts,
        Self::Visits,
        Self::Vehicles,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customers => COLLECTION_CUSTOMERS,
            Self::Contracts => COLLECTION_CONTRACTS,
            Self::Visits => COLLECTION_VISITS,
            Self::Vehicles => COLLECTION_VEHICLES,
        }
    }

    /// File name used by file-backed sources, e.g. `customers.json`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
