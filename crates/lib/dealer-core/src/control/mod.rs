//! Read-only query control plane.
//!
//! Each query reads a fresh snapshot from the data store, applies the matcher
//! rules, and projects the matching records into the tool output shapes.

use crate::store::DataStore;

pub mod contract;
pub mod customer;
pub mod vehicle;
pub mod visit;

pub use contract::ContractSummary;
pub use customer::{CustomerLookup, CustomerSummary, LookupError};
pub use vehicle::VehicleSummary;
pub use visit::{DEFAULT_UPCOMING_DAYS, UNKNOWN_CUSTOMER_NAME, UpcomingService, VisitSummary};

#[derive(Debug, Clone)]
pub struct DealerControlPlane {
    store: DataStore,
}

impl DealerControlPlane {
    #[must_use]
    pub const fn new(store: DataStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &DataStore {
        &self.store
    }
}
