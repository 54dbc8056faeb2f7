use dealer_store::Customer;
use serde::{Deserialize, Serialize};

use super::DealerControlPlane;

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";

/// Customer row returned by the name search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub phone: String,
}

impl From<Customer> for CustomerSummary {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            phone: customer.phone.unwrap_or_default(),
        }
    }
}

/// Structured miss for singular lookups, serialized as `{"error": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LookupError {
    pub error: String,
}

/// Result of a customer lookup: the full record, or a structured miss.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CustomerLookup {
    Found(Customer),
    NotFound(LookupError),
}

impl CustomerLookup {
    fn not_found() -> Self {
        Self::NotFound(LookupError {
            error: CUSTOMER_NOT_FOUND.to_string(),
        })
    }

    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        match self {
            Self::Found(customer) => Some(customer),
            Self::NotFound(_) => None,
        }
    }
}

impl DealerControlPlane {
    /// Finds customers whose name contains `name`.
    ///
    /// Containment runs one way only (record name contains the query), so an
    /// empty query returns every customer.
    #[must_use]
    pub fn search_customer_by_name(&self, name: &str) -> Vec<CustomerSummary> {
        self.store
            .customers()
            .into_iter()
            .filter(|customer| customer.name.contains(name))
            .map(CustomerSummary::from)
            .collect()
    }

    /// Looks up a customer by exact id. The id is not normalized.
    #[must_use]
    pub fn get_customer_info(&self, customer_id: &str) -> CustomerLookup {
        self.store
            .customers()
            .into_iter()
            .find(|customer| customer.id == customer_id)
            .map_or_else(CustomerLookup::not_found, CustomerLookup::Found)
    }
}
