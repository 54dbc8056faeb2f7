use dealer_store::Contract;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DealerControlPlane;
use crate::matcher::normalize_customer_id;

/// Contract row returned by the contract history query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractSummary {
    pub id: String,
    pub vehicle_id: String,
    pub contract_date: String,
    #[serde(rename = "type")]
    pub contract_type: String,
    pub amount: Value,
    pub status: String,
}

impl From<Contract> for ContractSummary {
    fn from(contract: Contract) -> Self {
        Self {
            id: contract.id,
            vehicle_id: contract.vehicle_id,
            contract_date: contract.contract_date,
            contract_type: contract.contract_type,
            amount: contract.amount,
            status: contract.status,
        }
    }
}

impl DealerControlPlane {
    /// Lists contracts for a customer.
    ///
    /// `customer_id` may be a bare id or text containing one (`"C001の契約"`).
    #[must_use]
    pub fn get_contracts(&self, customer_id: &str) -> Vec<ContractSummary> {
        let customer_id = normalize_customer_id(customer_id);
        self.store
            .contracts()
            .into_iter()
            .filter(|contract| contract.customer_id == customer_id)
            .map(ContractSummary::from)
            .collect()
    }
}
