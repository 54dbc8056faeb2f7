use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{DealerMcp, helpers};

/// Parameters for searching customers by name.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchCustomerParams {
    /// Customer name or part of it (e.g. "田中").
    pub name: String,
}

/// Parameters for tools keyed by customer id.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CustomerIdParams {
    /// Customer id (e.g. "C001").
    pub customer_id: String,
}

#[tool_router(router = tool_router_customer, vis = "pub")]
impl DealerMcp {
    #[tool(description = "Search customers by name (partial match). Returns id, name, and phone.")]
    async fn search_customer_by_name(
        &self,
        Parameters(params): Parameters<SearchCustomerParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.control.search_customer_by_name(&params.name))
    }

    #[tool(description = "Fetch full customer details by exact customer id.")]
    async fn get_customer_info(
        &self,
        Parameters(params): Parameters<CustomerIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.control.get_customer_info(&params.customer_id))
    }
}
