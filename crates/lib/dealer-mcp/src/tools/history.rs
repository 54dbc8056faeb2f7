use dealer_core::control::DEFAULT_UPCOMING_DAYS;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::tools::customer::CustomerIdParams;
use crate::{DealerMcp, helpers};

/// Parameters for listing upcoming services.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UpcomingServicesParams {
    /// How many days ahead to search (default: 30).
    pub days: Option<i64>,
}

#[tool_router(router = tool_router_history, vis = "pub")]
impl DealerMcp {
    #[tool(description = "List a customer's contract history. Text containing an id such as 'C001' is accepted.")]
    async fn get_contracts(
        &self,
        Parameters(params): Parameters<CustomerIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.control.get_contracts(&params.customer_id))
    }

    #[tool(description = "List a customer's visit history (inspections, repairs, showroom visits).")]
    async fn get_visit_history(
        &self,
        Parameters(params): Parameters<CustomerIdParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::json_result(self.control.get_visit_history(&params.customer_id))
    }

    #[tool(description = "List services scheduled from today through the given number of days, sorted by date.")]
    async fn get_upcoming_services(
        &self,
        Parameters(params): Parameters<UpcomingServicesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let days = params.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
        helpers::json_result(self.control.get_upcoming_services(days))
    }
}
