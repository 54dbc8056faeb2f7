use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, ErrorCode},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{DealerMcp, helpers};

/// Parameters for searching vehicle inventory.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchVehiclesParams {
    /// Body type, matched exactly: "SUV", "セダン", "軽自動車", or "ミニバン".
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// Color (optional, partial match; "赤" finds "ソウルレッド").
    pub color: Option<String>,
}

#[tool_router(router = tool_router_vehicle, vis = "pub")]
impl DealerMcp {
    #[tool(description = "Search vehicle inventory by body type and optional color. Colors match loosely: '赤' finds 'ソウルレッド'.")]
    async fn search_vehicles(
        &self,
        Parameters(params): Parameters<SearchVehiclesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        if params.vehicle_type.trim().is_empty() {
            return Err(helpers::mcp_err(
                ErrorCode::INVALID_PARAMS,
                "type is required (SUV, セダン, 軽自動車, or ミニバン)",
            ));
        }
        helpers::json_result(
            self.control
                .search_vehicles(&params.vehicle_type, params.color.as_deref()),
        )
    }
}
