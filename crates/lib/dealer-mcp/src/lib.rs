//! MCP server implementation for dealer-mcp.
//!
//! This crate wires the dealership query control plane into rmcp tool
//! handlers so MCP clients can call the same six tools the webhook serves.

mod helpers;
mod tools;
pub mod server;

use dealer_core::control::DealerControlPlane;
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};

pub use tools::customer::{CustomerIdParams, SearchCustomerParams};
pub use tools::history::UpcomingServicesParams;
pub use tools::vehicle::SearchVehiclesParams;

const SERVER_INSTRUCTIONS: &str = r"dealer-mcp answers read-only questions about a car dealership's customers, contracts, visits, and inventory.

Workflow:
1. When a customer is named, call `search_customer_by_name` first to resolve the customer id.
2. Use the id with:
   - `get_customer_info` for the full customer record.
   - `get_contracts` for purchase and lease history.
   - `get_visit_history` for inspections, repairs, and showroom visits.
3. `get_upcoming_services` lists services due within `days` days (default 30), sorted by date.
4. `search_vehicles` searches inventory by exact body type (SUV, セダン, 軽自動車, ミニバン)
   and an optional color. Basic colors such as 赤 match trim names such as ソウルレッド.

Notes:
- Customer ids look like `C001`.
- A customer lookup miss returns {'error': 'Customer not found'} rather than failing.
- `health` returns `ok`.";

/// MCP server wrapper around the query control plane and tool routers.
#[derive(Clone)]
pub struct DealerMcp {
    tool_router: ToolRouter<Self>,
    control: DealerControlPlane,
}

impl DealerMcp {
    #[must_use]
    pub fn new(control: DealerControlPlane) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_customer()
            + Self::tool_router_history()
            + Self::tool_router_vehicle();
        Self {
            tool_router,
            control,
        }
    }

    #[must_use]
    pub const fn control(&self) -> &DealerControlPlane {
        &self.control
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl DealerMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for DealerMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealer_core::store::{DataStore, MemorySource};

    #[test]
    fn routers_expose_every_tool() {
        let server = DealerMcp::new(DealerControlPlane::new(DataStore::new(MemorySource::new())));
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "get_contracts",
                "get_customer_info",
                "get_upcoming_services",
                "get_visit_history",
                "health",
                "search_customer_by_name",
                "search_vehicles",
            ]
        );
    }
}
