//! The dealership tool set registered with the dispatcher.

use dealer_store::schema::VEHICLE_TYPES;

use super::{RegistryError, ToolDescriptor, ToolProperty, ToolRegistry, to_tool_value};
use crate::control::{DEFAULT_UPCOMING_DAYS, DealerControlPlane};

pub const TOOL_SEARCH_CUSTOMER_BY_NAME: &str = "search_customer_by_name";
pub const TOOL_GET_CUSTOMER_INFO: &str = "get_customer_info";
pub const TOOL_GET_CONTRACTS: &str = "get_contracts";
pub const TOOL_GET_VISIT_HISTORY: &str = "get_visit_history";
pub const TOOL_GET_UPCOMING_SERVICES: &str = "get_upcoming_services";
pub const TOOL_SEARCH_VEHICLES: &str = "search_vehicles";

/// Builds the registry of the six dealership query tools.
///
/// # Errors
/// Returns `RegistryError` if two tools share a name.
pub fn dealer_registry(control: &DealerControlPlane) -> Result<ToolRegistry, RegistryError> {
    let search_customers = control.clone();
    let customer_info = control.clone();
    let contracts = control.clone();
    let visits = control.clone();
    let upcoming = control.clone();
    let vehicles = control.clone();

    ToolRegistry::builder()
        .tool(
            ToolDescriptor::new(
                TOOL_SEARCH_CUSTOMER_BY_NAME,
                "Search customers by name (partial match). Returns id, name, and phone.",
            )
            .param(
                ToolProperty::string("name", "Customer name or part of it (e.g. '田中').")
                    .required(),
            ),
            move |arguments| {
                let name = arguments.string("name")?;
                to_tool_value(&search_customers.search_customer_by_name(name))
            },
        )
        .tool(
            ToolDescriptor::new(
                TOOL_GET_CUSTOMER_INFO,
                "Fetch full customer details by exact customer id.",
            )
            .param(ToolProperty::string("customer_id", "Customer id (e.g. 'C001').").required()),
            move |arguments| {
                let customer_id = arguments.string("customer_id")?;
                to_tool_value(&customer_info.get_customer_info(customer_id))
            },
        )
        .tool(
            ToolDescriptor::new(
                TOOL_GET_CONTRACTS,
                "List a customer's contract history. Text containing an id such as 'C001' is accepted.",
            )
            .param(ToolProperty::string("customer_id", "Customer id (e.g. 'C001').").required()),
            move |arguments| {
                let customer_id = arguments.string("customer_id")?;
                to_tool_value(&contracts.get_contracts(customer_id))
            },
        )
        .tool(
            ToolDescriptor::new(
                TOOL_GET_VISIT_HISTORY,
                "List a customer's visit history (inspections, repairs, showroom visits).",
            )
            .param(ToolProperty::string("customer_id", "Customer id (e.g. 'C001').").required()),
            move |arguments| {
                let customer_id = arguments.string("customer_id")?;
                to_tool_value(&visits.get_visit_history(customer_id))
            },
        )
        .tool(
            ToolDescriptor::new(
                TOOL_GET_UPCOMING_SERVICES,
                "List services scheduled from today through the given number of days, sorted by date.",
            )
            .param(
                ToolProperty::integer(
                    "days",
                    format!("How many days ahead to search (default: {DEFAULT_UPCOMING_DAYS})."),
                )
                .with_default(DEFAULT_UPCOMING_DAYS),
            ),
            move |arguments| {
                let days = arguments.integer_or("days", DEFAULT_UPCOMING_DAYS)?;
                to_tool_value(&upcoming.get_upcoming_services(days))
            },
        )
        .tool(
            ToolDescriptor::new(
                TOOL_SEARCH_VEHICLES,
                "Search vehicle inventory by body type and optional color. Colors match loosely: '赤' finds 'ソウルレッド'.",
            )
            .param(
                ToolProperty::string("type", "Body type, matched exactly.")
                    .required()
                    .with_enum(VEHICLE_TYPES),
            )
            .param(ToolProperty::string("color", "Color (optional, partial match).")),
            move |arguments| {
                let vehicle_type = arguments.string("type")?;
                let color = arguments.optional_string("color")?;
                to_tool_value(&vehicles.search_vehicles(vehicle_type, color))
            },
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DataStore, MemorySource};

    #[test]
    fn registers_six_tools_in_order() {
        let control = DealerControlPlane::new(DataStore::new(MemorySource::new()));
        let registry = dealer_registry(&control).expect("registry should build");
        assert_eq!(
            registry.names(),
            vec![
                TOOL_SEARCH_CUSTOMER_BY_NAME,
                TOOL_GET_CUSTOMER_INFO,
                TOOL_GET_CONTRACTS,
                TOOL_GET_VISIT_HISTORY,
                TOOL_GET_UPCOMING_SERVICES,
                TOOL_SEARCH_VEHICLES,
            ]
        );
    }
}
