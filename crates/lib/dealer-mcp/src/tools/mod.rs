//! MCP tool modules.
//!
//! Tools are grouped by domain: customer lookup, contract and visit history,
//! and vehicle inventory search.

pub mod customer;
pub mod history;
pub mod vehicle;
