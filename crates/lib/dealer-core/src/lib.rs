//! Core services for dealer-mcp.
//!
//! This crate loads the dealership record collections, implements the
//! matching rules used by the search tools, exposes the read-only query
//! control plane, and dispatches tool calls through an explicit registry.

pub mod control;
pub mod dispatch;
pub mod matcher;
pub mod store;
