//! Record models and collection schema for dealer-mcp.
//!
//! This crate defines the dealership records shared by the record sources,
//! the query control plane, and the transports.

pub mod models;
pub mod schema;

pub use models::*;
pub use schema::Collection;
