//! Customer accessor for the Lunchly server
//!
//! Lookups, reporting queries and persistence for customers,
//! plus the HTTP handlers that expose them.

pub mod handlers;
mod service;

pub use handlers::configure;
pub use service::TOP_CUSTOMERS_LIMIT;
