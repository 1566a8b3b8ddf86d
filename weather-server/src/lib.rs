//! HTTP surface of the weather proxy.

pub mod cors;
pub mod routes;
pub mod server;
pub mod types;
