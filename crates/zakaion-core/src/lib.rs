//! Plumbing shared by Zakaion services: env config, tracing, request ids,
//! health probes and date formatting.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
