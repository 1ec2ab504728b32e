//! Domain types shared across Zakaion services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Roles, capability sets and pagination used by every layer.

pub mod capability;
pub mod pagination;
pub mod role;
