//! Test utilities for Zakaion services.
//!
//! Provides `MockAuth` bearer headers and request/response helpers for
//! driving routers with `tower::ServiceExt::oneshot`.
//! Import in tests only, never in production code.

pub mod auth;
pub mod http;
