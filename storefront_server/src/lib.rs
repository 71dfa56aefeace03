//! HTTP server for storefront accounts and catalog search.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
