//! Clients - HTTP Clients for External APIs
//! 
//! This module contains HTTP clients for communicating with external APIs.

pub mod marketplace_client;

// Re-export main types for convenience
pub use marketplace_client::{MarketplaceApi, MarketplaceHttpClient};
