//! Shared plumbing for the marketplace services: logging setup, environment
//! lookups, shutdown signalling and small wire types.

pub mod types;
pub mod utils;
pub mod env;
pub mod shutdown;
