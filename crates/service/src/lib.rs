//! Marketplace service layer.
//! - Orchestrators validate and normalize requests, resolve cross-entity
//!   references, and delegate to repository ports.
//! - Ports are traits; `repo` holds the sea-orm and HTTP implementations and
//!   each port module carries an in-memory `mock` for tests.
//! - Every port call is driven through a [`context::CallContext`].

pub mod errors;
pub mod context;
pub mod normalize;
pub mod advertisement;
pub mod category;
pub mod search;
pub mod user;
pub mod repo;
#[cfg(test)]
pub mod test_support;
