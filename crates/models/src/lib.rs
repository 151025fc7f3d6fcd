//! sea-orm entities for the marketplace tables plus the persistence helpers
//! the service-layer repositories are built on.

pub mod errors;
pub mod db;
pub mod category;
pub mod user;
pub mod advertisement;

#[cfg(test)]
mod tests;
