//! Categories: alias-unique lookup table referenced by advertisements.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::CategoryService;
