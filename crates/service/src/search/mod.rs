//! Title search over stored advertisements.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::SearchService;
