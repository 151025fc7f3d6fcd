//! Advertisements: the only entity whose writes depend on other stores.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::AdvertisementService;
