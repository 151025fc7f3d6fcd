//! Users: only existence-by-id matters to advertisements; the users service
//! exposes the full store.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::UserService;
