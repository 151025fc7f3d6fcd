//! Port implementations: sea-orm over PostgreSQL, and an HTTP client for the
//! category port used when categories live in another process.

pub mod remote;
pub mod seaorm;

pub use remote::RemoteCategoryRepository;
pub use seaorm::{
    SeaOrmAdvertisementRepository, SeaOrmCategoryRepository, SeaOrmSearchRepository, SeaOrmUserRepository,
};
