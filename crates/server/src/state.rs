//! Router state for the three services.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use service::advertisement::repository::AdvertisementRepository;
use service::advertisement::AdvertisementService;
use service::category::repository::CategoryRepository;
use service::category::CategoryService;
use service::context::CallContext;
use service::search::repository::SearchRepository;
use service::search::SearchService;
use service::user::repository::UserRepository;
use service::user::UserService;
use tokio_util::sync::CancellationToken;

pub type Advertisements = Arc<AdvertisementService<dyn AdvertisementRepository, dyn CategoryRepository, dyn UserRepository>>;
pub type Categories = Arc<CategoryService<dyn CategoryRepository>>;
pub type Search = Arc<SearchService<dyn SearchRepository>>;
pub type Users = Arc<UserService<dyn UserRepository>>;

/// Per-request context factory: each request gets a child of `requests`,
/// bounded by the configured request timeout.
///
/// `requests` is not the signal token. It is cancelled only once the HTTP
/// server has drained, so a shutdown signal never aborts in-flight calls.
#[derive(Clone, Debug)]
pub struct RequestScope {
    requests: CancellationToken,
    timeout: Duration,
}

impl RequestScope {
    pub fn new(requests: CancellationToken, timeout: Duration) -> Self {
        Self { requests, timeout }
    }

    pub fn context(&self) -> CallContext {
        CallContext::with_token(self.requests.child_token()).with_timeout(self.timeout)
    }
}

/// advertisements-storage: ads, categories and search over the database.
#[derive(Clone)]
pub struct StorageState {
    pub advertisements: Advertisements,
    pub categories: Categories,
    pub search: Search,
    pub scope: RequestScope,
}

/// category-service: categories over the remote storage port.
#[derive(Clone)]
pub struct CategoryState {
    pub categories: Categories,
    pub scope: RequestScope,
}

#[derive(Clone)]
pub struct UsersState {
    pub users: Users,
    pub scope: RequestScope,
}

impl FromRef<StorageState> for Advertisements {
    fn from_ref(s: &StorageState) -> Self { s.advertisements.clone() }
}

impl FromRef<StorageState> for Categories {
    fn from_ref(s: &StorageState) -> Self { s.categories.clone() }
}

impl FromRef<StorageState> for Search {
    fn from_ref(s: &StorageState) -> Self { s.search.clone() }
}

impl FromRef<StorageState> for RequestScope {
    fn from_ref(s: &StorageState) -> Self { s.scope.clone() }
}

impl FromRef<CategoryState> for Categories {
    fn from_ref(s: &CategoryState) -> Self { s.categories.clone() }
}

impl FromRef<CategoryState> for RequestScope {
    fn from_ref(s: &CategoryState) -> Self { s.scope.clone() }
}

impl FromRef<UsersState> for Users {
    fn from_ref(s: &UsersState) -> Self { s.users.clone() }
}

impl FromRef<UsersState> for RequestScope {
    fn from_ref(s: &UsersState) -> Self { s.scope.clone() }
}
