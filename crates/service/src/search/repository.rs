use async_trait::async_trait;

use crate::advertisement::domain::Advertisement;
use crate::context::CallContext;
use crate::errors::ServiceError;

/// Read-only title lookup. `title` is already trimmed and non-empty;
/// matching is case-insensitive substring.
#[async_trait]
pub trait SearchRepository: Send + Sync {
    async fn search(&self, ctx: &CallContext, title: &str) -> Result<Vec<Advertisement>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockSearchRepository {
        ads: Mutex<Vec<Advertisement>>,
        queries: Mutex<Vec<String>>,
    }

    impl MockSearchRepository {
        pub fn with_ads(ads: Vec<Advertisement>) -> Self {
            Self { ads: Mutex::new(ads), queries: Mutex::default() }
        }

        /// Titles the port was asked for, in call order.
        pub fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl SearchRepository for MockSearchRepository {
        async fn search(&self, _ctx: &CallContext, title: &str) -> Result<Vec<Advertisement>, ServiceError> {
            self.queries.lock().unwrap_or_else(|e| e.into_inner()).push(title.to_string());
            let needle = title.to_lowercase();
            let ads = self.ads.lock().unwrap_or_else(|e| e.into_inner());
            Ok(ads.iter().filter(|a| a.title.to_lowercase().contains(&needle)).cloned().collect())
        }
    }
}
