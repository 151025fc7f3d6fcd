use std::sync::Arc;

use tracing::{debug, instrument};

use super::domain::SearchAdvertisementByTitleRequest;
use super::repository::SearchRepository;
use crate::advertisement::domain::Advertisement;
use crate::context::CallContext;
use crate::errors::ServiceError;
use crate::normalize;

/// Longest accepted raw query, in characters.
pub const MAX_TITLE_LEN: usize = 200;

pub struct SearchService<R: SearchRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: SearchRepository + ?Sized> SearchService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// A blank query matches nothing and never reaches storage.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::search::{SearchService, domain::SearchAdvertisementByTitleRequest, repository::mock::MockSearchRepository};
    /// use service::context::CallContext;
    ///
    /// let repo = Arc::new(MockSearchRepository::default());
    /// let svc = SearchService::new(repo.clone());
    /// let req = SearchAdvertisementByTitleRequest { title: "   ".into() };
    /// let hits = tokio_test::block_on(svc.search_by_title(&CallContext::new(), req)).unwrap();
    /// assert!(hits.is_empty());
    /// assert!(repo.queries().is_empty());
    /// ```
    #[instrument(skip(self, ctx, req))]
    pub async fn search_by_title(
        &self,
        ctx: &CallContext,
        req: SearchAdvertisementByTitleRequest,
    ) -> Result<Vec<Advertisement>, ServiceError> {
        let title = normalize::text(&req.title);
        if title.is_empty() {
            return Ok(Vec::new());
        }
        if req.title.chars().count() > MAX_TITLE_LEN {
            return Err(ServiceError::validation(format!(
                "title must be at most {} characters",
                MAX_TITLE_LEN
            )));
        }

        let hits = ctx.run(self.repo.search(ctx, &title)).await?;
        debug!(query = %title, hits = hits.len(), "search done");
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::repository::mock::MockSearchRepository;
    use chrono::Utc;

    fn ad(id: i64, title: &str) -> Advertisement {
        let now = Utc::now();
        Advertisement {
            id,
            title: title.into(),
            description: "d".into(),
            price: 1,
            currency: "USD".into(),
            category_id: 1,
            user_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn req(title: &str) -> SearchAdvertisementByTitleRequest {
        SearchAdvertisementByTitleRequest { title: title.into() }
    }

    #[tokio::test]
    async fn trims_before_delegating() {
        let repo = Arc::new(MockSearchRepository::with_ads(vec![ad(1, "Red Bike"), ad(2, "Sofa")]));
        let svc = SearchService::new(repo.clone());
        let hits = svc.search_by_title(&CallContext::new(), req("  bike ")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(repo.queries(), vec!["bike".to_string()]);
    }

    #[tokio::test]
    async fn blank_query_is_empty_without_lookup() {
        let repo = Arc::new(MockSearchRepository::with_ads(vec![ad(1, "Bike")]));
        let svc = SearchService::new(repo.clone());
        for q in ["", "   ", "\t\n"] {
            assert!(svc.search_by_title(&CallContext::new(), req(q)).await.unwrap().is_empty());
        }
        assert!(repo.queries().is_empty());
    }

    #[tokio::test]
    async fn overlong_query_is_rejected() {
        let repo = Arc::new(MockSearchRepository::default());
        let svc = SearchService::new(repo.clone());
        let ctx = CallContext::new();

        let res = svc.search_by_title(&ctx, req(&"a".repeat(201))).await;
        assert!(matches!(res, Err(ServiceError::Validation(_))));
        assert!(repo.queries().is_empty());

        assert!(svc.search_by_title(&ctx, req(&"a".repeat(200))).await.is_ok());
        // 200 multi-byte characters are still within the limit
        assert!(svc.search_by_title(&ctx, req(&"é".repeat(200))).await.is_ok());
        assert_eq!(repo.queries().len(), 2);
    }

    #[tokio::test]
    async fn cancelled_context_skips_lookup() {
        let repo = Arc::new(MockSearchRepository::default());
        let svc = SearchService::new(repo.clone());
        let ctx = CallContext::new();
        ctx.cancel();
        assert_eq!(svc.search_by_title(&ctx, req("bike")).await, Err(ServiceError::Cancelled));
        assert!(repo.queries().is_empty());
    }
}
