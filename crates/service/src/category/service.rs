use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{Category, CreateCategoryRequest, DeleteCategoryResponse, UpdateCategoryRequest};
use super::repository::CategoryRepository;
use crate::context::CallContext;
use crate::errors::ServiceError;
use crate::normalize;

/// Category business rules: required fields, alias normalization and alias
/// uniqueness.
pub struct CategoryService<R: CategoryRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: CategoryRepository + ?Sized> CategoryService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a category after checking that its alias is free.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::category::{CategoryService, domain::CreateCategoryRequest, repository::mock::MockCategoryRepository};
    /// use service::{context::CallContext, errors::ServiceError};
    ///
    /// let svc = CategoryService::new(Arc::new(MockCategoryRepository::default()));
    /// let ctx = CallContext::new();
    /// let req = CreateCategoryRequest { name: " Electronics ".into(), alias: " Electronics ".into() };
    /// let created = tokio_test::block_on(svc.create(&ctx, req.clone())).unwrap();
    /// assert_eq!(created.alias, "electronics");
    /// let dup = tokio_test::block_on(svc.create(&ctx, req));
    /// assert!(matches!(dup, Err(ServiceError::Conflict(_))));
    /// ```
    #[instrument(skip(self, ctx, req))]
    pub async fn create(&self, ctx: &CallContext, req: CreateCategoryRequest) -> Result<Category, ServiceError> {
        normalize::require_text("category name", &req.name)?;
        normalize::require_text("category alias", &req.alias)?;

        let req = CreateCategoryRequest {
            name: normalize::text(&req.name),
            alias: normalize::alias(&req.alias),
        };

        self.ensure_alias_free(ctx, &req.alias, None).await?;

        let created = ctx.run(self.repo.create(ctx, &req)).await?;
        info!(category_id = created.id, alias = %created.alias, "category_created");
        Ok(created)
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_by_id(&self, ctx: &CallContext, id: i64) -> Result<Category, ServiceError> {
        normalize::require_positive("category ID", id)?;
        ctx.run(self.repo.get_by_id(ctx, id)).await
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_by_alias(&self, ctx: &CallContext, alias: &str) -> Result<Category, ServiceError> {
        normalize::require_text("alias", alias)?;
        let alias = normalize::alias(alias);
        ctx.run(self.repo.get_by_alias(ctx, &alias)).await
    }

    pub async fn get_all(&self, ctx: &CallContext) -> Result<Vec<Category>, ServiceError> {
        ctx.run(self.repo.get_all(ctx)).await
    }

    /// Update name and/or alias. Whitespace-only values count as omitted.
    /// Moving to an alias owned by another category is a conflict; keeping
    /// the category's own alias (in any letter case) is not.
    #[instrument(skip(self, ctx, req), fields(category_id = req.id))]
    pub async fn update_by_id(&self, ctx: &CallContext, req: UpdateCategoryRequest) -> Result<Category, ServiceError> {
        normalize::require_positive("category ID", req.id)?;

        let alias = normalize::supplied(req.alias.as_deref()).map(normalize::alias);
        let name = normalize::supplied(req.name.as_deref()).map(normalize::text);

        if let Some(alias) = &alias {
            self.ensure_alias_free(ctx, alias, Some(req.id)).await?;
        }

        let req = UpdateCategoryRequest { id: req.id, name, alias };
        let updated = ctx.run(self.repo.update(ctx, &req)).await?;
        info!(category_id = updated.id, "category_updated");
        Ok(updated)
    }

    #[instrument(skip(self, ctx))]
    pub async fn delete_by_id(&self, ctx: &CallContext, id: i64) -> Result<DeleteCategoryResponse, ServiceError> {
        normalize::require_positive("category ID", id)?;
        ctx.run(self.repo.delete(ctx, id)).await?;
        info!(category_id = id, "category_deleted");
        Ok(DeleteCategoryResponse {})
    }

    /// Alias probe. A hit owned by anyone other than `owner` is reported as
    /// a fresh `Conflict`; a miss is the only outcome that lets the write
    /// proceed, and other port errors are passed through.
    async fn ensure_alias_free(&self, ctx: &CallContext, alias: &str, owner: Option<i64>) -> Result<(), ServiceError> {
        match ctx.run(self.repo.get_by_alias(ctx, alias)).await {
            Ok(existing) if Some(existing.id) == owner => {
                debug!(category_id = existing.id, %alias, "alias unchanged");
                Ok(())
            }
            Ok(existing) => {
                warn!(existing_id = existing.id, %alias, "alias already taken");
                Err(ServiceError::Conflict(format!(
                    "category alias '{}' is already used by category {}",
                    alias, existing.id
                )))
            }
            Err(ServiceError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::repository::mock::MockCategoryRepository;

    fn setup() -> (Arc<MockCategoryRepository>, CategoryService<MockCategoryRepository>) {
        let repo = Arc::new(MockCategoryRepository::default());
        (repo.clone(), CategoryService::new(repo))
    }

    #[tokio::test]
    async fn create_normalizes_name_and_alias() {
        let (repo, svc) = setup();
        let created = svc
            .create(&CallContext::new(), CreateCategoryRequest { name: "  Books ".into(), alias: " Paper-Books ".into() })
            .await
            .unwrap();
        assert_eq!(created.name, "Books");
        assert_eq!(created.alias, "paper-books");
        assert_eq!(repo.calls(), vec!["get_by_alias", "create"]);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_without_touching_storage() {
        let (repo, svc) = setup();
        let ctx = CallContext::new();
        for (name, alias) in [("", "books"), ("   ", "books"), ("Books", ""), ("Books", " \t ")] {
            let res = svc.create(&ctx, CreateCategoryRequest { name: name.into(), alias: alias.into() }).await;
            assert!(matches!(res, Err(ServiceError::Validation(_))), "{name:?}/{alias:?}");
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn duplicate_alias_is_a_conflict_regardless_of_case() {
        let (repo, svc) = setup();
        repo.insert("Electronics", "electronics");
        let res = svc
            .create(&CallContext::new(), CreateCategoryRequest { name: "Gadgets".into(), alias: "Electronics".into() })
            .await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(repo.call_count("create"), 0);
        assert_eq!(repo.rows().len(), 1);
    }

    #[tokio::test]
    async fn alias_probe_failure_is_propagated() {
        let (repo, svc) = setup();
        repo.fail_with(ServiceError::Repository("connection reset".into()));
        let res = svc
            .create(&CallContext::new(), CreateCategoryRequest { name: "Books".into(), alias: "books".into() })
            .await;
        assert_eq!(res, Err(ServiceError::Repository("connection reset".into())));
        assert_eq!(repo.call_count("create"), 0);
    }

    #[tokio::test]
    async fn update_to_own_alias_in_other_case_is_not_a_conflict() {
        let (repo, svc) = setup();
        repo.insert_with_id(3, "Books", "books");
        let updated = svc
            .update_by_id(&CallContext::new(), UpdateCategoryRequest { id: 3, name: None, alias: Some("Books".into()) })
            .await
            .unwrap();
        assert_eq!(updated.alias, "books");
        assert_eq!(repo.calls(), vec!["get_by_alias", "update"]);
    }

    #[tokio::test]
    async fn update_to_alias_of_another_category_is_a_conflict() {
        let (repo, svc) = setup();
        repo.insert_with_id(3, "Books", "books");
        repo.insert_with_id(4, "Music", "music");
        let res = svc
            .update_by_id(&CallContext::new(), UpdateCategoryRequest { id: 3, name: None, alias: Some(" MUSIC ".into()) })
            .await;
        assert!(matches!(res, Err(ServiceError::Conflict(_))));
        assert_eq!(repo.call_count("update"), 0);
    }

    #[tokio::test]
    async fn update_without_alias_skips_probe_and_trims_name() {
        let (repo, svc) = setup();
        repo.insert_with_id(3, "Books", "books");
        let updated = svc
            .update_by_id(&CallContext::new(), UpdateCategoryRequest { id: 3, name: Some("  Old books ".into()), alias: Some("   ".into()) })
            .await
            .unwrap();
        assert_eq!(updated.name, "Old books");
        assert_eq!(updated.alias, "books");
        assert_eq!(repo.calls(), vec!["update"]);
    }

    #[tokio::test]
    async fn lookups_validate_before_delegating() {
        let (repo, svc) = setup();
        let ctx = CallContext::new();
        assert!(matches!(svc.get_by_id(&ctx, 0).await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.get_by_alias(&ctx, "  ").await, Err(ServiceError::Validation(_))));
        assert!(matches!(svc.delete_by_id(&ctx, -1).await, Err(ServiceError::Validation(_))));
        assert!(matches!(
            svc.update_by_id(&ctx, UpdateCategoryRequest { id: 0, ..Default::default() }).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(repo.calls().is_empty());

        repo.insert_with_id(9, "Books", "books");
        assert_eq!(svc.get_by_alias(&ctx, " BOOKS ").await.unwrap().id, 9);
        assert!(matches!(svc.get_by_id(&ctx, 10).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_delegates_without_existence_probe() {
        let (repo, svc) = setup();
        repo.insert_with_id(2, "Books", "books");
        svc.delete_by_id(&CallContext::new(), 2).await.unwrap();
        assert_eq!(repo.calls(), vec!["delete"]);
        let missing = svc.delete_by_id(&CallContext::new(), 2).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn cancelled_context_stops_before_storage() {
        let (repo, svc) = setup();
        let ctx = CallContext::new();
        ctx.cancel();
        let res = svc.create(&ctx, CreateCategoryRequest { name: "Books".into(), alias: "books".into() }).await;
        assert_eq!(res, Err(ServiceError::Cancelled));
        assert!(repo.calls().is_empty());
    }
}
