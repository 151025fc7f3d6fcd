use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{
    Advertisement, CreateAdvertisementRequest, DeleteAdvertisementResponse, UpdateAdvertisementRequest,
};
use super::repository::AdvertisementRepository;
use crate::category::repository::CategoryRepository;
use crate::context::CallContext;
use crate::errors::ServiceError;
use crate::normalize;
use crate::user::repository::UserRepository;

/// Advertisement business rules.
///
/// Writes are only delegated once the referenced category and then the
/// referenced user have been resolved. The category check always runs first,
/// so a request with two dangling references reports the category.
pub struct AdvertisementService<A, C, U>
where
    A: AdvertisementRepository + ?Sized,
    C: CategoryRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    ads: Arc<A>,
    categories: Arc<C>,
    users: Arc<U>,
}

/// Validate in field order, then trim/case-fold.
fn validate_create(req: CreateAdvertisementRequest) -> Result<CreateAdvertisementRequest, ServiceError> {
    normalize::require_text("title", &req.title)?;
    normalize::require_text("description", &req.description)?;
    normalize::require_non_zero("price", req.price)?;
    normalize::require_text("currency", &req.currency)?;
    normalize::require_positive("categoryId", req.category_id)?;
    normalize::require_positive("userId", req.user_id)?;

    Ok(CreateAdvertisementRequest {
        title: normalize::text(&req.title),
        description: normalize::text(&req.description),
        currency: normalize::currency(&req.currency),
        ..req
    })
}

/// Supplied fields must still satisfy the create-time rules; omitted ones
/// stay `None` so storage leaves them alone.
fn validate_update(req: UpdateAdvertisementRequest) -> Result<UpdateAdvertisementRequest, ServiceError> {
    fn field(name: &str, value: Option<String>, norm: fn(&str) -> String) -> Result<Option<String>, ServiceError> {
        match value {
            Some(v) => {
                normalize::require_text(name, &v)?;
                Ok(Some(norm(&v)))
            }
            None => Ok(None),
        }
    }

    if let Some(price) = req.price {
        normalize::require_non_zero("price", price)?;
    }
    let category_id = match req.category_id {
        Some(0) | None => None,
        Some(id) => {
            normalize::require_positive("categoryId", id)?;
            Some(id)
        }
    };

    Ok(UpdateAdvertisementRequest {
        id: req.id,
        title: field("title", req.title, normalize::text)?,
        description: field("description", req.description, normalize::text)?,
        price: req.price,
        currency: field("currency", req.currency, normalize::currency)?,
        category_id,
    })
}

impl<A, C, U> AdvertisementService<A, C, U>
where
    A: AdvertisementRepository + ?Sized,
    C: CategoryRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub fn new(ads: Arc<A>, categories: Arc<C>, users: Arc<U>) -> Self {
        Self { ads, categories, users }
    }

    /// Validate, normalize, resolve category then user, then create.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::advertisement::{AdvertisementService, domain::CreateAdvertisementRequest, repository::mock::MockAdvertisementRepository};
    /// use service::category::repository::mock::MockCategoryRepository;
    /// use service::user::repository::mock::MockUserRepository;
    /// use service::context::CallContext;
    ///
    /// let categories = Arc::new(MockCategoryRepository::default());
    /// categories.insert_with_id(5, "Bikes", "bikes");
    /// let users = Arc::new(MockUserRepository::default());
    /// users.insert_with_id(9, "rider@example.com", "Rider");
    /// let svc = AdvertisementService::new(Arc::new(MockAdvertisementRepository::default()), categories, users);
    ///
    /// let req = CreateAdvertisementRequest {
    ///     title: "Bike".into(), description: "Red bike".into(), price: 100,
    ///     currency: " usd ".into(), category_id: 5, user_id: 9,
    /// };
    /// let ad = tokio_test::block_on(svc.create(&CallContext::new(), req)).unwrap();
    /// assert_eq!(ad.currency, "USD");
    /// ```
    #[instrument(skip(self, ctx, req), fields(category_id = req.category_id, user_id = req.user_id))]
    pub async fn create(&self, ctx: &CallContext, req: CreateAdvertisementRequest) -> Result<Advertisement, ServiceError> {
        let req = validate_create(req)?;

        ctx.run(self.categories.get_by_id(ctx, req.category_id)).await?;
        ctx.run(self.users.get_by_id(ctx, req.user_id)).await?;
        debug!("references resolved");

        let created = ctx.run(self.ads.create(ctx, &req)).await?;
        info!(advertisement_id = created.id, "advertisement_created");
        Ok(created)
    }

    #[instrument(skip(self, ctx))]
    pub async fn get_by_id(&self, ctx: &CallContext, id: i64) -> Result<Advertisement, ServiceError> {
        normalize::require_positive("advertisement ID", id)?;
        ctx.run(self.ads.get_by_id(ctx, id)).await
    }

    pub async fn get_all(&self, ctx: &CallContext) -> Result<Vec<Advertisement>, ServiceError> {
        ctx.run(self.ads.get_all(ctx)).await
    }

    /// Read the stored advertisement, re-resolve the category only when the
    /// request moves it to a different one, then update.
    #[instrument(skip(self, ctx, req), fields(advertisement_id = req.id))]
    pub async fn update_by_id(&self, ctx: &CallContext, req: UpdateAdvertisementRequest) -> Result<Advertisement, ServiceError> {
        normalize::require_positive("advertisement ID", req.id)?;
        let req = validate_update(req)?;

        let existing = ctx.run(self.ads.get_by_id(ctx, req.id)).await?;

        if let Some(category_id) = req.category_id.filter(|c| *c != existing.category_id) {
            debug!(from = existing.category_id, to = category_id, "category changed");
            ctx.run(self.categories.get_by_id(ctx, category_id)).await?;
        }

        let updated = ctx.run(self.ads.update(ctx, &req)).await?;
        info!(advertisement_id = updated.id, "advertisement_updated");
        Ok(updated)
    }

    #[instrument(skip(self, ctx))]
    pub async fn delete_by_id(&self, ctx: &CallContext, id: i64) -> Result<DeleteAdvertisementResponse, ServiceError> {
        normalize::require_positive("advertisement ID", id)?;
        ctx.run(self.ads.get_by_id(ctx, id)).await?;
        ctx.run(self.ads.delete(ctx, id)).await?;
        info!(advertisement_id = id, "advertisement_deleted");
        Ok(DeleteAdvertisementResponse {})
    }
}
