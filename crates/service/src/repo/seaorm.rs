use std::fmt::Display;

use async_trait::async_trait;
use chrono::Utc;
use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use crate::advertisement::domain::{Advertisement, CreateAdvertisementRequest, UpdateAdvertisementRequest};
use crate::advertisement::repository::AdvertisementRepository;
use crate::category::domain::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::category::repository::CategoryRepository;
use crate::context::CallContext;
use crate::errors::ServiceError;
use crate::search::repository::SearchRepository;
use crate::user::domain::{CreateUserRequest, UpdateUserRequest, User};
use crate::user::repository::UserRepository;

/// Attach the lookup key to a model-level miss.
fn keyed(key: impl Display) -> impl FnOnce(ModelError) -> ServiceError {
    move |e| match e {
        ModelError::NotFound(entity) => ServiceError::not_found(entity, key),
        other => other.into(),
    }
}

fn to_category(m: models::category::Model) -> Category {
    Category {
        id: m.id,
        name: m.name,
        alias: m.alias,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn to_user(m: models::user::Model) -> User {
    User {
        id: m.id,
        email: m.email,
        name: m.name,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn to_advertisement(m: models::advertisement::Model) -> Advertisement {
    Advertisement {
        id: m.id,
        title: m.title,
        description: m.description,
        price: m.price,
        currency: m.currency,
        category_id: m.category_id,
        user_id: m.user_id,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

#[derive(Clone)]
pub struct SeaOrmCategoryRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn create(&self, _ctx: &CallContext, req: &CreateCategoryRequest) -> Result<Category, ServiceError> {
        let m = models::category::create(&self.db, &req.name, &req.alias).await?;
        Ok(to_category(m))
    }

    async fn get_by_id(&self, _ctx: &CallContext, id: i64) -> Result<Category, ServiceError> {
        models::category::find(&self.db, id)
            .await?
            .map(to_category)
            .ok_or_else(|| ServiceError::not_found("category", id))
    }

    async fn get_by_alias(&self, _ctx: &CallContext, alias: &str) -> Result<Category, ServiceError> {
        models::category::find_by_alias(&self.db, alias)
            .await?
            .map(to_category)
            .ok_or_else(|| ServiceError::not_found("category", alias))
    }

    async fn get_all(&self, _ctx: &CallContext) -> Result<Vec<Category>, ServiceError> {
        Ok(models::category::list(&self.db).await?.into_iter().map(to_category).collect())
    }

    async fn update(&self, _ctx: &CallContext, req: &UpdateCategoryRequest) -> Result<Category, ServiceError> {
        let m = models::category::update(&self.db, req.id, req.name.as_deref(), req.alias.as_deref())
            .await
            .map_err(keyed(req.id))?;
        Ok(to_category(m))
    }

    async fn delete(&self, _ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
        models::category::delete(&self.db, id).await.map_err(keyed(id))
    }
}

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, _ctx: &CallContext, req: &CreateUserRequest) -> Result<User, ServiceError> {
        Ok(to_user(models::user::create(&self.db, &req.email, &req.name).await?))
    }

    async fn get_by_id(&self, _ctx: &CallContext, id: i64) -> Result<User, ServiceError> {
        models::user::find(&self.db, id)
            .await?
            .map(to_user)
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    async fn get_by_email(&self, _ctx: &CallContext, email: &str) -> Result<User, ServiceError> {
        models::user::find_by_email(&self.db, email)
            .await?
            .map(to_user)
            .ok_or_else(|| ServiceError::not_found("user", email))
    }

    async fn get_all(&self, _ctx: &CallContext) -> Result<Vec<User>, ServiceError> {
        Ok(models::user::list(&self.db).await?.into_iter().map(to_user).collect())
    }

    async fn update(&self, _ctx: &CallContext, req: &UpdateUserRequest) -> Result<User, ServiceError> {
        let m = models::user::update(&self.db, req.id, req.email.as_deref(), req.name.as_deref())
            .await
            .map_err(keyed(req.id))?;
        Ok(to_user(m))
    }

    async fn delete(&self, _ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
        models::user::delete(&self.db, id).await.map_err(keyed(id))
    }
}

#[derive(Clone)]
pub struct SeaOrmAdvertisementRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl AdvertisementRepository for SeaOrmAdvertisementRepository {
    async fn create(&self, _ctx: &CallContext, req: &CreateAdvertisementRequest) -> Result<Advertisement, ServiceError> {
        let new = models::advertisement::NewAdvertisement {
            title: &req.title,
            description: &req.description,
            price: req.price,
            currency: &req.currency,
            category_id: req.category_id,
            user_id: req.user_id,
        };
        Ok(to_advertisement(models::advertisement::create(&self.db, new).await?))
    }

    async fn get_by_id(&self, _ctx: &CallContext, id: i64) -> Result<Advertisement, ServiceError> {
        models::advertisement::find(&self.db, id)
            .await?
            .map(to_advertisement)
            .ok_or_else(|| ServiceError::not_found("advertisement", id))
    }

    async fn get_all(&self, _ctx: &CallContext) -> Result<Vec<Advertisement>, ServiceError> {
        Ok(models::advertisement::list(&self.db).await?.into_iter().map(to_advertisement).collect())
    }

    async fn update(&self, _ctx: &CallContext, req: &UpdateAdvertisementRequest) -> Result<Advertisement, ServiceError> {
        let changes = models::advertisement::AdvertisementChanges {
            title: req.title.as_deref(),
            description: req.description.as_deref(),
            price: req.price,
            currency: req.currency.as_deref(),
            category_id: req.category_id,
        };
        let m = models::advertisement::update(&self.db, req.id, changes)
            .await
            .map_err(keyed(req.id))?;
        Ok(to_advertisement(m))
    }

    async fn delete(&self, _ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
        models::advertisement::delete(&self.db, id).await.map_err(keyed(id))
    }
}

#[derive(Clone)]
pub struct SeaOrmSearchRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl SearchRepository for SeaOrmSearchRepository {
    async fn search(&self, _ctx: &CallContext, title: &str) -> Result<Vec<Advertisement>, ServiceError> {
        let rows = models::advertisement::search_by_title(&self.db, title).await?;
        Ok(rows.into_iter().map(to_advertisement).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advertisement::AdvertisementService;
    use crate::search::domain::SearchAdvertisementByTitleRequest;
    use crate::search::SearchService;
    use crate::test_support::{get_db, unique};
    use std::sync::Arc;

    #[test]
    fn model_miss_gets_the_key() {
        assert_eq!(keyed(7)(ModelError::NotFound("category")), ServiceError::not_found("category", 7));
        assert!(matches!(keyed(7)(ModelError::Constraint("fk".into())), ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn orchestrated_round_trip_over_postgres() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let ctx = CallContext::new();

        let categories = Arc::new(SeaOrmCategoryRepository { db: db.clone() });
        let users = Arc::new(SeaOrmUserRepository { db: db.clone() });
        let ads = Arc::new(SeaOrmAdvertisementRepository { db: db.clone() });
        let svc = AdvertisementService::new(ads.clone(), categories.clone(), users.clone());

        let cat = categories
            .create(&ctx, &CreateCategoryRequest { name: "Bikes".into(), alias: unique("bikes") })
            .await?;
        let user = users
            .create(&ctx, &CreateUserRequest { email: format!("{}@example.com", unique("rider")), name: "Rider".into() })
            .await?;

        let tag = unique("Tandem");
        let ad = svc
            .create(&ctx, CreateAdvertisementRequest {
                title: format!(" {} ", tag),
                description: "two seats".into(),
                price: 250,
                currency: "usd".into(),
                category_id: cat.id,
                user_id: user.id,
            })
            .await?;
        assert_eq!(ad.currency, "USD");
        assert_eq!(ad.title, tag);

        let missing = svc
            .create(&ctx, CreateAdvertisementRequest {
                title: "x".into(),
                description: "x".into(),
                price: 1,
                currency: "EUR".into(),
                category_id: i64::MAX,
                user_id: i64::MAX,
            })
            .await;
        assert_eq!(missing, Err(ServiceError::not_found("category", i64::MAX)));

        let search = SearchService::new(Arc::new(SeaOrmSearchRepository { db: db.clone() }));
        let hits = search
            .search_by_title(&ctx, SearchAdvertisementByTitleRequest { title: tag.to_uppercase() })
            .await?;
        assert!(hits.iter().any(|h| h.id == ad.id));

        // category still referenced
        assert!(matches!(categories.delete(&ctx, cat.id).await, Err(ServiceError::Conflict(_))));

        svc.delete_by_id(&ctx, ad.id).await?;
        assert_eq!(ads.get_by_id(&ctx, ad.id).await, Err(ServiceError::not_found("advertisement", ad.id)));
        categories.delete(&ctx, cat.id).await?;
        users.delete(&ctx, user.id).await?;
        Ok(())
    }
}
