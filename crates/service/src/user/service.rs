use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{CreateUserRequest, UpdateUserRequest, User};
use super::repository::UserRepository;
use crate::context::CallContext;
use crate::errors::ServiceError;
use crate::normalize;

/// User storage rules for the users service.
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

fn validate_email(email: &str) -> Result<(), ServiceError> {
    if !email.contains('@') {
        return Err(ServiceError::validation("invalid email"));
    }
    Ok(())
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip(self, ctx, req))]
    pub async fn create(&self, ctx: &CallContext, req: CreateUserRequest) -> Result<User, ServiceError> {
        normalize::require_text("name", &req.name)?;
        normalize::require_text("email", &req.email)?;
        let req = CreateUserRequest { email: normalize::email(&req.email), name: normalize::text(&req.name) };
        validate_email(&req.email)?;

        self.ensure_email_free(ctx, &req.email, None).await?;
        let created = ctx.run(self.repo.create(ctx, &req)).await?;
        info!(user_id = created.id, "user_created");
        Ok(created)
    }

    pub async fn get_by_id(&self, ctx: &CallContext, id: i64) -> Result<User, ServiceError> {
        normalize::require_positive("user ID", id)?;
        ctx.run(self.repo.get_by_id(ctx, id)).await
    }

    pub async fn get_by_email(&self, ctx: &CallContext, email: &str) -> Result<User, ServiceError> {
        normalize::require_text("email", email)?;
        let email = normalize::email(email);
        ctx.run(self.repo.get_by_email(ctx, &email)).await
    }

    pub async fn get_all(&self, ctx: &CallContext) -> Result<Vec<User>, ServiceError> {
        ctx.run(self.repo.get_all(ctx)).await
    }

    #[instrument(skip(self, ctx, req), fields(user_id = req.id))]
    pub async fn update_by_id(&self, ctx: &CallContext, req: UpdateUserRequest) -> Result<User, ServiceError> {
        normalize::require_positive("user ID", req.id)?;
        let email = normalize::supplied(req.email.as_deref()).map(normalize::email);
        let name = normalize::supplied(req.name.as_deref()).map(normalize::text);
        if let Some(email) = &email {
            validate_email(email)?;
            self.ensure_email_free(ctx, email, Some(req.id)).await?;
        }
        let updated = ctx.run(self.repo.update(ctx, &UpdateUserRequest { id: req.id, email, name })).await?;
        info!(user_id = updated.id, "user_updated");
        Ok(updated)
    }

    #[instrument(skip(self, ctx))]
    pub async fn delete_by_id(&self, ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
        normalize::require_positive("user ID", id)?;
        ctx.run(self.repo.delete(ctx, id)).await?;
        info!(user_id = id, "user_deleted");
        Ok(())
    }

    async fn ensure_email_free(&self, ctx: &CallContext, email: &str, owner: Option<i64>) -> Result<(), ServiceError> {
        match ctx.run(self.repo.get_by_email(ctx, email)).await {
            Ok(existing) if Some(existing.id) == owner => Ok(()),
            Ok(existing) => Err(ServiceError::Conflict(format!("email is already used by user {}", existing.id))),
            Err(ServiceError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
