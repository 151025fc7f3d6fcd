use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use service::category::domain::{Category, CreateCategoryRequest, DeleteCategoryResponse, UpdateCategoryRequest};

use crate::errors::JsonApiError;
use crate::state::{Categories, RequestScope};

/// Category routes, mounted by both the storage and the category service.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Categories: FromRef<S>,
    RequestScope: FromRef<S>,
{
    Router::new()
        .route("/api/categories", get(list).post(create))
        .route("/api/categories/alias/:alias", get(get_by_alias))
        .route("/api/categories/:id", get(get_by_id).put(update).delete(delete))
}

pub async fn create(
    State(svc): State<Categories>,
    State(scope): State<RequestScope>,
    Json(input): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), JsonApiError> {
    let created = svc.create(&scope.context(), input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    State(svc): State<Categories>,
    State(scope): State<RequestScope>,
) -> Result<Json<Vec<Category>>, JsonApiError> {
    Ok(Json(svc.get_all(&scope.context()).await?))
}

pub async fn get_by_id(
    State(svc): State<Categories>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, JsonApiError> {
    Ok(Json(svc.get_by_id(&scope.context(), id).await?))
}

pub async fn get_by_alias(
    State(svc): State<Categories>,
    State(scope): State<RequestScope>,
    Path(alias): Path<String>,
) -> Result<Json<Category>, JsonApiError> {
    Ok(Json(svc.get_by_alias(&scope.context(), &alias).await?))
}

pub async fn update(
    State(svc): State<Categories>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateCategoryRequest>,
) -> Result<Json<Category>, JsonApiError> {
    let req = UpdateCategoryRequest { id, ..input };
    Ok(Json(svc.update_by_id(&scope.context(), req).await?))
}

pub async fn delete(
    State(svc): State<Categories>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteCategoryResponse>, JsonApiError> {
    Ok(Json(svc.delete_by_id(&scope.context(), id).await?))
}
