use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service::advertisement::domain::{
    Advertisement, CreateAdvertisementRequest, DeleteAdvertisementResponse, UpdateAdvertisementRequest,
};
use service::search::domain::SearchAdvertisementByTitleRequest;

use crate::errors::JsonApiError;
use crate::state::{Advertisements, RequestScope, Search};

pub async fn create(
    State(svc): State<Advertisements>,
    State(scope): State<RequestScope>,
    Json(input): Json<CreateAdvertisementRequest>,
) -> Result<(StatusCode, Json<Advertisement>), JsonApiError> {
    let ad = svc.create(&scope.context(), input).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

pub async fn list(
    State(svc): State<Advertisements>,
    State(scope): State<RequestScope>,
) -> Result<Json<Vec<Advertisement>>, JsonApiError> {
    Ok(Json(svc.get_all(&scope.context()).await?))
}

pub async fn get(
    State(svc): State<Advertisements>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
) -> Result<Json<Advertisement>, JsonApiError> {
    Ok(Json(svc.get_by_id(&scope.context(), id).await?))
}

/// The path id wins over any `id` in the body.
pub async fn update(
    State(svc): State<Advertisements>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateAdvertisementRequest>,
) -> Result<Json<Advertisement>, JsonApiError> {
    let req = UpdateAdvertisementRequest { id, ..input };
    Ok(Json(svc.update_by_id(&scope.context(), req).await?))
}

pub async fn delete(
    State(svc): State<Advertisements>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteAdvertisementResponse>, JsonApiError> {
    Ok(Json(svc.delete_by_id(&scope.context(), id).await?))
}

/// `GET /api/advertisements/search?title=`
pub async fn search(
    State(svc): State<Search>,
    State(scope): State<RequestScope>,
    Query(q): Query<SearchAdvertisementByTitleRequest>,
) -> Result<Json<Vec<Advertisement>>, JsonApiError> {
    Ok(Json(svc.search_by_title(&scope.context(), q).await?))
}
