use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service::user::domain::{CreateUserRequest, UpdateUserRequest, User};

use crate::errors::JsonApiError;
use crate::state::{RequestScope, Users};

pub async fn create(
    State(svc): State<Users>,
    State(scope): State<RequestScope>,
    Json(input): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), JsonApiError> {
    let user = svc.create(&scope.context(), input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list(State(svc): State<Users>, State(scope): State<RequestScope>) -> Result<Json<Vec<User>>, JsonApiError> {
    Ok(Json(svc.get_all(&scope.context()).await?))
}

pub async fn get_by_id(
    State(svc): State<Users>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
) -> Result<Json<User>, JsonApiError> {
    Ok(Json(svc.get_by_id(&scope.context(), id).await?))
}

pub async fn get_by_email(
    State(svc): State<Users>,
    State(scope): State<RequestScope>,
    Path(email): Path<String>,
) -> Result<Json<User>, JsonApiError> {
    Ok(Json(svc.get_by_email(&scope.context(), &email).await?))
}

pub async fn update(
    State(svc): State<Users>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateUserRequest>,
) -> Result<Json<User>, JsonApiError> {
    let req = UpdateUserRequest { id, ..input };
    Ok(Json(svc.update_by_id(&scope.context(), req).await?))
}

pub async fn delete(
    State(svc): State<Users>,
    State(scope): State<RequestScope>,
    Path(id): Path<i64>,
) -> Result<StatusCode, JsonApiError> {
    svc.delete_by_id(&scope.context(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
