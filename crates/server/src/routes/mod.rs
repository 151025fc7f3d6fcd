use axum::{
    routing::{get, MethodRouter},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::{CategoryState, StorageState, UsersState};

pub mod advertisements;
pub mod categories;
pub mod users;

fn health<S: Clone + Send + Sync + 'static>(service: &'static str) -> MethodRouter<S> {
    get(move || async move { Json(Health { status: "ok", service }) })
}

/// advertisements-storage: advertisements, search and categories.
pub fn storage_router(state: StorageState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", health("advertisements-storage"))
        .route("/api/advertisements", get(advertisements::list).post(advertisements::create))
        .route("/api/advertisements/search", get(advertisements::search))
        .route(
            "/api/advertisements/:id",
            get(advertisements::get).put(advertisements::update).delete(advertisements::delete),
        )
        .merge(categories::router());
    with_layers(api.with_state(state), cors)
}

/// category-service: category routes only.
pub fn category_router(state: CategoryState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", health("category-service"))
        .merge(categories::router());
    with_layers(api.with_state(state), cors)
}

pub fn users_router(state: UsersState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", health("users-service"))
        .route("/api/users", get(users::list).post(users::create))
        .route("/api/users/email/:email", get(users::get_by_email))
        .route("/api/users/:id", get(users::get_by_id).put(users::update).delete(users::delete));
    with_layers(api.with_state(state), cors)
}

fn with_layers(router: Router, cors: CorsLayer) -> Router {
    router.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            // 5xx
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
