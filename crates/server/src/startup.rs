use std::sync::Arc;

use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::advertisement::AdvertisementService;
use service::category::CategoryService;
use service::repo::{
    RemoteCategoryRepository, SeaOrmAdvertisementRepository, SeaOrmCategoryRepository, SeaOrmSearchRepository,
    SeaOrmUserRepository,
};
use service::search::SearchService;
use service::user::UserService;

use crate::errors::StartupError;
use crate::routes;
use crate::state::{CategoryState, RequestScope, StorageState, UsersState};

/// The three deployables built from this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    AdvertisementsStorage,
    CategoryService,
    UsersService,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::AdvertisementsStorage => "advertisements-storage",
            ServiceKind::CategoryService => "category-service",
            ServiceKind::UsersService => "users-service",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::AdvertisementsStorage => 8000,
            ServiceKind::CategoryService => 8001,
            ServiceKind::UsersService => 8002,
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn connect_and_migrate(cfg: &AppConfig) -> Result<DatabaseConnection, StartupError> {
    cfg.database.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Database(format!("migration failed: {}", e)))?;
    info!(event = "migrations_applied", "database schema up to date");
    Ok(db)
}

pub fn storage_state(db: DatabaseConnection, scope: RequestScope) -> StorageState {
    let categories = Arc::new(SeaOrmCategoryRepository { db: db.clone() });
    let users = Arc::new(SeaOrmUserRepository { db: db.clone() });
    let ads = Arc::new(SeaOrmAdvertisementRepository { db: db.clone() });
    StorageState {
        advertisements: Arc::new(AdvertisementService::new(ads, categories.clone(), users)),
        categories: Arc::new(CategoryService::new(categories)),
        search: Arc::new(SearchService::new(Arc::new(SeaOrmSearchRepository { db }))),
        scope,
    }
}

/// Build the router for `kind` from configuration. Request contexts derive
/// from `requests`.
pub async fn build_app(kind: ServiceKind, cfg: &AppConfig, requests: CancellationToken) -> Result<Router, StartupError> {
    let scope = RequestScope::new(requests, cfg.server.request_timeout());
    let cors = build_cors();
    let app = match kind {
        ServiceKind::AdvertisementsStorage => {
            let db = connect_and_migrate(cfg).await?;
            routes::storage_router(storage_state(db, scope), cors)
        }
        ServiceKind::CategoryService => {
            cfg.storage.validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
            let remote = RemoteCategoryRepository::new(cfg.storage.addr.clone(), cfg.storage.timeout())?;
            info!(storage = %remote.base_url(), "category port points at storage");
            let state = CategoryState { categories: Arc::new(CategoryService::new(Arc::new(remote))), scope };
            routes::category_router(state, cors)
        }
        ServiceKind::UsersService => {
            let db = connect_and_migrate(cfg).await?;
            let state = UsersState { users: Arc::new(UserService::new(Arc::new(SeaOrmUserRepository { db }))), scope };
            routes::users_router(state, cors)
        }
    };
    Ok(app)
}

/// Bind, serve and drain in-flight requests once `shutdown` is cancelled.
pub async fn run(kind: ServiceKind, cfg: AppConfig, shutdown: CancellationToken) -> Result<(), StartupError> {
    let requests = CancellationToken::new();
    let app = build_app(kind, &cfg, requests.clone()).await?;

    let addr = cfg.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {}: {}", addr, e)))?;
    info!(service = kind.name(), %addr, "listening");

    serve(listener, app, shutdown, requests).await?;
    info!(service = kind.name(), "http server drained");
    Ok(())
}

/// Serve until `shutdown` fires, let in-flight requests finish, then cancel
/// `requests` so nothing outlives the server.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
    requests: CancellationToken,
) -> Result<(), StartupError> {
    let res = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;
    requests.cancel();
    res.map_err(|e| StartupError::Any(e.into()))
}
