use async_trait::async_trait;

use super::domain::{Advertisement, CreateAdvertisementRequest, UpdateAdvertisementRequest};
use crate::context::CallContext;
use crate::errors::ServiceError;

/// Persistence port for advertisements. Requests arrive already validated
/// and normalized.
#[async_trait]
pub trait AdvertisementRepository: Send + Sync {
    async fn create(&self, ctx: &CallContext, req: &CreateAdvertisementRequest) -> Result<Advertisement, ServiceError>;
    async fn get_by_id(&self, ctx: &CallContext, id: i64) -> Result<Advertisement, ServiceError>;
    async fn get_all(&self, ctx: &CallContext) -> Result<Vec<Advertisement>, ServiceError>;
    async fn update(&self, ctx: &CallContext, req: &UpdateAdvertisementRequest) -> Result<Advertisement, ServiceError>;
    async fn delete(&self, ctx: &CallContext, id: i64) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAdvertisementRepository {
        rows: Mutex<BTreeMap<i64, Advertisement>>,
        calls: Mutex<Vec<&'static str>>,
        last_create: Mutex<Option<CreateAdvertisementRequest>>,
        last_update: Mutex<Option<UpdateAdvertisementRequest>>,
    }

    impl MockAdvertisementRepository {
        pub fn insert(&self, ad: Advertisement) {
            self.rows.lock().unwrap_or_else(|e| e.into_inner()).insert(ad.id, ad);
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        pub fn call_count(&self, op: &str) -> usize {
            self.calls().iter().filter(|c| **c == op).count()
        }

        /// The request most recently handed to `create`.
        pub fn last_create(&self) -> Option<CreateAdvertisementRequest> {
            self.last_create.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        /// The request most recently handed to `update`.
        pub fn last_update(&self) -> Option<UpdateAdvertisementRequest> {
            self.last_update.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        fn record(&self, op: &'static str) {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(op);
        }
    }

    #[async_trait]
    impl AdvertisementRepository for MockAdvertisementRepository {
        async fn create(&self, _ctx: &CallContext, req: &CreateAdvertisementRequest) -> Result<Advertisement, ServiceError> {
            self.record("create");
            *self.last_create.lock().unwrap_or_else(|e| e.into_inner()) = Some(req.clone());
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
            let now = Utc::now();
            let ad = Advertisement {
                id,
                title: req.title.clone(),
                description: req.description.clone(),
                price: req.price,
                currency: req.currency.clone(),
                category_id: req.category_id,
                user_id: req.user_id,
                created_at: now,
                updated_at: now,
            };
            rows.insert(id, ad.clone());
            Ok(ad)
        }

        async fn get_by_id(&self, _ctx: &CallContext, id: i64) -> Result<Advertisement, ServiceError> {
            self.record("get_by_id");
            let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.get(&id).cloned().ok_or_else(|| ServiceError::not_found("advertisement", id))
        }

        async fn get_all(&self, _ctx: &CallContext) -> Result<Vec<Advertisement>, ServiceError> {
            self.record("get_all");
            Ok(self.rows.lock().unwrap_or_else(|e| e.into_inner()).values().cloned().collect())
        }

        async fn update(&self, _ctx: &CallContext, req: &UpdateAdvertisementRequest) -> Result<Advertisement, ServiceError> {
            self.record("update");
            *self.last_update.lock().unwrap_or_else(|e| e.into_inner()) = Some(req.clone());
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            let row = rows.get_mut(&req.id).ok_or_else(|| ServiceError::not_found("advertisement", req.id))?;
            if let Some(v) = &req.title { row.title = v.clone(); }
            if let Some(v) = &req.description { row.description = v.clone(); }
            if let Some(v) = req.price { row.price = v; }
            if let Some(v) = &req.currency { row.currency = v.clone(); }
            if let Some(v) = req.category_id { row.category_id = v; }
            row.updated_at = Utc::now();
            Ok(row.clone())
        }

        async fn delete(&self, _ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
            self.record("delete");
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.remove(&id).map(|_| ()).ok_or_else(|| ServiceError::not_found("advertisement", id))
        }
    }
}
