use async_trait::async_trait;

use super::domain::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::context::CallContext;
use crate::errors::ServiceError;

/// Persistence port for categories.
///
/// Lookups report a missing row as `ServiceError::NotFound`.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, ctx: &CallContext, req: &CreateCategoryRequest) -> Result<Category, ServiceError>;
    async fn get_by_id(&self, ctx: &CallContext, id: i64) -> Result<Category, ServiceError>;
    async fn get_by_alias(&self, ctx: &CallContext, alias: &str) -> Result<Category, ServiceError>;
    async fn get_all(&self, ctx: &CallContext) -> Result<Vec<Category>, ServiceError>;
    async fn update(&self, ctx: &CallContext, req: &UpdateCategoryRequest) -> Result<Category, ServiceError>;
    async fn delete(&self, ctx: &CallContext, id: i64) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockCategoryRepository {
        rows: Mutex<BTreeMap<i64, Category>>,
        next_id: Mutex<i64>,
        calls: Mutex<Vec<&'static str>>,
        failure: Mutex<Option<ServiceError>>,
    }

    impl MockCategoryRepository {
        /// Seed a row directly, bypassing the call log.
        pub fn insert(&self, name: &str, alias: &str) -> Category {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next += 1;
            let now = Utc::now();
            let row = Category { id: *next, name: name.to_string(), alias: alias.to_string(), created_at: now, updated_at: now };
            self.rows.lock().unwrap_or_else(|e| e.into_inner()).insert(row.id, row.clone());
            row
        }

        /// Seed a row under a fixed id.
        pub fn insert_with_id(&self, id: i64, name: &str, alias: &str) -> Category {
            let now = Utc::now();
            let row = Category { id, name: name.to_string(), alias: alias.to_string(), created_at: now, updated_at: now };
            self.rows.lock().unwrap_or_else(|e| e.into_inner()).insert(id, row.clone());
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next = (*next).max(id);
            row
        }

        /// Make every subsequent call fail with `err`.
        pub fn fail_with(&self, err: ServiceError) {
            *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(err);
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        pub fn call_count(&self, op: &str) -> usize {
            self.calls().iter().filter(|c| **c == op).count()
        }

        pub fn rows(&self) -> Vec<Category> {
            self.rows.lock().unwrap_or_else(|e| e.into_inner()).values().cloned().collect()
        }

        fn record(&self, op: &'static str) -> Result<(), ServiceError> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(op);
            match self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl CategoryRepository for MockCategoryRepository {
        async fn create(&self, _ctx: &CallContext, req: &CreateCategoryRequest) -> Result<Category, ServiceError> {
            self.record("create")?;
            if self.rows().iter().any(|c| c.alias == req.alias) {
                return Err(ServiceError::Conflict(format!("duplicate alias {}", req.alias)));
            }
            Ok(self.insert(&req.name, &req.alias))
        }

        async fn get_by_id(&self, _ctx: &CallContext, id: i64) -> Result<Category, ServiceError> {
            self.record("get_by_id")?;
            let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.get(&id).cloned().ok_or_else(|| ServiceError::not_found("category", id))
        }

        async fn get_by_alias(&self, _ctx: &CallContext, alias: &str) -> Result<Category, ServiceError> {
            self.record("get_by_alias")?;
            self.rows()
                .into_iter()
                .find(|c| c.alias == alias)
                .ok_or_else(|| ServiceError::not_found("category", alias))
        }

        async fn get_all(&self, _ctx: &CallContext) -> Result<Vec<Category>, ServiceError> {
            self.record("get_all")?;
            Ok(self.rows())
        }

        async fn update(&self, _ctx: &CallContext, req: &UpdateCategoryRequest) -> Result<Category, ServiceError> {
            self.record("update")?;
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            let row = rows.get_mut(&req.id).ok_or_else(|| ServiceError::not_found("category", req.id))?;
            if let Some(name) = &req.name { row.name = name.clone(); }
            if let Some(alias) = &req.alias { row.alias = alias.clone(); }
            row.updated_at = Utc::now();
            Ok(row.clone())
        }

        async fn delete(&self, _ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
            self.record("delete")?;
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.remove(&id).map(|_| ()).ok_or_else(|| ServiceError::not_found("category", id))
        }
    }
}
