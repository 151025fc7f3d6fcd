use async_trait::async_trait;

use super::domain::{CreateUserRequest, UpdateUserRequest, User};
use crate::context::CallContext;
use crate::errors::ServiceError;

/// Persistence port for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, ctx: &CallContext, req: &CreateUserRequest) -> Result<User, ServiceError>;
    async fn get_by_id(&self, ctx: &CallContext, id: i64) -> Result<User, ServiceError>;
    async fn get_by_email(&self, ctx: &CallContext, email: &str) -> Result<User, ServiceError>;
    async fn get_all(&self, ctx: &CallContext) -> Result<Vec<User>, ServiceError>;
    async fn update(&self, ctx: &CallContext, req: &UpdateUserRequest) -> Result<User, ServiceError>;
    async fn delete(&self, ctx: &CallContext, id: i64) -> Result<(), ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserRepository {
        rows: Mutex<BTreeMap<i64, User>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MockUserRepository {
        pub fn insert_with_id(&self, id: i64, email: &str, name: &str) -> User {
            let now = Utc::now();
            let row = User { id, email: email.to_string(), name: name.to_string(), created_at: now, updated_at: now };
            self.rows.lock().unwrap_or_else(|e| e.into_inner()).insert(id, row.clone());
            row
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }

        pub fn call_count(&self, op: &str) -> usize {
            self.calls().iter().filter(|c| **c == op).count()
        }

        fn record(&self, op: &'static str) {
            self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(op);
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create(&self, _ctx: &CallContext, req: &CreateUserRequest) -> Result<User, ServiceError> {
            self.record("create");
            let id = {
                let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
                if rows.values().any(|u| u.email == req.email) {
                    return Err(ServiceError::Conflict(format!("duplicate email {}", req.email)));
                }
                rows.keys().next_back().copied().unwrap_or(0) + 1
            };
            Ok(self.insert_with_id(id, &req.email, &req.name))
        }

        async fn get_by_id(&self, _ctx: &CallContext, id: i64) -> Result<User, ServiceError> {
            self.record("get_by_id");
            let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.get(&id).cloned().ok_or_else(|| ServiceError::not_found("user", id))
        }

        async fn get_by_email(&self, _ctx: &CallContext, email: &str) -> Result<User, ServiceError> {
            self.record("get_by_email");
            let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.values()
                .find(|u| u.email == email)
                .cloned()
                .ok_or_else(|| ServiceError::not_found("user", email))
        }

        async fn get_all(&self, _ctx: &CallContext) -> Result<Vec<User>, ServiceError> {
            self.record("get_all");
            Ok(self.rows.lock().unwrap_or_else(|e| e.into_inner()).values().cloned().collect())
        }

        async fn update(&self, _ctx: &CallContext, req: &UpdateUserRequest) -> Result<User, ServiceError> {
            self.record("update");
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            let row = rows.get_mut(&req.id).ok_or_else(|| ServiceError::not_found("user", req.id))?;
            if let Some(email) = &req.email { row.email = email.clone(); }
            if let Some(name) = &req.name { row.name = name.clone(); }
            row.updated_at = Utc::now();
            Ok(row.clone())
        }

        async fn delete(&self, _ctx: &CallContext, id: i64) -> Result<(), ServiceError> {
            self.record("delete");
            let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
            rows.remove(&id).map(|_| ()).ok_or_else(|| ServiceError::not_found("user", id))
        }
    }
}
