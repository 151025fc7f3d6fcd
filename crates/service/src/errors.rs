use std::fmt::Display;

use models::errors::ModelError;
use thiserror::Error;

/// Error kinds surfaced by the orchestrators and the repository ports.
///
/// `Validation` and `Conflict` are raised by the orchestrators themselves;
/// everything else comes out of a port and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("call cancelled")]
    Cancelled,
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("repository error: {0}")]
    Repository(String),
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

    pub fn not_found(entity: &str, key: impl Display) -> Self {
        Self::NotFound(format!("{} {} not found", entity, key))
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::Conflict(_) => 1002,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Cancelled => 1101,
            ServiceError::DeadlineExceeded => 1102,
            ServiceError::Repository(_) => 1200,
            ServiceError::Upstream(_) => 1201,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::NotFound(entity) => ServiceError::NotFound(format!("{} not found", entity)),
            ModelError::Constraint(msg) => ServiceError::Conflict(msg),
            ModelError::Db(msg) => ServiceError::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_errors_map_to_service_kinds() {
        assert_eq!(ServiceError::from(ModelError::NotFound("category")), ServiceError::NotFound("category not found".into()));
        assert!(matches!(ServiceError::from(ModelError::Constraint("dup".into())), ServiceError::Conflict(_)));
        assert!(matches!(ServiceError::from(ModelError::Db("io".into())), ServiceError::Repository(_)));
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            ServiceError::validation("x"),
            ServiceError::Conflict("x".into()),
            ServiceError::not_found("category", 1),
            ServiceError::Cancelled,
            ServiceError::DeadlineExceeded,
            ServiceError::Repository("x".into()),
            ServiceError::Upstream("x".into()),
        ];
        let mut codes: Vec<u16> = all.iter().map(ServiceError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
