use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("read-only: {0}")]
    ReadOnly(String),
    /// A unique column already holds the value.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Recover the error a coalesced cache load failed with.
    pub fn from_shared(err: Arc<ServiceError>) -> Self {
        Arc::try_unwrap(err).unwrap_or_else(|shared| (*shared).clone())
    }

    /// True for caller mistakes, as opposed to backend failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Validation(_)
                | ServiceError::NotFound(_)
                | ServiceError::ReadOnly(_)
                | ServiceError::Conflict(_)
                | ServiceError::Model(models::errors::ModelError::Validation(_))
        )
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
            return ServiceError::Conflict(detail);
        }
        match e {
            sea_orm::DbErr::RecordNotFound(msg) => ServiceError::NotFound(msg),
            sea_orm::DbErr::RecordNotUpdated => ServiceError::NotFound("record not updated".into()),
            other => ServiceError::Db(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_errors_unwrap_without_losing_variant() {
        let shared = Arc::new(ServiceError::Validation("bad".into()));
        let held = shared.clone();
        assert!(matches!(ServiceError::from_shared(shared), ServiceError::Validation(m) if m == "bad"));
        assert!(matches!(ServiceError::from_shared(held), ServiceError::Validation(_)));
    }

    #[test]
    fn db_not_updated_maps_to_not_found() {
        let e: ServiceError = sea_orm::DbErr::RecordNotUpdated.into();
        assert!(matches!(e, ServiceError::NotFound(_)));
        assert!(e.is_client_error());
        assert!(!ServiceError::Db("down".into()).is_client_error());
    }
}
