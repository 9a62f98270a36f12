use models::errors::ModelError;
use thiserror::Error;

/// Business errors raised by the catalog engine.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("deletion blocked: {0}")]
    DeletionBlocked(String),
    #[error("database error: {0}")]
    Db(String),
}

impl CatalogError {
    pub fn not_found(label: &str) -> Self { Self::NotFound(format!("{label} not found")) }

    pub fn name_taken(label: &str) -> Self { Self::Conflict(format!("{label} with this name already exists")) }

    pub fn deletion_blocked(label: &str) -> Self {
        Self::DeletionBlocked(format!(
            "You cannot delete a {} with associated accounts. Please deactivate it instead.",
            label.to_lowercase()
        ))
    }

    /// Translate a model-layer failure for the given entity kind. Constraint
    /// violations become the same errors the engine's own checks produce.
    pub fn from_model(label: &str, e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => Self::Validation(msg),
            ModelError::Conflict(_) => Self::name_taken(label),
            ModelError::Referenced(_) => Self::deletion_blocked(label),
            ModelError::Db(msg) => Self::Db(msg),
        }
    }

    /// Caller-facing message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::Conflict(m) | Self::DeletionBlocked(m) | Self::Db(m) => m,
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation(_) => 2001,
            Self::NotFound(_) => 2002,
            Self::Conflict(_) => 2003,
            Self::DeletionBlocked(_) => 2004,
            Self::Db(_) => 2100,
        }
    }
}

pub(crate) fn db_err(e: sea_orm::DbErr) -> CatalogError { CatalogError::Db(e.to_string()) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violations_map_to_business_errors() {
        let e = CatalogError::from_model("Service", ModelError::Conflict("uniq_service_owner_name".into()));
        assert_eq!(e.message(), "Service with this name already exists");
        let e = CatalogError::from_model("Provider", ModelError::Referenced("fk_account_provider".into()));
        assert!(matches!(e, CatalogError::DeletionBlocked(_)));
        assert!(e.message().contains("delete a provider"));
    }

    #[test]
    fn codes_are_distinct() {
        let all = [
            CatalogError::Validation(String::new()),
            CatalogError::not_found("Provider"),
            CatalogError::name_taken("Provider"),
            CatalogError::deletion_blocked("Provider"),
            CatalogError::Db(String::new()),
        ];
        let mut codes: Vec<u16> = all.iter().map(CatalogError::code).collect();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
