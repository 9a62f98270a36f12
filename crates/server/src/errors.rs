use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog::errors::CatalogError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error body shared by every endpoint: `{ "error", "detail", "code" }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
    pub code: Option<u16>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail, code: None }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(detail.into()))
    }
}

impl From<CatalogError> for JsonApiError {
    fn from(e: CatalogError) -> Self {
        let (status, title) = match &e {
            CatalogError::Validation(_) => (StatusCode::BAD_REQUEST, "Validation Error"),
            CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            CatalogError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            CatalogError::DeletionBlocked(_) => (StatusCode::CONFLICT, "Deletion Blocked"),
            CatalogError::Db(msg) => {
                error!(err = %msg, "catalog storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };
        Self::new(status, title, Some(e.message().to_string())).with_code(e.code())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.title, detail: self.detail.as_deref(), code: self.code };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("listener failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_http_status() {
        let cases = [
            (CatalogError::Validation("name must not be empty".into()), StatusCode::BAD_REQUEST),
            (CatalogError::not_found("Service"), StatusCode::NOT_FOUND),
            (CatalogError::name_taken("Service"), StatusCode::CONFLICT),
            (CatalogError::deletion_blocked("Service"), StatusCode::CONFLICT),
            (CatalogError::Db("connection reset".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (e, status) in cases {
            let code = e.code();
            let api = JsonApiError::from(e);
            assert_eq!(api.status, status);
            assert_eq!(api.code, Some(code));
        }
    }

    #[test]
    fn detail_carries_the_business_message() {
        let api = JsonApiError::from(CatalogError::not_found("Provider"));
        assert_eq!(api.detail.as_deref(), Some("Provider not found"));
        assert_eq!(api.title, "Not Found");
    }
}
