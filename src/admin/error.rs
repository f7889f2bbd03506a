//! Admin API error type definitions

use std::fmt;

use axum::http::StatusCode;

use crate::auth::TokenError;
use crate::response::ApiError;
use crate::store::StoreError;

/// Admin service error types
#[derive(Debug)]
pub enum AdminServiceError {
    /// Account not found (by ID)
    NotFound { id: i64 },

    /// Token rejected
    Token(TokenError),

    /// Storage failure
    Store(StoreError),
}

impl fmt::Display for AdminServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminServiceError::NotFound { id } => write!(f, "Admin not found: {}", id),
            AdminServiceError::Token(e) => write!(f, "{}", e),
            AdminServiceError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AdminServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminServiceError::NotFound { .. } => None,
            AdminServiceError::Token(e) => Some(e),
            AdminServiceError::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for AdminServiceError {
    fn from(e: StoreError) -> Self {
        AdminServiceError::Store(e)
    }
}

impl From<TokenError> for AdminServiceError {
    fn from(e: TokenError) -> Self {
        AdminServiceError::Token(e)
    }
}

impl AdminServiceError {
    /// Get corresponding HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            AdminServiceError::Token(TokenError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminServiceError::Token(_) => StatusCode::UNAUTHORIZED,
            AdminServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AdminServiceError> for ApiError {
    fn from(e: AdminServiceError) -> Self {
        match e.status_code() {
            StatusCode::UNAUTHORIZED => {
                tracing::debug!(error = %e, "Rejected admin token");
                ApiError::unauthenticated()
            }
            StatusCode::INTERNAL_SERVER_ERROR => ApiError::Internal(anyhow::Error::new(e)),
            status => ApiError::http(status, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_http() {
        let err: ApiError = AdminServiceError::NotFound { id: 7 }.into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP 404 Not Found: Admin not found: 7");
    }

    #[test]
    fn test_token_rejection_maps_to_unauthenticated() {
        let err: ApiError = AdminServiceError::Token(TokenError::WrongRole("user".into())).into();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[test]
    fn test_store_failure_is_internal() {
        let err: ApiError = AdminServiceError::Store(StoreError::Database(sqlx::Error::RowNotFound)).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
