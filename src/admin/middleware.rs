//! Admin API middleware

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{FromRef, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::common::auth::extract_bearer_token;
use crate::response::{ApiError, ResponseSettings};

use super::service::AdminService;
use super::types::PaginationSettings;

/// Admin API shared state
#[derive(Clone)]
pub struct AdminState {
    pub service: Arc<AdminService>,
    pub settings: Arc<ResponseSettings>,
    pub pagination: PaginationSettings,
}

impl AdminState {
    pub fn new(
        service: AdminService,
        settings: ResponseSettings,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
            pagination,
        }
    }
}

impl FromRef<AdminState> for Arc<ResponseSettings> {
    fn from_ref(state: &AdminState) -> Self {
        state.settings.clone()
    }
}

/// Bearer token guard
///
/// Verified claims are stored in the request extensions for handlers.
pub async fn require_admin_token(
    State(state): State<AdminState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).ok_or_else(ApiError::unauthenticated)?;
    let claims = state.service.authenticate(token)?;

    tracing::debug!(admin_id = %claims.sub, "Admin token accepted");
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// CORS middleware layer
pub fn cors_layer() -> tower_http::cors::CorsLayer {
    use tower_http::cors::{Any, CorsLayer};

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
