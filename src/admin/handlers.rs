//! Admin API HTTP handlers

use std::collections::HashMap;

use axum::{
    Extension,
    extract::{OriginalUri, Query, State},
    response::Response,
};

use crate::auth::AdminClaims;
use crate::response::{Abort, ApiError, Payload, Responder, ValidatedJson};

use super::middleware::AdminState;
use super::types::{AdminResource, LoginRequest, LoginResponse, PageQuery};

/// POST /admin/login
pub async fn login(
    responder: Responder,
    State(state): State<AdminState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let account = payload.account.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    tracing::info!(account = %account, "Admin login attempt");

    match state.service.attempt(&account, &password).await? {
        Some(token) => {
            let data = Payload::json(&LoginResponse { token }).map_err(anyhow::Error::from)?;
            Ok(responder.success(data, ""))
        }
        None => Err(responder.error_unauthorized("").into()),
    }
}

/// GET /admin/admins?page=&per_page=
pub async fn list_admins(
    responder: Responder,
    State(state): State<AdminState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let query = PageQuery::from_params(&params, state.pagination);
    tracing::info!(page = query.page, per_page = query.per_page, "Listing admins");

    let page = state.service.search_list(query).await?.with_path(uri.path());
    Ok(responder.success(page, ""))
}

/// GET /admin/me
pub async fn current_admin(
    responder: Responder,
    State(state): State<AdminState>,
    Extension(claims): Extension<AdminClaims>,
) -> Result<Response, ApiError> {
    let id = claims.admin_id().ok_or_else(ApiError::unauthenticated)?;
    tracing::info!(admin_id = id, "Fetching current admin");

    let admin = state.service.find(id).await?;
    Ok(responder.success(Payload::resource(AdminResource(admin)), ""))
}

/// Known route, unsupported method
pub async fn method_not_allowed(responder: Responder) -> Abort {
    responder.error_method_not_allowed("")
}

/// Unknown route
pub async fn not_found() -> ApiError {
    ApiError::not_found()
}
