//! Admin API routing configuration

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::response::render_errors;

use super::{
    handlers::{current_admin, list_admins, login, method_not_allowed, not_found},
    middleware::{AdminState, cors_layer, require_admin_token},
};

/// Create Admin API router
///
/// # Endpoints
/// - `POST /admin/login` - Exchange account and password for a token
/// - `GET /admin/admins` - Paginated admin list
/// - `GET /admin/me` - Current admin
///
/// # Authentication
/// Everything except login requires `Authorization: Bearer <token>`
pub fn create_router(state: AdminState) -> Router {
    // Guard the method handlers only; unsupported methods answer 405 first
    let guard = middleware::from_fn_with_state(state.clone(), require_admin_token);

    let admin_routes = Router::new()
        .route("/login", post(login).fallback(method_not_allowed))
        .route(
            "/admins",
            get(list_admins)
                .route_layer(guard.clone())
                .fallback(method_not_allowed),
        )
        .route(
            "/me",
            get(current_admin)
                .route_layer(guard)
                .fallback(method_not_allowed),
        );

    Router::new()
        .nest("/admin", admin_routes)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.settings.clone(),
            render_errors,
        ))
        .layer(cors_layer())
        .with_state(state)
}
