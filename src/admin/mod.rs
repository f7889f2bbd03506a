//! Admin API module
//!
//! # Features
//! - Password login returning a bearer token
//! - Paginated admin listing
//! - Current admin lookup
//!
//! # Usage
//! ```ignore
//! let admin_service = AdminService::new(repository, token_issuer, digest);
//! let admin_state = AdminState::new(admin_service, settings, pagination);
//! let app = create_router(admin_state);
//! ```

mod error;
mod handlers;
mod middleware;
mod router;
mod service;
pub mod types;

pub use error::AdminServiceError;
pub use middleware::AdminState;
pub use router::create_router;
pub use service::AdminService;
