//! Uniform JSON response layer
//!
//! Every answer, success or failure, leaves the service as an envelope:
//!
//! ```json
//! {"status": "success", "code": "200000", "message": "Success", "data": {}, "errors": {}}
//! ```
//!
//! - [`Responder`] formats handler results
//! - [`ApiError`] plus the [`render_errors`] layer format failures
//! - [`Paginator`] and [`JsonResource`] shape list and resource payloads

pub mod error;
pub mod merge;
pub mod paginator;
pub mod resource;
pub mod responder;
pub mod types;

pub use error::{Abort, ApiError, Validate, ValidatedJson, ValidationErrors, render_errors};
pub use paginator::Paginator;
pub use resource::{JsonResource, Payload, ResourceCollection, ResourceContext};
pub use responder::Responder;
pub use types::{Envelope, ResponseSettings, Status};

#[cfg(test)]
pub(crate) async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
