//! Failure mapping
//!
//! Handlers, extractors and middleware fail with [`ApiError`]. Its
//! `IntoResponse` impl only tags a placeholder response; [`render_errors`]
//! then re-expresses the failure through the envelope using the live
//! settings.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::resource::ResourceContext;
use super::responder::Responder;
use super::types::ResponseSettings;

/// Default message for authentication failures
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated.";

/// A finished response raised before the handler returns normally
pub struct Abort(Response);

impl Abort {
    pub fn new(response: Response) -> Self {
        Self(response)
    }

    pub fn into_inner(self) -> Response {
        self.0
    }
}

impl fmt::Debug for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Abort").field(&self.0.status()).finish()
    }
}

impl IntoResponse for Abort {
    fn into_response(self) -> Response {
        self.0
    }
}

/// Field-level validation messages, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    /// Record the standard message when a required string is missing or blank
    pub fn require(&mut self, field: &str, value: Option<&str>) {
        if value.is_none_or(|v| v.trim().is_empty()) {
            self.add(field, format!("The {} field is required.", field.replace('_', " ")));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First message of the first failing field
    pub fn first_message(&self) -> Option<&str> {
        self.fields
            .first()
            .and_then(|(_, messages)| messages.first())
            .map(String::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    /// `{field: [messages...]}`
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(field, messages)| (field.clone(), json!(messages)))
            .collect();
        Value::Object(map)
    }

    /// `Ok` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first_message().unwrap_or("The given data was invalid."))
    }
}

impl std::error::Error for ValidationErrors {}

/// Request payloads with field rules
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// JSON body extractor that runs [`Validate`]
///
/// An empty body counts as `{}` so missing fields surface as validation
/// messages. Malformed JSON and type mismatches are 400 failures.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::http(e.status(), e.body_text()))?;

        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(&body).map_err(|e| {
                ApiError::http(StatusCode::BAD_REQUEST, format!("Malformed JSON body: {}", e))
            })?
        };

        let payload: T = serde_json::from_value(value).map_err(|e| {
            ApiError::http(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
        })?;
        payload.validate().map_err(ApiError::Validation)?;

        Ok(ValidatedJson(payload))
    }
}

/// HTTP boundary error
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid credentials
    Unauthenticated(String),

    /// Request payload failed its rules
    Validation(ValidationErrors),

    /// Failure that already knows its HTTP status
    Http { status: StatusCode, message: String },

    /// Anything unexpected
    Internal(anyhow::Error),

    /// A finished response raised early
    Abort(Abort),
}

impl ApiError {
    pub fn unauthenticated() -> Self {
        ApiError::Unauthenticated(UNAUTHENTICATED_MESSAGE.to_string())
    }

    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError::Http {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::http(StatusCode::NOT_FOUND, "Not Found")
    }

    /// Get corresponding HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Http { status, .. } => *status,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Abort(abort) => abort.0.status(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Validation(errors) => write!(f, "Validation failed: {}", errors),
            ApiError::Http { status, message } => write!(f, "HTTP {}: {}", status, message),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
            ApiError::Abort(abort) => write!(f, "Aborted with {}", abort.0.status()),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            ApiError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<Abort> for ApiError {
    fn from(abort: Abort) -> Self {
        ApiError::Abort(abort)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let unhandled = match self {
            ApiError::Abort(abort) => return abort.into_response(),
            ApiError::Unauthenticated(message) => UnhandledError {
                kind: ErrorKind::Unauthenticated,
                status: StatusCode::UNAUTHORIZED,
                message,
                errors: Value::Null,
                trace: Vec::new(),
            },
            ApiError::Validation(errors) => UnhandledError {
                kind: ErrorKind::Validation,
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: errors.to_string(),
                errors: errors.to_value(),
                trace: Vec::new(),
            },
            ApiError::Http { status, message } => UnhandledError {
                kind: ErrorKind::Http,
                status,
                message,
                errors: Value::Null,
                trace: Vec::new(),
            },
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "Unhandled internal error");
                UnhandledError {
                    kind: ErrorKind::Internal,
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: e.to_string(),
                    errors: Value::Null,
                    trace: e.chain().skip(1).map(ToString::to_string).collect(),
                }
            }
        };

        let mut response = unhandled.plain_response();
        response.extensions_mut().insert(unhandled);
        response
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    Unauthenticated,
    Validation,
    Http,
    Internal,
}

impl ErrorKind {
    fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "AuthenticationError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Http => "HttpError",
            ErrorKind::Internal => "InternalError",
        }
    }
}

/// Failure waiting to be rendered, carried in response extensions
#[derive(Debug, Clone)]
struct UnhandledError {
    kind: ErrorKind,
    status: StatusCode,
    message: String,
    errors: Value,
    trace: Vec<String>,
}

impl UnhandledError {
    /// Body used when the envelope is switched off
    fn plain_response(&self) -> Response {
        let body = match self.kind {
            ErrorKind::Internal => "Internal Server Error".to_string(),
            _ => self.message.clone(),
        };
        (self.status, body).into_response()
    }

    /// Structured dump for the `errors` field
    fn dump(&self, debug: bool) -> Value {
        if debug {
            json!({
                "message": self.message,
                "exception": self.kind.as_str(),
                "trace": self.trace,
            })
        } else if self.kind == ErrorKind::Internal {
            json!({ "message": "Server Error" })
        } else {
            json!({ "message": self.message })
        }
    }

    fn render(self, responder: &Responder, fallback: Response) -> Response {
        let settings = responder.settings();
        match self.kind {
            ErrorKind::Unauthenticated => responder.error_unauthorized(&self.message).into_response(),
            ErrorKind::Validation => responder
                .fail(&self.message, self.status, Some(self.errors))
                .into_response(),
            ErrorKind::Http | ErrorKind::Internal if settings.is_unified_return_json => {
                let message = if self.kind == ErrorKind::Internal && !settings.debug {
                    ""
                } else {
                    self.message.as_str()
                };
                responder
                    .error(message, self.status, Some(self.dump(settings.debug)))
                    .into_response()
            }
            ErrorKind::Http | ErrorKind::Internal => fallback,
        }
    }
}

/// Render tagged failures through the envelope
pub async fn render_errors(
    State(settings): State<Arc<ResponseSettings>>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = ResourceContext {
        method: request.method().clone(),
        uri: request
            .extensions()
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| request.uri().clone()),
    };

    let mut response = next.run(request).await;
    let Some(unhandled) = response.extensions_mut().remove::<UnhandledError>() else {
        return response;
    };

    tracing::debug!(
        status = %unhandled.status,
        kind = unhandled.kind.as_str(),
        path = %ctx.uri.path(),
        "Rendering failure"
    );

    let responder = Responder::new(settings).with_context(ctx);
    unhandled.render(&responder, response)
}
