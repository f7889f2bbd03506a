//! Response formatter
//!
//! Every handler answer goes through [`Responder`], which turns a
//! [`Payload`] plus a message and status code into an [`Envelope`] and an
//! HTTP response.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{HeaderValue, header, request::Parts},
    response::{IntoResponse, Response},
};
use http::StatusCode;
use serde_json::{Map, Value, json};

use super::error::Abort;
use super::merge::{merge_all, merge_recursive};
use super::paginator::pagination_meta;
use super::resource::{JsonResource, Payload, ResourceCollection, ResourceContext};
use super::types::{Envelope, ResponseSettings, Status};

/// Envelope formatter bound to the current settings and request
#[derive(Clone)]
pub struct Responder {
    settings: Arc<ResponseSettings>,
    ctx: ResourceContext,
}

impl Responder {
    pub fn new(settings: Arc<ResponseSettings>) -> Self {
        Self {
            settings,
            ctx: ResourceContext::default(),
        }
    }

    pub fn with_context(mut self, ctx: ResourceContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn settings(&self) -> &ResponseSettings {
        &self.settings
    }

    /// 200 response for any payload
    pub fn success(&self, data: impl Into<Payload>, message: &str) -> Response {
        self.success_with_status(data, message, StatusCode::OK)
    }

    /// Success-path response with an explicit status code
    ///
    /// Dispatches on the payload variant.
    pub fn success_with_status(
        &self,
        data: impl Into<Payload>,
        message: &str,
        code: StatusCode,
    ) -> Response {
        match data.into() {
            Payload::Collection(collection) => self.format_collection(&collection, message, code),
            Payload::Resource(resource) => self.format_resource(resource.as_ref(), message, code),
            Payload::Paginated(array) => self.format_paginated(&array, message, code),
            Payload::Plain(value) => {
                let envelope = self.format_data(wrap_plain(value), message, code, None);
                self.respond(&envelope, code)
            }
        }
    }

    /// 201 with an optional `Location` header
    pub fn created(
        &self,
        data: impl Into<Payload>,
        message: &str,
        location: Option<&str>,
    ) -> Response {
        let response = self.success_with_status(data, message, StatusCode::CREATED);
        with_location(response, location)
    }

    /// 202 with an optional `Location` header
    pub fn accepted(
        &self,
        data: impl Into<Payload>,
        message: &str,
        location: Option<&str>,
    ) -> Response {
        let response = self.success_with_status(data, message, StatusCode::ACCEPTED);
        with_location(response, location)
    }

    pub fn no_content(&self, message: &str) -> Response {
        self.success_with_status(Payload::empty(), message, StatusCode::NO_CONTENT)
    }

    /// Client failure, 400 unless told otherwise
    ///
    /// Without error detail the response is raised as an [`Abort`].
    pub fn fail(
        &self,
        message: &str,
        code: StatusCode,
        errors: Option<Value>,
    ) -> Result<Response, Abort> {
        self.error(message, code, errors)
    }

    /// Error response
    ///
    /// Without error detail the response is raised as an [`Abort`]
    /// instead of being returned.
    pub fn error(
        &self,
        message: &str,
        code: StatusCode,
        errors: Option<Value>,
    ) -> Result<Response, Abort> {
        let has_detail = errors.is_some();
        let envelope = self.format_data(Value::Null, message, code, errors);
        let response = self.respond(&envelope, code);

        if has_detail {
            Ok(response)
        } else {
            Err(Abort::new(response))
        }
    }

    pub fn error_unauthorized(&self, message: &str) -> Abort {
        self.abort(message, StatusCode::UNAUTHORIZED)
    }

    pub fn error_forbidden(&self, message: &str) -> Abort {
        self.abort(message, StatusCode::FORBIDDEN)
    }

    pub fn error_not_found(&self, message: &str) -> Abort {
        self.abort(message, StatusCode::NOT_FOUND)
    }

    pub fn error_method_not_allowed(&self, message: &str) -> Abort {
        self.abort(message, StatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn error_unprocessable_entity(&self, message: &str) -> Abort {
        self.abort(message, StatusCode::UNPROCESSABLE_ENTITY)
    }

    /// Build the envelope for already-shaped data
    pub fn format_data(
        &self,
        data: Value,
        message: &str,
        code: StatusCode,
        errors: Option<Value>,
    ) -> Envelope {
        let status = Status::classify(code);
        let (default_message, business_code) = self.settings.default_message(status);

        Envelope {
            status,
            code: business_code.unwrap_or_else(|| code.as_u16().to_string()),
            message: if message.is_empty() {
                default_message
            } else {
                message.to_string()
            },
            data: or_empty_object(data),
            errors: or_empty_object(errors.unwrap_or(Value::Null)),
        }
    }

    fn abort(&self, message: &str, code: StatusCode) -> Abort {
        let envelope = self.format_data(Value::Null, message, code, None);
        Abort::new(self.respond(&envelope, code))
    }

    fn format_paginated(
        &self,
        array: &Map<String, Value>,
        message: &str,
        code: StatusCode,
    ) -> Response {
        let list = array.get("data").cloned().unwrap_or_else(|| json!([]));
        let data = merge_recursive(json!({ "list": list }), pagination_meta(array));

        let envelope = self.format_data(data, message, code, None);
        self.respond(&envelope, code)
    }

    fn format_resource(
        &self,
        resource: &dyn JsonResource,
        message: &str,
        code: StatusCode,
    ) -> Response {
        let data = merge_all([
            resource.to_json(&self.ctx),
            resource.with(&self.ctx),
            resource.additional(),
        ]);

        let envelope = self.format_data(data, message, code, None);
        let mut response = self.respond(&envelope, code);
        resource.with_response(&self.ctx, &mut response);
        response
    }

    fn format_collection(
        &self,
        collection: &ResourceCollection,
        message: &str,
        code: StatusCode,
    ) -> Response {
        let mut data = merge_all([
            json!({ "data": collection.resolve(&self.ctx) }),
            collection.context_data(&self.ctx),
            collection.extra().clone(),
        ]);
        if let Some(pagination) = collection.pagination() {
            data = merge_recursive(data, pagination_meta(pagination));
        }

        let envelope = self.format_data(data, message, code, None);
        let mut response = self.respond(&envelope, code);
        collection.apply_response(&self.ctx, &mut response);
        response
    }

    /// Serialize the envelope; non-RESTful mode always answers 200
    fn respond(&self, envelope: &Envelope, code: StatusCode) -> Response {
        let status = if self.settings.is_restful {
            code
        } else {
            StatusCode::OK
        };
        (status, Json(envelope)).into_response()
    }
}

impl<S> FromRequestParts<S> for Responder
where
    Arc<ResponseSettings>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        Ok(Responder::new(Arc::<ResponseSettings>::from_ref(state)).with_context(ResourceContext {
            method: parts.method.clone(),
            uri,
        }))
    }
}

fn with_location(mut response: Response, location: Option<&str>) -> Response {
    if let Some(location) = location.filter(|l| !l.is_empty()) {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                response.headers_mut().insert(header::LOCATION, value);
            }
            Err(e) => tracing::warn!(location, error = %e, "Ignoring invalid Location header"),
        }
    }
    response
}

/// Empty values (null, false, 0, "", [], {}) count as no data
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn or_empty_object(value: Value) -> Value {
    if is_empty_value(&value) {
        Value::Object(Map::new())
    } else {
        value
    }
}

/// Plain data is always a list or an object on the wire
fn wrap_plain(value: Value) -> Value {
    match value {
        value if is_empty_value(&value) => Value::Object(Map::new()),
        value @ (Value::Array(_) | Value::Object(_)) => value,
        scalar => Value::Array(vec![scalar]),
    }
}
