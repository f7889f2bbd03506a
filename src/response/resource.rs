//! Formatter input
//!
//! `Payload` is everything the formatter accepts: plain JSON, a paginated
//! page, a single typed resource or a collection of typed resources.

use axum::response::Response;
use http::{Method, Uri};
use serde::Serialize;
use serde_json::{Map, Value};

use super::paginator::Paginator;

/// Request details handed to resources while they render
#[derive(Debug, Clone)]
pub struct ResourceContext {
    pub method: Method,
    pub uri: Uri,
}

impl Default for ResourceContext {
    fn default() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
        }
    }
}

/// A typed value with its own JSON representation
pub trait JsonResource: Send + Sync {
    /// The resource's own serialization
    fn to_json(&self, ctx: &ResourceContext) -> Value;

    /// Request-dependent data merged next to the serialization
    fn with(&self, _ctx: &ResourceContext) -> Value {
        Value::Object(Map::new())
    }

    /// Fixed extra data merged last
    fn additional(&self) -> Value {
        Value::Object(Map::new())
    }

    /// Adjust the outgoing response
    fn with_response(&self, _ctx: &ResourceContext, _response: &mut Response) {}
}

type WithFn = Box<dyn Fn(&ResourceContext) -> Value + Send + Sync>;
type WithResponseFn = Box<dyn Fn(&ResourceContext, &mut Response) + Send + Sync>;

/// A list of resources, optionally backed by a paginator
pub struct ResourceCollection {
    items: Vec<Box<dyn JsonResource>>,
    pagination: Option<Map<String, Value>>,
    additional: Value,
    with: Option<WithFn>,
    with_response: Option<WithResponseFn>,
}

impl ResourceCollection {
    pub fn new<R, I>(items: I) -> Self
    where
        R: JsonResource + 'static,
        I: IntoIterator<Item = R>,
    {
        Self {
            items: items
                .into_iter()
                .map(|item| Box::new(item) as Box<dyn JsonResource>)
                .collect(),
            pagination: None,
            additional: Value::Object(Map::new()),
            with: None,
            with_response: None,
        }
    }

    /// Collection over one page; the page's totals are kept for the meta block
    pub fn from_paginator<R: JsonResource + 'static>(page: Paginator<R>) -> Self {
        let pagination = page.meta();
        let mut collection = Self::new(page.into_items());
        collection.pagination = Some(pagination);
        collection
    }

    /// Extra data merged after the items
    pub fn additional(mut self, additional: Value) -> Self {
        self.additional = additional;
        self
    }

    /// Request-dependent data merged after the items
    pub fn with(
        mut self,
        with: impl Fn(&ResourceContext) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.with = Some(Box::new(with));
        self
    }

    /// Adjust the outgoing response
    pub fn with_response(
        mut self,
        with_response: impl Fn(&ResourceContext, &mut Response) + Send + Sync + 'static,
    ) -> Self {
        self.with_response = Some(Box::new(with_response));
        self
    }

    pub(crate) fn resolve(&self, ctx: &ResourceContext) -> Value {
        Value::Array(self.items.iter().map(|item| item.to_json(ctx)).collect())
    }

    pub(crate) fn context_data(&self, ctx: &ResourceContext) -> Value {
        self.with
            .as_ref()
            .map_or_else(|| Value::Object(Map::new()), |with| with(ctx))
    }

    pub(crate) fn extra(&self) -> &Value {
        &self.additional
    }

    pub(crate) fn apply_response(&self, ctx: &ResourceContext, response: &mut Response) {
        if let Some(with_response) = &self.with_response {
            with_response(ctx, response);
        }
    }

    pub(crate) fn pagination(&self) -> Option<&Map<String, Value>> {
        self.pagination.as_ref()
    }
}

/// Formatter input
pub enum Payload {
    /// Arbitrary JSON
    Plain(Value),
    /// A paginator's array form
    Paginated(Map<String, Value>),
    /// A single typed resource
    Resource(Box<dyn JsonResource>),
    /// A collection of typed resources
    Collection(ResourceCollection),
}

impl Payload {
    /// Nothing to return
    pub fn empty() -> Self {
        Payload::Plain(Value::Null)
    }

    pub fn resource<R: JsonResource + 'static>(resource: R) -> Self {
        Payload::Resource(Box::new(resource))
    }

    /// Serialize any value into a plain payload
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Payload::Plain)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Plain(value)
    }
}

impl<T: Serialize> From<Paginator<T>> for Payload {
    fn from(page: Paginator<T>) -> Self {
        match page.to_value() {
            Value::Object(array) => Payload::Paginated(array),
            _ => Payload::Paginated(page.meta()),
        }
    }
}

impl From<ResourceCollection> for Payload {
    fn from(collection: ResourceCollection) -> Self {
        Payload::Collection(collection)
    }
}
