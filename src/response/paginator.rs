//! Length-aware pagination
//!
//! A `Paginator` is one page of items plus the totals needed to describe
//! the rest. Its array form (`to_value`) is what the formatter reads the
//! pagination meta from.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// One page of a larger result set
#[derive(Debug, Clone, PartialEq)]
pub struct Paginator<T> {
    items: Vec<T>,
    total: u64,
    per_page: u64,
    current_page: u64,
    path: String,
}

impl<T> Paginator<T> {
    /// `per_page` and `current_page` are clamped to at least 1
    pub fn new(items: Vec<T>, total: u64, per_page: u64, current_page: u64) -> Self {
        Self {
            items,
            total,
            per_page: per_page.max(1),
            current_page: current_page.max(1),
            path: "/".to_string(),
        }
    }

    /// Base path reported in the array form
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    /// Last page number, never below 1
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// 1-based position of the first item on this page
    pub fn from(&self) -> Option<u64> {
        if self.items.is_empty() {
            None
        } else {
            Some((self.current_page - 1) * self.per_page + 1)
        }
    }

    /// 1-based position of the last item on this page
    pub fn to(&self) -> Option<u64> {
        self.from()
            .map(|from| from + self.items.len() as u64 - 1)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginator<U> {
        Paginator {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            current_page: self.current_page,
            path: self.path,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Array form without the `data` key
    pub fn meta(&self) -> Map<String, Value> {
        let mut meta = Map::new();
        meta.insert("current_page".into(), json!(self.current_page));
        meta.insert("from".into(), json!(self.from()));
        meta.insert("last_page".into(), json!(self.last_page()));
        meta.insert("path".into(), json!(self.path));
        meta.insert("per_page".into(), json!(self.per_page));
        meta.insert("to".into(), json!(self.to()));
        meta.insert("total".into(), json!(self.total));
        meta
    }
}

impl<T: Serialize> Paginator<T> {
    /// Array form: the meta keys plus `data`
    pub fn to_value(&self) -> Value {
        let data: Vec<Value> = self
            .items
            .iter()
            .map(|item| {
                serde_json::to_value(item).unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Failed to serialize page item");
                    Value::Null
                })
            })
            .collect();

        let mut array = self.meta();
        array.insert("data".into(), Value::Array(data));
        Value::Object(array)
    }
}

/// Build `{meta: {pagination: {...}}}` from a paginator's array form
///
/// Missing or null keys count as 0; `count` is read from `to`.
pub fn pagination_meta(paginated: &Map<String, Value>) -> Value {
    let field = |key: &str| {
        paginated
            .get(key)
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| json!(0))
    };

    json!({
        "meta": {
            "pagination": {
                "total": field("total"),
                "count": field("to"),
                "per_page": field("per_page"),
                "current_page": field("current_page"),
                "total_pages": field("last_page"),
            }
        }
    })
}
