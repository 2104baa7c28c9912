use crate::{SearchError, parse_sort};
use dcapi_common::Settings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// An OpenSearch search body.
///
/// Only a few keys are interpreted (`query`, `size`, `from`,
/// `track_total_hits`); everything else (`sort`, `aggs`, `_source`, ...)
/// is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchContext(Map<String, Value>);

impl SearchContext {
    /// An empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a body parsed from a request.
    ///
    /// # Errors
    ///
    /// Fails unless `value` is a JSON object.
    pub fn from_value(value: Value) -> Result<Self, SearchError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(SearchError::InvalidBody),
        }
    }

    /// Build a body from a request.
    ///
    /// A POSTed `body` is used as is; otherwise the `query` parameter
    /// becomes a `query_string` query (`*` when absent). Query string
    /// parameters then override paging, sorting and source filtering:
    ///
    /// - `size`, `from`: numbers; `size` falls back to the body, then to the
    ///   configured default.
    /// - `page`: 1-based, sets `from` to `(page - 1) * size`. A page whose
    ///   offset does not fit is rejected.
    /// - `sort`: `field:order` pairs separated by commas.
    /// - `_source_includes`, `_source_excludes`: comma-separated fields.
    ///
    /// # Errors
    ///
    /// Fails on a non-object body, a non-numeric paging parameter, page `0`
    /// or a page past the addressable range.
    pub fn from_parameters(
        body: Option<Value>,
        parameters: &BTreeMap<String, String>,
        settings: &Settings,
    ) -> Result<Self, SearchError> {
        let mut context = match body {
            Some(body) => Self::from_value(body)?,
            None => {
                let query = parameters.get("query").map(String::as_str).unwrap_or("*");
                Self::new().insert("query", json!({ "query_string": { "query": query } }))
            }
        };

        let size = match parameters.get("size") {
            Some(size) => parse_number("size", size)?,
            None => context.size().unwrap_or(settings.default_search_size()),
        };
        let from = match parameters.get("from") {
            Some(from) => parse_number("from", from)?,
            None => context.from().unwrap_or_default(),
        };
        context = context.insert("size", size).insert("from", from);

        for (parameter, key) in [("_source_excludes", "exclude"), ("_source_includes", "include")] {
            if let Some(fields) = parameters.get(parameter) {
                let fields: Vec<&str> = fields.split(',').map(str::trim).collect();
                let mut source = match context.0.remove("_source") {
                    Some(Value::Object(source)) => source,
                    _ => Map::new(),
                };
                source.insert(key.to_string(), json!(fields));
                context = context.insert("_source", Value::Object(source));
            }
        }

        if let Some(sort) = parameters.get("sort") {
            context = context.insert("sort", parse_sort(sort));
        }

        if let Some(raw) = parameters.get("page") {
            let from = parse_number("page", raw)?
                .checked_sub(1)
                .and_then(|page| page.checked_mul(size))
                .ok_or_else(|| SearchError::invalid_parameter("page", raw))?;
            context = context.insert("from", from);
        }

        Ok(context)
    }

    /// Return the body with `key` set to `value`.
    pub fn insert(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The query clause.
    pub fn query(&self) -> Option<&Value> {
        self.get("query").filter(|query| !query.is_null())
    }

    /// Page size, when set to a number.
    pub fn size(&self) -> Option<u64> {
        self.get("size").and_then(Value::as_u64)
    }

    /// Offset of the first hit, when set to a number.
    pub fn from(&self) -> Option<u64> {
        self.get("from").and_then(Value::as_u64)
    }

    /// Whether exact total hit counts are requested.
    pub fn track_total_hits(&self) -> bool {
        self.get("track_total_hits")
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }

    /// The body as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The body as a JSON value, by reference.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64, SearchError> {
    value
        .trim()
        .parse()
        .map_err(|_| SearchError::invalid_parameter(name, value))
}
