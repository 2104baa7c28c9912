use crate::{AuthFilter, SearchContext, canonical};
use dcapi_common::Settings;
use dcapi_token::Token;
use serde_json::{Value, json};

/// Prepares a [`SearchContext`] for the index.
///
/// Construction fills in paging defaults: `size` from the settings when
/// absent, `from` as `0` when absent or falsy. [`RequestPipeline::auth_filter`]
/// then constrains the query to what the caller may read.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPipeline {
    context: SearchContext,
}

impl RequestPipeline {
    /// Start a pipeline over a copy of `context`.
    pub fn new(context: SearchContext, settings: &Settings) -> Self {
        let mut context = context;
        if context.get("size").is_none_or(Value::is_null) {
            context = context.insert("size", settings.default_search_size());
        }
        if !context.get("from").is_some_and(is_truthy) {
            context = context.insert("from", 0);
        }
        Self { context }
    }

    /// Constrain the query for `token` and request exact hit counts.
    ///
    /// A missing query is treated as `match_all`.
    pub fn auth_filter(self, token: &Token) -> Self {
        let filter = AuthFilter::for_token(token);
        let query = self
            .context
            .query()
            .cloned()
            .unwrap_or_else(|| json!({ "match_all": {} }));

        tracing::debug!(
            subject = token.subject(),
            exclusions = filter.exclusions().len(),
            "Applying search auth filter"
        );

        let context = self
            .context
            .insert("query", filter.apply(&query))
            .insert("track_total_hits", true);
        Self { context }
    }

    /// The body as it stands.
    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    /// Take the body out of the pipeline.
    pub fn into_context(self) -> SearchContext {
        self.context
    }

    /// Canonical JSON for the body.
    pub fn to_json(&self) -> String {
        canonical::to_canonical_string(&self.context.to_value())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
