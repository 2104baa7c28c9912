use dcapi_token::Token;
use serde_json::{Value, json};

/// Visibility and publication constraints for one caller's searches.
///
/// Superusers get no exclusions, reading room visitors lose only
/// unpublished documents and everyone else loses both. The choice follows
/// the token's flags, the same ones [`dcapi_access::authorize`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthFilter {
    exclude_unpublished: bool,
    exclude_private: bool,
}

impl AuthFilter {
    /// Constraints for `token`.
    pub fn for_token(token: &Token) -> Self {
        let super_user = token.is_super_user();
        Self {
            exclude_unpublished: !super_user,
            exclude_private: !(super_user || token.is_reading_room()),
        }
    }

    /// Clause matching unpublished documents.
    pub fn unpublished() -> Value {
        json!({ "term": { "published": false } })
    }

    /// Clause matching private documents.
    pub fn private() -> Value {
        json!({ "term": { "visibility": "Private" } })
    }

    /// The `must_not` clauses this filter adds.
    pub fn exclusions(&self) -> Vec<Value> {
        let mut clauses = Vec::with_capacity(2);
        if self.exclude_unpublished {
            clauses.push(Self::unpublished());
        }
        if self.exclude_private {
            clauses.push(Self::private());
        }
        clauses
    }

    /// Whether the filter changes nothing.
    pub fn is_empty(&self) -> bool {
        !self.exclude_unpublished && !self.exclude_private
    }

    /// Wrap `query` in the exclusions.
    ///
    /// The caller's clause becomes the sole `must` of a new `bool` query and
    /// is never altered. A filter with no exclusions returns the query as is.
    pub fn wrap(&self, query: &Value) -> Value {
        if self.is_empty() {
            return query.clone();
        }
        json!({
            "bool": {
                "must": [query.clone()],
                "must_not": self.exclusions(),
            }
        })
    }

    /// Apply the filter to a top-level query.
    ///
    /// Each branch of a hybrid query is wrapped separately; any other shape
    /// is wrapped as a whole.
    pub fn apply(&self, query: &Value) -> Value {
        match hybrid_queries(query) {
            Some(queries) => {
                let mut hybrid = query.clone();
                hybrid["hybrid"]["queries"] =
                    Value::Array(queries.iter().map(|branch| self.wrap(branch)).collect());
                hybrid
            }
            None => self.wrap(query),
        }
    }
}

/// The sub-queries of a hybrid query, if `query` is one.
pub fn hybrid_queries(query: &Value) -> Option<&Vec<Value>> {
    query.get("hybrid")?.get("queries")?.as_array()
}
