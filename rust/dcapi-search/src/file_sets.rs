use dcapi_access::ReadAccess;
use dcapi_common::{Index, Settings};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;

/// Upper bound on file sets returned for one work.
pub const MAX_FILE_SETS: u64 = 10_000;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    /// Name used in search bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lists the file sets of a work that a caller may see.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkFileSetsQuery {
    work_id: String,
    access: ReadAccess,
    role: Option<String>,
    source: Option<Value>,
    sort_by: Option<String>,
    sort_order: SortOrder,
}

impl WorkFileSetsQuery {
    /// File sets of `work_id`, restricted to published public and
    /// institution documents until widened with [`Self::access`].
    pub fn new(work_id: impl Into<String>) -> Self {
        Self {
            work_id: work_id.into(),
            access: ReadAccess::restricted(),
            role: None,
            source: None,
            sort_by: None,
            sort_order: SortOrder::default(),
        }
    }

    /// Set what the caller may read.
    pub fn access(mut self, access: ReadAccess) -> Self {
        self.access = access;
        self
    }

    /// Only file sets with this role (e.g. `Access`, `Auxiliary`).
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Source filtering, passed through as `_source`.
    pub fn source(mut self, source: Value) -> Self {
        self.source = Some(source);
        self
    }

    /// Sort by `field`.
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(field.into());
        self.sort_order = order;
        self
    }

    /// The search body.
    pub fn to_body(&self) -> Value {
        let mut must = vec![json!({ "term": { "work_id": self.work_id } })];
        if let Some(role) = &self.role {
            must.push(json!({ "term": { "role": role } }));
        }

        let mut filter = Vec::new();
        if !self.access.allow_private {
            filter.push(json!({
                "bool": {
                    "should": [
                        { "term": { "visibility": "Public" } },
                        { "term": { "visibility": "Institution" } }
                    ]
                }
            }));
        }
        if !self.access.allow_unpublished {
            filter.push(json!({ "term": { "published": true } }));
        }

        let mut body = Map::new();
        body.insert("size".into(), json!(MAX_FILE_SETS));
        body.insert(
            "query".into(),
            json!({ "bool": { "must": must, "filter": filter } }),
        );
        if let Some(field) = &self.sort_by {
            body.insert(
                "sort".into(),
                json!([{ field.as_str(): { "order": self.sort_order.as_str() } }]),
            );
        }
        if let Some(source) = &self.source {
            body.insert("_source".into(), source.clone());
        }
        Value::Object(body)
    }

    /// Index the query runs against.
    pub fn target(&self, settings: &Settings) -> String {
        Index::FileSet.target(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_restricts_by_default() {
        assert_eq!(
            WorkFileSetsQuery::new("work-1").to_body(),
            json!({
                "size": 10000,
                "query": {
                    "bool": {
                        "must": [{ "term": { "work_id": "work-1" } }],
                        "filter": [
                            {
                                "bool": {
                                    "should": [
                                        { "term": { "visibility": "Public" } },
                                        { "term": { "visibility": "Institution" } }
                                    ]
                                }
                            },
                            { "term": { "published": true } }
                        ]
                    }
                }
            })
        );
    }

    #[test]
    fn it_drops_filters_for_unrestricted_access() {
        let body = WorkFileSetsQuery::new("work-1")
            .access(ReadAccess::unrestricted())
            .to_body();
        assert_eq!(body.pointer("/query/bool/filter"), Some(&json!([])));
    }

    #[test]
    fn it_narrows_by_role_and_sorts() {
        let body = WorkFileSetsQuery::new("work-1")
            .access(ReadAccess {
                allow_private: true,
                allow_unpublished: false,
            })
            .role("Access")
            .sort_by("rank", SortOrder::Desc)
            .source(json!(["id", "label"]))
            .to_body();

        assert_eq!(
            body.pointer("/query/bool/must"),
            Some(&json!([{ "term": { "work_id": "work-1" } }, { "term": { "role": "Access" } }]))
        );
        assert_eq!(
            body.pointer("/query/bool/filter"),
            Some(&json!([{ "term": { "published": true } }]))
        );
        assert_eq!(body.get("sort"), Some(&json!([{ "rank": { "order": "desc" } }])));
        assert_eq!(body.get("_source"), Some(&json!(["id", "label"])));
    }

    #[test]
    fn it_targets_the_file_set_index() {
        let settings = Settings::new("secret").with_env_prefix("dev");
        assert_eq!(
            WorkFileSetsQuery::new("work-1").target(&settings),
            "dev-dc-v2-file-set"
        );
    }
}
