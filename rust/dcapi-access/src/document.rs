//! Shapes of documents returned by the search index.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// Access tier of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Anyone may see it.
    Public,
    /// Members of the institution and reading room visitors.
    Institution,
    /// Reading room visitors only.
    Private,
    /// Any other value, including a missing one. Never grants access.
    #[default]
    Unknown,
    /// A value outside the known tiers, kept verbatim.
    Other(String),
}

impl Visibility {
    /// Wire name, empty for [`Visibility::Unknown`].
    pub fn as_str(&self) -> &str {
        match self {
            Visibility::Public => "Public",
            Visibility::Institution => "Institution",
            Visibility::Private => "Private",
            Visibility::Unknown => "",
            Visibility::Other(value) => value,
        }
    }
}

impl From<&str> for Visibility {
    fn from(value: &str) -> Self {
        match value {
            "Public" => Visibility::Public,
            "Institution" => Visibility::Institution,
            "Private" => Visibility::Private,
            "" => Visibility::Unknown,
            other => Visibility::Other(other.to_string()),
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Visibility {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Visibility::Unknown => serializer.serialize_none(),
            other => serializer.serialize_str(other.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Visibility::from).unwrap_or_default())
    }
}

/// The `_source` fields authorization reads from a collection, file set or
/// work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    /// Document id.
    #[serde(default)]
    pub id: String,
    /// Owning work, present on file sets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_id: Option<String>,
    /// Access tier.
    #[serde(default)]
    pub visibility: Visibility,
    /// Publication state. `null` and missing both read as unpublished.
    #[serde(default, deserialize_with = "nullable_bool")]
    pub published: bool,
}

impl DocumentSource {
    /// The id entitlements are keyed on: the owning work if there is one.
    pub fn entitlement_id(&self) -> &str {
        self.work_id
            .as_deref()
            .filter(|work_id| !work_id.is_empty())
            .unwrap_or(&self.id)
    }
}

fn nullable_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a document lookup (`GET /<index>/_doc/<id>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBody {
    /// Whether the index holds the document.
    #[serde(default = "found_by_default")]
    pub found: bool,
    /// The document.
    #[serde(rename = "_source", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<DocumentSource>,
}

fn found_by_default() -> bool {
    true
}

/// Raw result of fetching a document from the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// HTTP status of the fetch.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Response body, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl FetchResponse {
    /// A response with a body.
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: Some(body.into()),
        }
    }

    /// A response without a body.
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            body: None,
        }
    }

    /// Whether the fetch succeeded.
    pub fn is_ok(&self) -> bool {
        self.status_code == 200
    }

    /// Parse the body as a document lookup.
    pub fn document(&self) -> Result<DocumentBody, serde_json::Error> {
        serde_json::from_str(self.body.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[test]
    fn it_reads_a_file_set_source() -> TestResult {
        let response = FetchResponse::new(
            200,
            r#"{"found":true,"_source":{"id":"fs-1","work_id":"w-1","visibility":"Institution","published":true,"title":"ignored"}}"#,
        );
        let body = response.document()?;
        let source = body.source.ok_or("no source")?;

        assert!(body.found);
        assert_eq!(source.visibility, Visibility::Institution);
        assert!(source.published);
        assert_eq!(source.entitlement_id(), "w-1");
        Ok(())
    }

    #[test]
    fn it_keys_works_on_their_own_id() {
        let source = DocumentSource {
            id: "w-1".into(),
            ..Default::default()
        };
        assert_eq!(source.entitlement_id(), "w-1");
    }

    #[test]
    fn it_tolerates_missing_and_unknown_fields() -> TestResult {
        let source: DocumentSource = serde_json::from_str(r#"{"id":"x","published":null}"#)?;
        assert_eq!(source.visibility, Visibility::Unknown);
        assert!(!source.published);

        let source: DocumentSource =
            serde_json::from_str(r#"{"id":"x","visibility":"Embargoed","published":true}"#)?;
        assert_eq!(source.visibility, Visibility::Other("Embargoed".into()));
        Ok(())
    }

    #[test]
    fn it_rejects_an_empty_body() {
        assert!(FetchResponse::status(200).document().is_err());
    }
}
