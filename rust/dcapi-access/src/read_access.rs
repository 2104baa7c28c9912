use crate::{DocumentSource, FetchResponse, Visibility};
use dcapi_common::{Index, Settings};
use dcapi_token::Token;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// How much of the index a caller may read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReadAccess {
    /// Private documents are visible.
    pub allow_private: bool,
    /// Unpublished documents are visible.
    pub allow_unpublished: bool,
}

impl ReadAccess {
    /// Only public and institution documents that are published.
    pub const fn restricted() -> Self {
        Self {
            allow_private: false,
            allow_unpublished: false,
        }
    }

    /// Everything. Used when a later step makes the decision.
    pub const fn unrestricted() -> Self {
        Self {
            allow_private: true,
            allow_unpublished: true,
        }
    }

    /// Access to the work `id`. Entitlement to the work lifts both limits.
    pub fn for_work(token: &Token, id: &str) -> Self {
        let entitled = token.has_entitlement(id);
        Self {
            allow_private: token.is_super_user() || token.is_reading_room() || entitled,
            allow_unpublished: token.is_super_user() || entitled,
        }
    }

    /// Access to file sets.
    pub fn for_file_set(token: &Token) -> Self {
        Self {
            allow_private: token.is_super_user() || token.is_reading_room(),
            allow_unpublished: token.is_super_user(),
        }
    }

    /// Whether `source` is visible under this access.
    pub fn is_visible(&self, source: &DocumentSource) -> bool {
        let visibility_allowed = self.allow_private || source.visibility != Visibility::Private;
        let publication_allowed = self.allow_unpublished || source.published;
        visibility_allowed && publication_allowed
    }

    /// Reshape a document fetch according to this access.
    ///
    /// - Failed fetches pass through untouched.
    /// - Missing documents become a `404` not-found body.
    /// - Documents the caller may not see become `403` when published and
    ///   `404` otherwise, so unpublished ids are not disclosed.
    ///
    /// Shared links are returned as fetched.
    pub fn gate(
        &self,
        index: Index,
        id: &str,
        response: FetchResponse,
        settings: &Settings,
    ) -> FetchResponse {
        if !response.is_ok() || index == Index::SharedLink {
            return response;
        }

        let body = match response.document() {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%index, id, %error, "Unreadable document body");
                return response;
            }
        };

        match body.source {
            Some(source) if body.found => {
                if self.is_visible(&source) {
                    response
                } else if source.published {
                    tracing::debug!(%index, id, "Hiding restricted document");
                    FetchResponse::status(403)
                } else {
                    tracing::debug!(%index, id, "Hiding unpublished document");
                    not_found(index, id, settings)
                }
            }
            _ => not_found(index, id, settings),
        }
    }
}

fn not_found(index: Index, id: &str, settings: &Settings) -> FetchResponse {
    let body = json!({
        "_index": index.target(settings),
        "_type": "_doc",
        "_id": id,
        "found": false,
    });
    FetchResponse::new(404, body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcapi_token::User;
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    fn settings() -> Settings {
        Settings::new("secret").with_env_prefix("test")
    }

    fn document(visibility: &str, published: bool) -> FetchResponse {
        FetchResponse::new(
            200,
            json!({
                "found": true,
                "_source": { "id": "1234", "visibility": visibility, "published": published }
            })
            .to_string(),
        )
    }

    #[test]
    fn it_derives_work_access_from_the_token() {
        let anonymous = Token::anonymous();
        assert_eq!(ReadAccess::for_work(&anonymous, "1234"), ReadAccess::restricted());

        let reading_room = Token::builder().reading_room().issue();
        assert_eq!(
            ReadAccess::for_work(&reading_room, "1234"),
            ReadAccess {
                allow_private: true,
                allow_unpublished: false
            }
        );

        let entitled = Token::builder().entitlement("1234").issue();
        assert_eq!(ReadAccess::for_work(&entitled, "1234"), ReadAccess::unrestricted());
        assert_eq!(ReadAccess::for_work(&entitled, "5678"), ReadAccess::restricted());

        let super_user = Token::builder().super_user().issue();
        assert_eq!(ReadAccess::for_work(&super_user, "1234"), ReadAccess::unrestricted());
    }

    #[test]
    fn it_ignores_entitlements_for_file_sets() {
        let entitled = Token::builder()
            .user(User::new("user123"))
            .entitlement("1234")
            .issue();
        assert_eq!(ReadAccess::for_file_set(&entitled), ReadAccess::restricted());

        let super_user = Token::builder().super_user().issue();
        assert_eq!(ReadAccess::for_file_set(&super_user), ReadAccess::unrestricted());
    }

    #[test]
    fn it_passes_visible_documents_through() {
        let response = document("Public", true);
        let gated = ReadAccess::restricted().gate(Index::Work, "1234", response.clone(), &settings());
        assert_eq!(gated, response);
    }

    #[test]
    fn it_refuses_published_private_documents() {
        let gated = ReadAccess::restricted().gate(
            Index::Work,
            "1234",
            document("Private", true),
            &settings(),
        );
        assert_eq!(gated, FetchResponse::status(403));
    }

    #[test]
    fn it_hides_unpublished_documents() -> TestResult {
        let gated = ReadAccess::restricted().gate(
            Index::FileSet,
            "1234",
            document("Public", false),
            &settings(),
        );
        assert_eq!(gated.status_code, 404);

        let body: serde_json::Value = serde_json::from_str(gated.body.as_deref().unwrap_or("{}"))?;
        assert_eq!(
            body,
            json!({ "_index": "test-dc-v2-file-set", "_type": "_doc", "_id": "1234", "found": false })
        );
        Ok(())
    }

    #[test]
    fn it_reports_missing_documents_as_not_found() {
        let response = FetchResponse::new(200, r#"{"_id":"1234","found":false}"#);
        let gated = ReadAccess::unrestricted().gate(Index::Work, "1234", response, &settings());
        assert_eq!(gated.status_code, 404);
    }

    #[test]
    fn it_passes_failures_and_shared_links_through() {
        let failure = FetchResponse::new(502, "bad gateway");
        assert_eq!(
            ReadAccess::restricted().gate(Index::Work, "1234", failure.clone(), &settings()),
            failure
        );

        let shared = document("Private", false);
        assert_eq!(
            ReadAccess::restricted().gate(Index::SharedLink, "1234", shared.clone(), &settings()),
            shared
        );
    }
}
