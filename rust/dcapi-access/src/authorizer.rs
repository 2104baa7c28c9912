use crate::{Decision, DocumentSource, FetchResponse, Visibility};
use dcapi_token::Token;

/// Decide whether `token` may open the fetched document.
///
/// Rules, first match wins:
///
/// 1. A failed fetch propagates its status.
/// 2. Superusers are allowed.
/// 3. Callers entitled to the document (or its owning work) are allowed.
/// 4. Otherwise the document must be published and its visibility must
///    admit the caller.
///
/// A successful fetch whose body cannot be read is denied.
pub fn authorize(token: &Token, response: &FetchResponse) -> Decision {
    if !response.is_ok() {
        tracing::debug!(status = response.status_code, "Document fetch failed");
        return Decision::UpstreamError(response.status_code);
    }

    let source = match response.document() {
        Ok(body) => body.source,
        Err(error) => {
            tracing::warn!(%error, "Unreadable document body, denying access");
            return Decision::Deny;
        }
    };

    match source {
        Some(source) => authorize_source(token, &source),
        None => {
            tracing::warn!("Document body has no _source, denying access");
            Decision::Deny
        }
    }
}

/// Apply rules 2 to 4 of [`authorize`] to an already fetched document.
pub fn authorize_source(token: &Token, source: &DocumentSource) -> Decision {
    let decision = Decision::from(
        token.is_super_user()
            || token.has_entitlement(source.entitlement_id())
            || (source.published && visibility_admits(token, &source.visibility)),
    );

    tracing::debug!(
        id = %source.id,
        visibility = %source.visibility,
        published = source.published,
        ?decision,
        "Authorized document"
    );

    decision
}

/// Whether a document of `visibility` may be shown to `token`, ignoring
/// publication state.
pub fn visibility_admits(token: &Token, visibility: &Visibility) -> bool {
    match visibility {
        Visibility::Public => true,
        Visibility::Institution => token.is_logged_in() || token.is_reading_room(),
        Visibility::Private => token.is_reading_room(),
        Visibility::Unknown | Visibility::Other(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcapi_token::User;
    use pretty_assertions::assert_eq;

    fn work(visibility: &str, published: bool) -> FetchResponse {
        FetchResponse::new(
            200,
            format!(
                r#"{{"found":true,"_source":{{"id":"1234","visibility":"{visibility}","published":{published}}}}}"#
            ),
        )
    }

    #[test]
    fn it_propagates_upstream_failures() {
        let token = Token::builder().super_user().issue();
        assert_eq!(
            authorize(&token, &FetchResponse::status(404)),
            Decision::UpstreamError(404)
        );
        assert_eq!(
            authorize(&token, &FetchResponse::new(500, "oops")),
            Decision::UpstreamError(500)
        );
    }

    #[test]
    fn it_allows_superusers_to_see_unpublished_private_works() {
        let token = Token::builder().super_user().issue();
        assert_eq!(authorize(&token, &work("Private", false)), Decision::Allow);
    }

    #[test]
    fn it_requires_publication_for_anonymous_callers() {
        let token = Token::anonymous();
        assert_eq!(authorize(&token, &work("Public", false)), Decision::Deny);
        assert_eq!(authorize(&token, &work("Public", true)), Decision::Allow);
    }

    #[test]
    fn it_allows_reading_room_visitors_to_see_private_works() {
        let token = Token::builder().reading_room().issue();
        assert_eq!(authorize(&token, &work("Private", true)), Decision::Allow);
        assert_eq!(authorize(&token, &work("Private", false)), Decision::Deny);
    }

    #[test]
    fn it_admits_logged_in_callers_to_institution_works() {
        let token = Token::builder()
            .user(User::new("user123"))
            .provider("test-provider")
            .issue();
        assert!(!token.is_institution());
        assert_eq!(authorize(&token, &work("Institution", true)), Decision::Allow);
        assert_eq!(authorize(&Token::anonymous(), &work("Institution", true)), Decision::Deny);
    }

    #[test]
    fn it_denies_unknown_visibility() {
        let token = Token::builder().user(User::new("user123")).reading_room().issue();
        assert_eq!(authorize(&token, &work("Embargoed", true)), Decision::Deny);
    }

    #[test]
    fn it_allows_entitled_callers_regardless_of_state() {
        let token = Token::builder().entitlement("1234").issue();
        assert_eq!(authorize(&token, &work("Private", false)), Decision::Allow);
    }

    #[test]
    fn it_keys_file_set_entitlements_on_the_work() {
        let file_set = FetchResponse::new(
            200,
            r#"{"_source":{"id":"fs-1","work_id":"w-1","visibility":"Private","published":false}}"#,
        );
        let entitled_to_work = Token::builder().entitlement("w-1").issue();
        let entitled_to_file_set = Token::builder().entitlement("fs-1").issue();

        assert_eq!(authorize(&entitled_to_work, &file_set), Decision::Allow);
        assert_eq!(authorize(&entitled_to_file_set, &file_set), Decision::Deny);
    }

    #[test]
    fn it_denies_unreadable_bodies() {
        let token = Token::anonymous();
        assert_eq!(authorize(&token, &FetchResponse::new(200, "not json")), Decision::Deny);
        assert_eq!(authorize(&token, &FetchResponse::new(200, "{}")), Decision::Deny);
    }
}
