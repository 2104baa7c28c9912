//! Search requests from query string to serialized body.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use dcapi_access::{Decision, FetchResponse, authorize};
use dcapi_common::Settings;
use dcapi_search::{AuthFilter, RequestPipeline, SearchContext, canonical};
use dcapi_token::{Token, TokenKey, User};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use testresult::TestResult;

#[test]
fn it_filters_an_anonymous_match_all() -> TestResult {
    let context = SearchContext::from_value(json!({ "query": { "match_all": {} } }))?;
    let body = RequestPipeline::new(context, &Settings::new("secret"))
        .auth_filter(&Token::anonymous())
        .to_json();

    let parsed: Value = serde_json::from_str(&body)?;
    assert_eq!(parsed["size"], json!(10));
    assert_eq!(parsed["from"], json!(0));
    assert_eq!(parsed["track_total_hits"], json!(true));

    let must_not = parsed
        .pointer("/query/bool/must_not")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    assert!(must_not.contains(&AuthFilter::unpublished()));
    assert!(must_not.contains(&AuthFilter::private()));
    Ok(())
}

#[test]
fn it_serializes_equal_requests_identically() -> TestResult {
    let settings = Settings::new("secret");
    let token = Token::builder().reading_room().issue();

    let left = SearchContext::from_value(json!({
        "size": 20,
        "query": { "bool": { "should": [{ "match": { "title": "maps" } }], "minimum_should_match": 1 } },
        "aggs": { "years": { "terms": { "field": "year" } } }
    }))?;
    let right = SearchContext::from_value(serde_json::from_str(
        r#"{"aggs":{"years":{"terms":{"field":"year"}}},"query":{"bool":{"minimum_should_match":1,"should":[{"match":{"title":"maps"}}]}},"size":20}"#,
    )?)?;

    let left = RequestPipeline::new(left, &settings).auth_filter(&token).to_json();
    let right = RequestPipeline::new(right, &settings).auth_filter(&token).to_json();
    assert_eq!(left, right);
    assert_eq!(
        left,
        canonical::to_canonical_string(&serde_json::from_str::<Value>(&right)?)
    );
    Ok(())
}

#[test]
fn it_filters_by_the_callers_bearer_token() -> TestResult {
    let settings = Settings::new("secret").with_default_search_size(25);
    let key = TokenKey::from_settings(&settings);
    let bearer = Token::builder()
        .user(User::new("admin"))
        .super_user()
        .issue()
        .sign(&key)?;

    let parameters = BTreeMap::from([("query".to_string(), "maps".to_string())]);
    let context = SearchContext::from_parameters(None, &parameters, &settings)?;

    let admin = RequestPipeline::new(context.clone(), &settings)
        .auth_filter(&Token::from_bearer(&key, Some(bearer.as_str())))
        .into_context();
    assert_eq!(admin.query(), Some(&json!({ "query_string": { "query": "maps" } })));
    assert_eq!(admin.size(), Some(25));

    let forged = RequestPipeline::new(context, &settings)
        .auth_filter(&Token::from_bearer(&key, Some("not.a.token")))
        .into_context();
    assert_eq!(
        forged.query().and_then(|query| query.pointer("/bool/must_not")),
        Some(&json!([AuthFilter::unpublished(), AuthFilter::private()]))
    );
    Ok(())
}

/// Sign a payload the way another service sharing the secret would.
fn sign_raw(secret: &str, payload: &str) -> TestResult<String> {
    let message = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())?;
    mac.update(message.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    Ok(format!("{message}.{signature}"))
}

fn unpublished_private_work() -> FetchResponse {
    FetchResponse::new(
        200,
        json!({ "_source": { "id": "1234", "visibility": "Private", "published": false } })
            .to_string(),
    )
}

fn filtered_query(token: &Token) -> TestResult<Value> {
    let context = SearchContext::from_value(json!({ "query": { "match_all": {} } }))?;
    Ok(RequestPipeline::new(context, &Settings::new("secret"))
        .auth_filter(token)
        .into_context()
        .query()
        .cloned()
        .unwrap_or_default())
}

#[test]
fn it_agrees_with_the_authorizer_on_flag_only_superusers() -> TestResult {
    let key = TokenKey::new("secret");
    let signed = sign_raw("secret", r#"{"sub":"admin","exp":9999999999,"isSuperUser":true}"#)?;
    let token = Token::verify(&key, &signed)?;

    assert_eq!(authorize(&token, &unpublished_private_work()), Decision::Allow);
    assert_eq!(filtered_query(&token)?, json!({ "match_all": {} }));
    Ok(())
}

#[test]
fn it_admits_private_documents_for_flag_only_reading_rooms() -> TestResult {
    let key = TokenKey::new("secret");
    let signed = sign_raw("secret", r#"{"exp":9999999999,"isReadingRoom":true}"#)?;
    let token = Token::verify(&key, &signed)?;

    assert_eq!(
        filtered_query(&token)?.pointer("/bool/must_not"),
        Some(&json!([AuthFilter::unpublished()]))
    );
    Ok(())
}
