use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Query string parameters forwarded to the search index.
pub const FORWARDED_PARAMETERS: &[&str] = &["search_pipeline"];

/// Keep only the parameters the index should see. `None` if nothing is left.
pub fn sanitize_query_parameters(
    parameters: &BTreeMap<String, String>,
) -> Option<BTreeMap<String, String>> {
    let sanitized: BTreeMap<String, String> = parameters
        .iter()
        .filter(|(name, _)| FORWARDED_PARAMETERS.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    (!sanitized.is_empty()).then_some(sanitized)
}

/// Parse a `sort` parameter such as `create_date:desc,title:asc`.
///
/// A field without an order sorts by the index default.
pub fn parse_sort(sort: &str) -> Value {
    Value::Array(
        sort.split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .map(|field| match field.split_once(':') {
                Some((field, order)) => json!({ field: order }),
                None => json!(field),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_keeps_only_forwarded_parameters() {
        let parameters: BTreeMap<String, String> = [
            ("search_pipeline", "hybrid"),
            ("size", "10"),
            ("as", "iiif"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let sanitized = sanitize_query_parameters(&parameters);
        assert_eq!(
            sanitized,
            Some(BTreeMap::from([("search_pipeline".to_string(), "hybrid".to_string())]))
        );
    }

    #[test]
    fn it_drops_empty_parameter_sets() {
        let parameters = BTreeMap::from([("size".to_string(), "10".to_string())]);
        assert_eq!(sanitize_query_parameters(&parameters), None);
    }

    #[test]
    fn it_parses_sort_pairs() {
        assert_eq!(
            parse_sort("create_date:asc, title:desc,,modified"),
            json!([{ "create_date": "asc" }, { "title": "desc" }, "modified"])
        );
    }
}
