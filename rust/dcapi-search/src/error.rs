use thiserror::Error;

/// Errors raised while building a search request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A query string parameter has an unusable value.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// The offending value.
        value: String,
    },

    /// The request body is not a JSON object.
    #[error("Search body must be a JSON object")]
    InvalidBody,
}

impl SearchError {
    pub(crate) fn invalid_parameter(name: &str, value: &str) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}
