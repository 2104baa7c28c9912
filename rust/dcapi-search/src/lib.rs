//! Search request pipeline.
//!
//! Search requests arrive as free-form OpenSearch bodies. Before one is sent
//! to the index it goes through a [`RequestPipeline`], which wraps the
//! caller's query in the visibility and publication constraints the
//! caller's [`Token`](dcapi_token::Token) calls for and asks for exact hit
//! counts. The result is emitted as canonical JSON so equal requests are
//! byte-identical.
//!
//! ```rust
//! use dcapi_common::Settings;
//! use dcapi_search::{RequestPipeline, SearchContext};
//! use dcapi_token::Token;
//! use serde_json::json;
//!
//! let context = SearchContext::from_value(json!({ "query": { "match_all": {} } })).unwrap();
//! let body = RequestPipeline::new(context, &Settings::new("secret"))
//!     .auth_filter(&Token::anonymous())
//!     .to_json();
//!
//! assert!(body.contains(r#""track_total_hits":true"#));
//! ```

mod error;
pub use error::*;

pub mod canonical;

mod context;
pub use context::*;

mod filter;
pub use filter::*;

mod pipeline;
pub use pipeline::*;

mod parameters;
pub use parameters::*;

mod file_sets;
pub use file_sets::*;

mod pagination;
pub use pagination::*;
