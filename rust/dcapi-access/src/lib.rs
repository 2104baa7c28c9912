//! Document level access control.
//!
//! Two questions are answered here:
//!
//! - [`authorize`]: may this caller open the document it asked about? The
//!   answer is a [`Decision`] that maps to `204`, `403` or the upstream
//!   status of the document fetch.
//! - [`ReadAccess::gate`]: given how much a caller may see, should a fetched
//!   document be returned, hidden as not found, or refused?
//!
//! Neither performs I/O. Callers fetch the document from the search index
//! and hand the raw [`FetchResponse`] in.

mod document;
pub use document::*;

mod decision;
pub use decision::*;

mod authorizer;
pub use authorizer::*;

mod read_access;
pub use read_access::*;
