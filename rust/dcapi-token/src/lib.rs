//! Signed API tokens.
//!
//! A [`Token`] describes who is calling the API: identity claims, the
//! per-document entitlements granted to the caller, and the abilities the
//! capability rule table granted at issuance. Tokens travel as compact
//! HS256 JWTs signed with a [`TokenKey`].
//!
//! # Lifecycle
//!
//! ```text
//! TokenBuilder ──issue()──▶ Token ──sign()──▶ "xxx.yyy.zzz"
//!                             ▲                    │
//!                             └──── verify() ◀─────┘
//! ```
//!
//! Abilities come from the capability rule table only: in
//! [`TokenBuilder::issue`], and again from the verified flags in
//! [`Token::verify`]. A token has no mutators; changing any claim means
//! issuing a new token through [`Token::reissue`].
//!
//! Verification fails closed. [`Token::from_bearer`] turns any missing or
//! invalid credential into an anonymous token instead of an error.
//!
//! ```rust
//! use dcapi_capability::Ability;
//! use dcapi_token::{Token, TokenKey, User};
//!
//! let key = TokenKey::new("secret");
//! let token = Token::builder()
//!     .user(User::new("abc123"))
//!     .provider("nusso")
//!     .issue();
//!
//! let signed = token.sign(&key).unwrap();
//! let verified = Token::verify(&key, &signed).unwrap();
//!
//! assert!(verified.is_institution());
//! assert!(verified.can(Ability::Chat));
//! ```

mod error;
pub use error::*;

mod key;
pub use key::*;

mod claims;
pub use claims::*;

mod builder;
pub use builder::*;

mod token;
pub use token::*;
