//! Capability resolution for API callers.
//!
//! A caller is described by a handful of derived flags collected in an
//! [`Identity`]. The [`resolve`] function evaluates a fixed rule table
//! against those flags and yields the set of [`Ability`]s the caller holds.
//!
//! ```rust
//! use dcapi_capability::{Ability, Identity, resolve};
//!
//! let reader = Identity::anonymous().with_reading_room(true);
//! let abilities = resolve(&reader);
//!
//! assert!(abilities.contains(Ability::ReadPrivate));
//! assert!(!abilities.contains(Ability::ReadUnpublished));
//! ```
//!
//! # Rule table
//!
//! | Ability | Granted when |
//! |---|---|
//! | `read:Public` | always |
//! | `read:Published` | always |
//! | `read:Institution` | superuser, institution member or reading room |
//! | `read:Private` | superuser or reading room |
//! | `read:Unpublished` | superuser |
//! | `chat` | logged in |

mod error;
pub use error::*;

mod ability;
pub use ability::*;

mod identity;
pub use identity::*;

mod abilities;
pub use abilities::*;

mod resolver;
pub use resolver::*;
