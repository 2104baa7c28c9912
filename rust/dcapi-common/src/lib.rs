#![warn(missing_docs)]

//! Light weight helpers shared by the digital collections API crates.
//!
//! Holds the read-only [`Settings`] snapshot taken from the deployment
//! environment, the search [`Index`] and [`Model`] naming rules, provider
//! feature flags, and a cross-platform clock.

pub mod time;

mod settings;
pub use settings::*;

mod index;
pub use index::*;

mod providers;
pub use providers::*;
