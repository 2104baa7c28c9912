use serde::{Deserialize, Serialize};

/// The flags the rule table is evaluated against.
///
/// This is a plain value object derived from a token's claims. It carries no
/// abilities of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// A subject is present.
    pub logged_in: bool,
    /// Authenticated through an institution identity provider.
    pub institution: bool,
    /// Physically present in a reading room.
    pub reading_room: bool,
    /// Administrative override.
    pub super_user: bool,
}

impl Identity {
    /// An anonymous caller outside the reading room.
    pub const fn anonymous() -> Self {
        Self {
            logged_in: false,
            institution: false,
            reading_room: false,
            super_user: false,
        }
    }

    /// Set the logged-in flag.
    pub const fn with_logged_in(mut self, logged_in: bool) -> Self {
        self.logged_in = logged_in;
        self
    }

    /// Set the institution flag.
    pub const fn with_institution(mut self, institution: bool) -> Self {
        self.institution = institution;
        self
    }

    /// Set the reading room flag.
    pub const fn with_reading_room(mut self, reading_room: bool) -> Self {
        self.reading_room = reading_room;
        self
    }

    /// Set the superuser flag.
    pub const fn with_super_user(mut self, super_user: bool) -> Self {
        self.super_user = super_user;
        self
    }
}
