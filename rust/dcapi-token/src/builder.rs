use crate::{Claims, Token};
use dcapi_capability::{Identity, resolve};
use dcapi_common::Settings;
use dcapi_common::time::{self, Duration, SystemTime, unix_seconds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How long a freshly issued token stays valid.
pub const TOKEN_LIFETIME: Duration = Duration::from_secs(12 * 60 * 60);

/// Identity providers whose users count as institution members.
pub const INSTITUTION_PROVIDERS: &[&str] = &["nusso"];

/// An authenticated user as reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable subject identifier (e.g. a NetID).
    pub sub: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// A user with only a subject.
    pub fn new(sub: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            name: None,
            email: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Collects claims for a new [`Token`].
///
/// [`TokenBuilder::issue`] is the only place abilities are computed.
#[derive(Debug, Clone, Default)]
pub struct TokenBuilder {
    issuer: Option<String>,
    user: Option<User>,
    provider: Option<String>,
    reading_room: bool,
    super_user: bool,
    dev_team: bool,
    dev_team_net_ids: Vec<String>,
    entitlements: BTreeSet<String>,
    issued_at: Option<SystemTime>,
    expires_at: Option<SystemTime>,
}

impl TokenBuilder {
    /// Start an anonymous token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply issuer and dev team membership from the deployment settings.
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.issuer = settings.dc_api_endpoint().map(String::from);
        self.dev_team_net_ids = settings.dev_team_net_ids().to_vec();
        self
    }

    /// Set the issuer.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Log a user in.
    pub fn user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// Record the identity provider the user came through.
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Mark the caller as present in a reading room.
    pub fn reading_room(mut self) -> Self {
        self.reading_room = true;
        self
    }

    /// Mark the caller as a superuser.
    pub fn super_user(mut self) -> Self {
        self.super_user = true;
        self
    }

    /// NetIDs whose users are flagged as dev team members.
    pub fn dev_team<I, S>(mut self, net_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dev_team_net_ids = net_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Grant access to one document regardless of its visibility.
    pub fn entitlement(mut self, id: impl Into<String>) -> Self {
        self.entitlements.insert(id.into());
        self
    }

    /// Replace the entitlements.
    pub fn entitlements<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entitlements = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Drop one entitlement.
    pub fn without_entitlement(mut self, id: &str) -> Self {
        self.entitlements.remove(id);
        self
    }

    /// Issue at a fixed time instead of now.
    pub fn issued_at(mut self, time: SystemTime) -> Self {
        self.issued_at = Some(time);
        self
    }

    /// Expire at a fixed time instead of [`TOKEN_LIFETIME`] after issuance.
    pub fn expires_at(mut self, time: SystemTime) -> Self {
        self.expires_at = Some(time);
        self
    }

    /// Resolve abilities and produce the token.
    pub fn issue(self) -> Token {
        let issued_at = self.issued_at.unwrap_or_else(time::now);
        let expires_at = self.expires_at.unwrap_or(issued_at + TOKEN_LIFETIME);

        let sub = self.user.as_ref().map(|user| user.sub.clone());
        let is_dev_team = self.dev_team
            || sub
                .as_ref()
                .is_some_and(|sub| self.dev_team_net_ids.iter().any(|id| id == sub));

        let identity = Identity {
            logged_in: sub.is_some(),
            institution: is_institution_provider(self.provider.as_deref()),
            reading_room: self.reading_room,
            super_user: self.super_user,
        };
        let abilities = resolve(&identity);

        tracing::trace!(?identity, abilities = abilities.len(), "Issued token");

        let (name, email) = match self.user {
            Some(user) => (user.name, user.email),
            None => (None, None),
        };

        Token::from_claims(Claims {
            iss: self.issuer,
            sub,
            name,
            email,
            iat: unix_seconds(issued_at),
            exp: unix_seconds(expires_at),
            provider: self.provider,
            entitlements: self.entitlements,
            abilities,
            is_reading_room: self.reading_room,
            is_super_user: self.super_user,
            is_dev_team,
        })
    }

    /// Seed a builder with everything but the abilities of `claims`.
    pub(crate) fn from_claims(claims: &Claims) -> Self {
        Self {
            issuer: claims.iss.clone(),
            user: claims.sub.as_ref().map(|sub| User {
                sub: sub.clone(),
                name: claims.name.clone(),
                email: claims.email.clone(),
            }),
            provider: claims.provider.clone(),
            reading_room: claims.is_reading_room,
            super_user: claims.is_super_user,
            dev_team: claims.is_dev_team,
            dev_team_net_ids: Vec::new(),
            entitlements: claims.entitlements.clone(),
            issued_at: None,
            expires_at: Some(time::UNIX_EPOCH + Duration::from_secs(claims.exp)),
        }
    }
}

pub(crate) fn is_institution_provider(provider: Option<&str>) -> bool {
    provider.is_some_and(|provider| INSTITUTION_PROVIDERS.iter().any(|known| *known == provider))
}
