//! Wire representation of a token.

use dcapi_capability::Abilities;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Claims carried in the token payload.
///
/// Sets are ordered so that signing the same claims always produces the
/// same bytes. Missing sets and flags decode as empty and `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub iat: u64,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default)]
    pub entitlements: BTreeSet<String>,
    #[serde(default)]
    pub abilities: Abilities,
    #[serde(default)]
    pub is_reading_room: bool,
    #[serde(default)]
    pub is_super_user: bool,
    #[serde(default)]
    pub is_dev_team: bool,
}

/// Identity claims of a token, without entitlements or abilities.
///
/// This is what `whoami`-style endpoints expose to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Identity provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Issued at, in seconds since the epoch.
    pub iat: u64,
    /// Expires at, in seconds since the epoch.
    pub exp: u64,
    /// A subject is present.
    pub is_logged_in: bool,
    /// Reading room flag.
    pub is_reading_room: bool,
    /// Superuser flag.
    pub is_super_user: bool,
    /// Dev team flag.
    pub is_dev_team: bool,
}

impl From<&Claims> for UserInfo {
    fn from(claims: &Claims) -> Self {
        Self {
            iss: claims.iss.clone(),
            sub: claims.sub.clone(),
            name: claims.name.clone(),
            email: claims.email.clone(),
            provider: claims.provider.clone(),
            iat: claims.iat,
            exp: claims.exp,
            is_logged_in: claims.sub.is_some(),
            is_reading_room: claims.is_reading_room,
            is_super_user: claims.is_super_user,
            is_dev_team: claims.is_dev_team,
        }
    }
}
