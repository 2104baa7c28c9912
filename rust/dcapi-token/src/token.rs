use crate::builder::is_institution_provider;
use crate::key::{decode_segment, encode_segment};
use crate::{Claims, Header, InvalidToken, SignError, TokenBuilder, TokenKey, UserInfo};
use dcapi_capability::{Abilities, Ability, Identity, resolve};
use dcapi_common::time::{self, Duration, SystemTime, UNIX_EPOCH, unix_seconds};

/// An authenticated or anonymous API caller.
///
/// Tokens are read-only. Use [`Token::builder`] to issue one and
/// [`Token::reissue`] to derive a changed copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    claims: Claims,
}

impl Token {
    /// Start issuing a token.
    pub fn builder() -> TokenBuilder {
        TokenBuilder::new()
    }

    /// An anonymous token with the abilities every caller holds.
    pub fn anonymous() -> Self {
        TokenBuilder::new().issue()
    }

    pub(crate) fn from_claims(claims: Claims) -> Self {
        Self { claims }
    }

    /// A builder seeded with this token's claims and expiration.
    ///
    /// Abilities are not carried over; they are resolved again when the new
    /// token is issued.
    pub fn reissue(&self) -> TokenBuilder {
        TokenBuilder::from_claims(&self.claims)
    }

    /// Sign the token into its compact `header.payload.signature` form.
    ///
    /// # Errors
    ///
    /// Fails only if the claims cannot be encoded as JSON.
    pub fn sign(&self, key: &TokenKey) -> Result<String, SignError> {
        let header = encode_segment(&serde_json::to_vec(&Header::hs256())?);
        let payload = encode_segment(&serde_json::to_vec(&self.claims)?);
        let message = format!("{header}.{payload}");
        let signature = encode_segment(&key.sign(message.as_bytes()));
        Ok(format!("{message}.{signature}"))
    }

    /// Verify a signed token against the current time.
    ///
    /// # Errors
    ///
    /// Fails if the token is malformed, signed with another key or
    /// algorithm, or expired.
    pub fn verify(key: &TokenKey, signed: &str) -> Result<Self, InvalidToken> {
        Self::verify_at(key, signed, time::now())
    }

    /// Verify a signed token as of `now`.
    ///
    /// Abilities are resolved again from the verified flags, so whatever
    /// the payload lists under `abilities` is not trusted.
    ///
    /// # Errors
    ///
    /// Same as [`Token::verify`].
    pub fn verify_at(key: &TokenKey, signed: &str, now: SystemTime) -> Result<Self, InvalidToken> {
        let mut segments = signed.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(InvalidToken::Malformed(
                "expected three dot separated segments".into(),
            ));
        };

        let decoded: Header = serde_json::from_slice(&decode_segment(header, "header")?)
            .map_err(|e| InvalidToken::Malformed(format!("header: {e}")))?;
        if decoded.alg != Header::ALGORITHM {
            return Err(InvalidToken::UnsupportedAlgorithm(decoded.alg));
        }

        let message_len = header.len() + 1 + payload.len();
        key.verify(
            signed[..message_len].as_bytes(),
            &decode_segment(signature, "signature")?,
        )?;

        let claims: Claims = serde_json::from_slice(&decode_segment(payload, "payload")?)
            .map_err(|e| InvalidToken::Malformed(format!("payload: {e}")))?;

        if unix_seconds(now) >= claims.exp {
            return Err(InvalidToken::Expired);
        }

        let mut token = Self { claims };
        token.claims.abilities = resolve(&token.identity());
        Ok(token)
    }

    /// Resolve the caller of a request from its bearer credential.
    ///
    /// A missing credential, or one that fails verification, yields an
    /// anonymous token.
    pub fn from_bearer(key: &TokenKey, bearer: Option<&str>) -> Self {
        let Some(signed) = bearer.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::anonymous();
        };

        match Self::verify(key, signed) {
            Ok(token) => token,
            Err(error) => {
                tracing::debug!(%error, "Rejected bearer token, continuing as anonymous");
                Self::anonymous()
            }
        }
    }

    /// Whether `ability` was granted at issuance.
    pub fn can(&self, ability: Ability) -> bool {
        self.claims.abilities.contains(ability)
    }

    /// Whether the caller is entitled to the document or work `id`.
    pub fn has_entitlement(&self, id: &str) -> bool {
        self.claims.entitlements.contains(id)
    }

    /// Granted abilities.
    pub fn abilities(&self) -> &Abilities {
        &self.claims.abilities
    }

    /// Entitled document ids in ascending order.
    pub fn entitlements(&self) -> impl Iterator<Item = &str> + '_ {
        self.claims.entitlements.iter().map(String::as_str)
    }

    /// Whether the superuser flag is set.
    pub fn is_super_user(&self) -> bool {
        self.claims.is_super_user
    }

    /// Whether the caller is in a reading room.
    pub fn is_reading_room(&self) -> bool {
        self.claims.is_reading_room
    }

    /// Whether a subject is present.
    pub fn is_logged_in(&self) -> bool {
        self.claims.sub.is_some()
    }

    /// Whether the identity provider is an institution provider.
    pub fn is_institution(&self) -> bool {
        is_institution_provider(self.claims.provider.as_deref())
    }

    /// Whether the caller is on the dev team.
    pub fn is_dev_team(&self) -> bool {
        self.claims.is_dev_team
    }

    /// The flags the capability rule table sees for this caller.
    pub fn identity(&self) -> Identity {
        Identity {
            logged_in: self.is_logged_in(),
            institution: self.is_institution(),
            reading_room: self.is_reading_room(),
            super_user: self.is_super_user(),
        }
    }

    /// Subject identifier.
    pub fn subject(&self) -> Option<&str> {
        self.claims.sub.as_deref()
    }

    /// Identity provider.
    pub fn provider(&self) -> Option<&str> {
        self.claims.provider.as_deref()
    }

    /// Issuer.
    pub fn issuer(&self) -> Option<&str> {
        self.claims.iss.as_deref()
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        self.claims.name.as_deref()
    }

    /// Email address.
    pub fn email(&self) -> Option<&str> {
        self.claims.email.as_deref()
    }

    /// Issuance time, truncated to whole seconds.
    pub fn issued_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.claims.iat)
    }

    /// Expiration time, truncated to whole seconds.
    pub fn expires_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.claims.exp)
    }

    /// Whether the token is expired as of `now`.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        unix_seconds(now) >= self.claims.exp
    }

    /// Identity claims without entitlements or abilities.
    pub fn user_info(&self) -> UserInfo {
        UserInfo::from(&self.claims)
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::anonymous()
    }
}
