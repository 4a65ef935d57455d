//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of credential a token represents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived bearer credential
    #[default]
    Access,
    /// Long-lived credential only good for obtaining new access tokens
    Refresh,
}

/// Claims structure for JWT payload
///
/// Claims are built once at issuance and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// User email
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,

    /// User role
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,

    /// Tenant (school) the session is scoped to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,

    /// JWT ID (unique identifier for the token, used as the blacklist key)
    pub jti: String,

    /// Issuer
    pub iss: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Token kind
    #[serde(default)]
    pub typ: TokenType,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// An empty `school_id` means the session is not scoped to a tenant.
    pub fn new_access_token(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        school_id: Option<String>,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: user_id.into(),
            email: email.into(),
            role: role.into(),
            school_id: school_id.filter(|id| !id.is_empty()),
            jti: Uuid::new_v4().to_string(),
            iss: issuer.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            nbf: issued_at.timestamp(),
            typ: TokenType::Access,
        }
    }

    /// Creates new claims for a refresh token
    ///
    /// Refresh tokens carry only the subject and registered claims.
    pub fn new_refresh_token(
        user_id: impl Into<String>,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            sub: user_id.into(),
            email: String::new(),
            role: String::new(),
            school_id: None,
            jti: Uuid::new_v4().to_string(),
            iss: issuer.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            nbf: issued_at.timestamp(),
            typ: TokenType::Refresh,
        }
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Time left until expiry, negative once expired
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at() - now
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Checks if these are access token claims
    pub fn is_access(&self) -> bool {
        self.typ == TokenType::Access
    }
}

/// A freshly signed token and its expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The compact JWT
    pub token: String,
    /// When the token stops validating
    pub expires_at: DateTime<Utc>,
    /// Token ID embedded in the token
    pub jti: String,
}

/// Token pair returned after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry
    pub access_expires_at: DateTime<Utc>,

    /// Refresh token expiry
    pub refresh_expires_at: DateTime<Utc>,

    /// Token type (always "Bearer")
    pub token_type: String,
}

impl TokenPair {
    /// Creates a token pair from two issued tokens
    pub fn new(access: IssuedToken, refresh: IssuedToken) -> Self {
        Self {
            access_token: access.token,
            refresh_token: refresh.token,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Outcome of verifying a bearer token
///
/// Verification is a query: a bad token yields `valid == false` plus a
/// reason, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Why the token was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResult {
    /// A positive result carrying the session identity
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            valid: true,
            user_id: Some(claims.sub.clone()),
            email: Some(claims.email.clone()),
            role: Some(claims.role.clone()),
            school_id: claims.school_id.clone(),
            expires_at: Some(claims.expires_at()),
            error: None,
        }
    }

    /// A negative result with the rejection reason
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            user_id: None,
            email: None,
            role: None,
            school_id: None,
            expires_at: None,
            error: Some(reason.into()),
        }
    }
}
