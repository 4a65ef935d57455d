//! JWT signing and validation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;

use ca_shared::config::JwtConfig;

use crate::domain::entities::token::{Claims, IssuedToken};
use crate::errors::{DomainError, TokenError};

/// Minimum length of the shared signing secret, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Token metadata readable without verifying the signature
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenMetadata {
    pub jti: String,
    pub exp: i64,
}

impl TokenMetadata {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

/// Issues and verifies HMAC-signed JWTs
///
/// Stateless once built; share it behind an `Arc` or inside the token service.
pub struct JwtSigner {
    issuer: String,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    metadata_validation: Validation,
    metadata_key: DecodingKey,
}

impl JwtSigner {
    /// Builds a signer from configuration
    ///
    /// Fails when the secret is shorter than [`MIN_SECRET_LENGTH`] bytes, the
    /// issuer is empty, a lifetime is not positive, or the algorithm is not an
    /// HMAC algorithm.
    pub fn new(config: &JwtConfig) -> Result<Self, DomainError> {
        if config.secret.len() < MIN_SECRET_LENGTH {
            return Err(DomainError::Configuration {
                message: format!("JWT secret must be at least {} bytes", MIN_SECRET_LENGTH),
            });
        }
        if config.issuer.trim().is_empty() {
            return Err(DomainError::Configuration {
                message: "JWT issuer must not be empty".to_string(),
            });
        }
        if config.access_token_expiry <= 0 || config.refresh_token_expiry <= 0 {
            return Err(DomainError::Configuration {
                message: "token lifetimes must be positive".to_string(),
            });
        }

        let algorithm: Algorithm = config.algorithm.parse().map_err(|_| DomainError::Configuration {
            message: format!("unsupported JWT algorithm: {}", config.algorithm),
        })?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::Configuration {
                message: format!("{:?} is not a shared-secret algorithm", algorithm),
            });
        }

        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub", "nbf"]);

        let mut metadata_validation = Validation::new(algorithm);
        metadata_validation.insecure_disable_signature_validation();
        metadata_validation.validate_exp = false;
        metadata_validation.validate_nbf = false;
        metadata_validation.validate_aud = false;
        metadata_validation.set_required_spec_claims::<&str>(&[]);

        Ok(Self {
            issuer: config.issuer.clone(),
            algorithm,
            access_ttl: Duration::seconds(config.access_token_expiry),
            refresh_ttl: Duration::seconds(config.refresh_token_expiry),
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            metadata_validation,
            metadata_key: DecodingKey::from_secret(&[]),
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Longest lifetime of any token this signer issues
    pub fn max_token_lifetime(&self) -> Duration {
        self.access_ttl.max(self.refresh_ttl)
    }

    /// Issues a short-lived access token
    ///
    /// An empty or absent `school_id` yields a token without a tenant claim.
    pub fn generate_access_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        school_id: Option<&str>,
    ) -> Result<IssuedToken, TokenError> {
        let claims = Claims::new_access_token(
            user_id,
            email,
            role,
            school_id.map(str::to_string),
            self.issuer.as_str(),
            Utc::now(),
            self.access_ttl,
        );
        self.issue(claims)
    }

    /// Issues a long-lived refresh token carrying only the subject
    pub fn generate_refresh_token(&self, user_id: &str) -> Result<IssuedToken, TokenError> {
        let claims =
            Claims::new_refresh_token(user_id, self.issuer.as_str(), Utc::now(), self.refresh_ttl);
        self.issue(claims)
    }

    /// Verifies signature, algorithm, expiry, not-before and issuer
    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| self.classify(token, e))
    }

    /// Reads the token ID without verifying the token
    pub fn token_id(&self, token: &str) -> Result<String, TokenError> {
        self.metadata(token).map(|metadata| metadata.jti)
    }

    /// Reads the expiry without verifying the token
    pub fn expiration_time(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        self.metadata(token)?.expires_at().ok_or(TokenError::MissingClaim {
            claim: "exp".to_string(),
        })
    }

    /// Reads token ID and expiry without verifying the token
    ///
    /// Succeeds for expired or revoked tokens; only structurally broken
    /// tokens are rejected.
    pub fn metadata(&self, token: &str) -> Result<TokenMetadata, TokenError> {
        decode::<TokenMetadata>(token, &self.metadata_key, &self.metadata_validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::Json(_) => TokenError::MissingClaim {
                    claim: "jti/exp".to_string(),
                },
                _ => TokenError::Malformed,
            })
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key).map_err(|e| {
            TokenError::TokenGenerationFailed {
                message: e.to_string(),
            }
        })
    }

    fn issue(&self, claims: Claims) -> Result<IssuedToken, TokenError> {
        let token = self.sign(&claims)?;
        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
            jti: claims.jti,
        })
    }

    fn classify(&self, token: &str, error: JwtError) -> TokenError {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
            ErrorKind::MissingRequiredClaim(claim) => TokenError::MissingClaim {
                claim: claim.clone(),
            },
            // Headers naming an algorithm the library does not know ("none")
            // fail to parse, so look at what the header declares.
            _ => match declared_algorithm(token) {
                Some(alg) if alg != format!("{:?}", self.algorithm) => TokenError::AlgorithmMismatch,
                _ => TokenError::Malformed,
            },
        }
    }
}

fn declared_algorithm(token: &str) -> Option<String> {
    let segment = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<DeclaredHeader>(&bytes).ok().map(|header| header.alg)
}

impl std::fmt::Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
