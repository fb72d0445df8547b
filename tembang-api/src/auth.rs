//! Authentication Module
//!
//! Bearer JWT authentication and password hashing. Access and refresh
//! tokens are HS256 JWTs carrying the user id in the `sub` claim, signed with
//! separate secrets. Refresh tokens also carry a unique `jti` so every login
//! stores a distinct token. Passwords are hashed with Argon2id.

use crate::error::{ApiError, ApiResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tembang_core::{new_prefixed_id, ConfigError, UserId};

const INSECURE_DEFAULT_SECRET: &str = "INSECURE_DEFAULT_SECRET_CHANGE_IN_PRODUCTION";
const INSECURE_DEFAULT_REFRESH_SECRET: &str = "INSECURE_DEFAULT_REFRESH_SECRET_CHANGE_IN_PRODUCTION";

// ============================================================================
// CLOCK ABSTRACTION
// ============================================================================

/// Clock used for JWT time validation.
///
/// Time checks are done here instead of inside `jsonwebtoken` so tests can
/// pin the clock.
pub trait JwtClock: Send + Sync {
    /// Current time as Unix epoch seconds.
    fn now_epoch_secs(&self) -> i64;
}

/// Production clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl JwtClock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl JwtClock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}

/// Test clock helpers for common scenarios.
#[cfg(test)]
pub mod test_clocks {
    use super::FixedClock;

    /// 2024-01-01 00:00:00 UTC
    pub fn valid() -> FixedClock {
        FixedClock(1704067200)
    }

    /// 2030-01-01 00:00:00 UTC
    pub fn future() -> FixedClock {
        FixedClock(1893456000)
    }
}

// ============================================================================
// JWT SECRET
// ============================================================================

/// JWT signing secret that never shows up in logs.
#[derive(Clone)]
pub struct JwtSecret(SecretString);

impl JwtSecret {
    /// # Errors
    /// Returns error if the secret is empty.
    pub fn new(secret: String) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "TEMBANG_JWT_SECRET".to_string(),
            });
        }
        Ok(Self(SecretString::new(secret.into())))
    }

    /// Expose the secret value, for signing and verification only.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.0.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub fn is_insecure_default(&self) -> bool {
        let secret = self.0.expose_secret();
        secret == INSECURE_DEFAULT_SECRET || secret == INSECURE_DEFAULT_REFRESH_SECRET
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtSecret([REDACTED, {} chars])", self.len())
    }
}

fn build_jwt_secret(secret: String, fallback: &str) -> JwtSecret {
    let secret = if secret.trim().is_empty() {
        fallback.to_string()
    } else {
        secret
    };
    JwtSecret(SecretString::new(secret.into()))
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret for signing and verification of access tokens
    pub jwt_secret: JwtSecret,

    /// Secret for signing and verification of refresh tokens
    pub refresh_secret: JwtSecret,

    /// JWT algorithm (default: HS256)
    pub jwt_algorithm: Algorithm,

    /// Lifetime of access tokens in seconds (default: 1 hour)
    pub jwt_expiration_secs: i64,

    /// Lifetime of refresh tokens in seconds (default: 30 days)
    pub refresh_expiration_secs: i64,

    /// Clock skew tolerance in seconds (default: 60)
    pub jwt_clock_skew_secs: i64,

    /// Clock for JWT time validation
    pub clock: Arc<dyn JwtClock>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret)
            .field("refresh_secret", &self.refresh_secret)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .field("refresh_expiration_secs", &self.refresh_expiration_secs)
            .field("jwt_clock_skew_secs", &self.jwt_clock_skew_secs)
            .field("clock", &"<JwtClock>")
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: build_jwt_secret(String::new(), INSECURE_DEFAULT_SECRET),
            refresh_secret: build_jwt_secret(String::new(), INSECURE_DEFAULT_REFRESH_SECRET),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiration_secs: 3600,
            refresh_expiration_secs: 30 * 24 * 3600,
            jwt_clock_skew_secs: 60,
            clock: Arc::new(SystemClock),
        }
    }
}

impl AuthConfig {
    /// Create authentication configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `TEMBANG_JWT_SECRET`: access token signing secret
    /// - `TEMBANG_REFRESH_TOKEN_SECRET`: refresh token signing secret
    /// - `TEMBANG_JWT_EXPIRATION_SECS`: access token lifetime (default: 3600)
    /// - `TEMBANG_REFRESH_EXPIRATION_SECS`: refresh token lifetime (default: 30 days)
    /// - `TEMBANG_JWT_CLOCK_SKEW_SECS`: clock skew tolerance (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            jwt_secret: build_jwt_secret(
                std::env::var("TEMBANG_JWT_SECRET").unwrap_or_default(),
                INSECURE_DEFAULT_SECRET,
            ),
            refresh_secret: build_jwt_secret(
                std::env::var("TEMBANG_REFRESH_TOKEN_SECRET").unwrap_or_default(),
                INSECURE_DEFAULT_REFRESH_SECRET,
            ),
            jwt_expiration_secs: std::env::var("TEMBANG_JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jwt_expiration_secs),
            refresh_expiration_secs: std::env::var("TEMBANG_REFRESH_EXPIRATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.refresh_expiration_secs),
            jwt_clock_skew_secs: std::env::var("TEMBANG_JWT_CLOCK_SKEW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.jwt_clock_skew_secs),
            ..defaults
        }
    }

    /// Refuse the insecure default secret and short secrets when
    /// `TEMBANG_ENVIRONMENT` is `production`. In development a warning is
    /// logged instead.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        let environment = std::env::var("TEMBANG_ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase();
        self.validate_for_environment(&environment)
    }

    fn validate_for_environment(&self, environment: &str) -> Result<(), ConfigError> {
        let is_production = environment == "production" || environment == "prod";
        check_secret("TEMBANG_JWT_SECRET", &self.jwt_secret, is_production)?;
        check_secret("TEMBANG_REFRESH_TOKEN_SECRET", &self.refresh_secret, is_production)
    }
}

fn check_secret(field: &str, secret: &JwtSecret, is_production: bool) -> Result<(), ConfigError> {
    if secret.is_insecure_default() {
        if is_production {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: "[default]".to_string(),
                reason: "the default secret cannot be used in production".to_string(),
            });
        }
        tracing::warn!(field, "Using an insecure default JWT secret. Set it before deploying.");
    } else if secret.len() < 32 {
        if is_production {
            return Err(ConfigError::InvalidValue {
                field: field.to_string(),
                value: format!("[{} chars]", secret.len()),
                reason: "must be at least 32 characters".to_string(),
            });
        }
        tracing::warn!(
            field,
            length = secret.len(),
            "JWT secret is short. Use at least 32 characters in production."
        );
    }
    Ok(())
}

// ============================================================================
// JWT CLAIMS
// ============================================================================

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Token id, set on refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    pub fn new(user_id: &UserId, expiration_secs: i64, clock: &dyn JwtClock) -> Self {
        let now = clock.now_epoch_secs();
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now + expiration_secs,
            jti: None,
        }
    }

    pub fn is_expired(&self, clock: &dyn JwtClock) -> bool {
        self.exp < clock.now_epoch_secs()
    }

    pub fn user_id(&self) -> UserId {
        UserId::from(self.sub.as_str())
    }
}

// ============================================================================
// AUTHENTICATION CONTEXT
// ============================================================================

/// Authenticated principal, placed in request extensions by the auth
/// middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
}

impl AuthContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

// ============================================================================
// TOKEN VALIDATION
// ============================================================================

fn validate_claim_times(now: i64, exp: i64, leeway_secs: i64) -> ApiResult<()> {
    if exp < now - leeway_secs {
        return Err(ApiError::token_expired());
    }
    Ok(())
}

/// Validate an access token and extract its claims.
///
/// `jsonwebtoken` checks the signature only. Expiry is checked against the
/// configured clock.
pub fn validate_jwt_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    decode_claims(config, &config.jwt_secret, token)
}

/// Validate a refresh token's signature and expiry.
pub fn validate_refresh_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    let claims = decode_claims(config, &config.refresh_secret, token)?;
    if claims.jti.is_none() {
        return Err(ApiError::invalid_token("Token is not a refresh token"));
    }
    Ok(claims)
}

fn decode_claims(config: &AuthConfig, secret: &JwtSecret, token: &str) -> ApiResult<Claims> {
    let decoding_key = DecodingKey::from_secret(secret.expose().as_bytes());

    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.required_spec_claims = std::collections::HashSet::from(["exp".to_string()]);

    let claims = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                ApiError::invalid_token("Token signature is invalid")
            }
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                ApiError::invalid_token("Token is invalid")
            }
            _ => ApiError::invalid_token(format!("Token validation failed: {}", e)),
        })?
        .claims;

    let now = config.clock.now_epoch_secs();
    if now < 0 {
        tracing::error!(timestamp = now, "System clock returned pre-epoch time");
        return Err(ApiError::internal_error("Server time configuration error"));
    }

    validate_claim_times(now, claims.exp, config.jwt_clock_skew_secs)?;

    if claims.sub.trim().is_empty() {
        return Err(ApiError::invalid_token("Token has no subject"));
    }

    Ok(claims)
}

/// Generate a signed access token for a user.
pub fn generate_jwt_token(config: &AuthConfig, user_id: &UserId) -> ApiResult<String> {
    let claims = Claims::new(user_id, config.jwt_expiration_secs, &*config.clock);
    encode_claims(config, &config.jwt_secret, &claims)
}

/// Generate a signed refresh token for a user.
pub fn generate_refresh_token(config: &AuthConfig, user_id: &UserId) -> ApiResult<String> {
    let claims = Claims {
        jti: Some(new_prefixed_id("rt")),
        ..Claims::new(user_id, config.refresh_expiration_secs, &*config.clock)
    };
    encode_claims(config, &config.refresh_secret, &claims)
}

fn encode_claims(config: &AuthConfig, secret: &JwtSecret, claims: &Claims) -> ApiResult<String> {
    let encoding_key = EncodingKey::from_secret(secret.expose().as_bytes());
    let header = Header::new(config.jwt_algorithm);

    encode(&header, claims, &encoding_key)
        .map_err(|e| ApiError::internal_error(format!("Failed to generate token: {}", e)))
}

/// Authenticate a bearer token and build the request's [`AuthContext`].
pub fn authenticate_jwt(config: &AuthConfig, token: &str) -> ApiResult<AuthContext> {
    let claims = validate_jwt_token(config, token)?;
    Ok(AuthContext::new(claims.user_id()))
}

// ============================================================================
// PASSWORD HASHING
// ============================================================================

/// Hash a password into a PHC string. Runs on the blocking pool.
pub async fn hash_password(password: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::internal_error(format!("Failed to hash password: {}", e)))
    })
    .await
    .map_err(|e| ApiError::internal_error(format!("Password hashing task failed: {}", e)))?
}

/// Check a password against a stored PHC hash. A malformed hash never
/// matches.
pub async fn verify_password(password: String, password_hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&password_hash) else {
            tracing::warn!("Stored password hash is not a PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await
    .map_err(|e| ApiError::internal_error(format!("Password check task failed: {}", e)))
}
