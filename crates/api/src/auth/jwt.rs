//! Verification of the tokens that identify history owners.
//!
//! Users sign in with a separate auth service, which hands the browser an
//! HS256 token whose `sub` is the user id. The history routes only check
//! that signature against the shared `JWT_SECRET`. Minting here is limited
//! to tests and local tooling.

use bugfinder_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of an owner token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Owner id; stored as `owner_id` on every saved record.
    pub sub: DbId,
    /// Expiry, Unix seconds.
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    /// Random per-token id. Not checked here, and may be absent.
    #[serde(default)]
    pub jti: String,
}

/// Secret shared with the auth service.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Lifetime of locally minted tokens, in minutes.
    pub access_token_expiry_mins: i64,
}

/// One week, matching the auth service's sessions.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 60 * 24 * 7;

impl JwtConfig {
    /// Read the shared secret from the environment.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `10080` |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Mint a token naming `user_id` as owner.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.access_token_expiry_mins * 60;

    let claims = Claims {
        sub: user_id,
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry and return the claims.
///
/// Expiry is checked with `jsonwebtoken`'s default 60 second leeway.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
