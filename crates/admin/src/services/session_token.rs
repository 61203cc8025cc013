//! Shopify session token verification.
//!
//! App Bridge sends a short-lived HS256 JWT, signed with the app's client
//! secret, on every admin request. The token names the shop in its `dest`
//! claim and carries the app's client ID as `aud`.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use quotebox_core::ShopDomain;

use crate::config::ShopifyAppConfig;
use crate::models::CurrentShop;

/// Clock skew allowed on `exp` and `nbf`, in seconds.
const LEEWAY_SECS: u64 = 5;

/// Session token claims as issued by Shopify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokenClaims {
    /// Shop admin URL, e.g. `https://acme.myshopify.com/admin`.
    pub iss: String,
    /// Shop URL, e.g. `https://acme.myshopify.com`.
    pub dest: String,
    /// App client ID.
    pub aud: String,
    /// Shopify user ID.
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
    pub nbf: i64,
    pub iat: i64,
    #[serde(default)]
    pub jti: Option<String>,
    /// Shopify session ID.
    #[serde(default)]
    pub sid: Option<String>,
}

impl SessionTokenClaims {
    /// Claims for `shop` valid for `ttl_secs` from now.
    #[must_use]
    pub fn for_shop(shop: &ShopDomain, api_key: &str, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            iss: format!("https://{shop}/admin"),
            dest: format!("https://{shop}"),
            aud: api_key.to_owned(),
            sub: None,
            exp: now + ttl_secs,
            nbf: now,
            iat: now,
            jti: None,
            sid: None,
        }
    }
}

/// Reasons a session token is rejected.
#[derive(Debug, Error)]
pub enum SessionTokenError {
    /// Bad signature, expired, wrong audience, or malformed.
    #[error("invalid session token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    /// `dest` is not a shop URL.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// `iss` points at a different host than `dest`.
    #[error("issuer does not match destination")]
    IssuerMismatch,
}

impl SessionTokenError {
    /// Returns true if the token had expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Invalid(e) if matches!(e.kind(), ErrorKind::ExpiredSignature))
    }
}

/// Verifies (and, for tests and local tooling, signs) session tokens.
#[derive(Clone)]
pub struct SessionTokenVerifier {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
}

impl std::fmt::Debug for SessionTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenVerifier")
            .field("keys", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl SessionTokenVerifier {
    /// Build a verifier for the app's client ID and secret.
    #[must_use]
    pub fn new(config: &ShopifyAppConfig) -> Self {
        let secret = config.secret_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[config.api_key.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "aud"]);
        validation.validate_nbf = true;
        validation.leeway = LEEWAY_SECS;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
        }
    }

    /// Verify a token and resolve the shop it was issued for.
    ///
    /// # Errors
    ///
    /// Returns `SessionTokenError` if the signature, timing or audience is
    /// wrong, or if `dest` and `iss` do not name the same shop.
    pub fn verify(&self, token: &str) -> Result<CurrentShop, SessionTokenError> {
        let claims = decode::<SessionTokenClaims>(token, &self.decoding_key, &self.validation)?
            .claims;

        let shop = host_of(&claims.dest)
            .and_then(|host| ShopDomain::parse(&host).ok())
            .ok_or_else(|| SessionTokenError::InvalidDestination(claims.dest.clone()))?;

        let issuer_host = host_of(&claims.iss).ok_or(SessionTokenError::IssuerMismatch)?;
        if !issuer_host.eq_ignore_ascii_case(shop.as_str()) {
            return Err(SessionTokenError::IssuerMismatch);
        }

        Ok(CurrentShop {
            shop,
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }

    /// Sign claims with the app secret.
    ///
    /// # Errors
    ///
    /// Returns `SessionTokenError::Invalid` if encoding fails.
    pub fn sign(&self, claims: &SessionTokenClaims) -> Result<String, SessionTokenError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }
}

fn host_of(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
}
