//! Google ID token verification.
//!
//! The assertion is trusted only after its signature checks out against
//! Google's published JWKS and the issuer/audience/expiry claims validate.
//! Keys are cached in-process; a key rotation shows up within the cache TTL.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use std::sync::LazyLock;
use tokio::sync::Mutex;

use super::config::{GOOGLE_ISSUERS, GOOGLE_JWKS_URL, OAUTH2_GOOGLE_CLIENT_ID};
use super::errors::OAuth2Error;
use super::types::{IdInfo, Jwk, Jwks};

const JWKS_CACHE_TTL_SECS: i64 = 600;

struct JwksCache {
    jwks: Jwks,
    expires_at: DateTime<Utc>,
}

static JWKS_CACHE: LazyLock<Mutex<Option<JwksCache>>> = LazyLock::new(|| Mutex::new(None));

async fn fetch_jwks() -> Result<Jwks, OAuth2Error> {
    let mut cache = JWKS_CACHE.lock().await;

    if let Some(cached) = cache.as_ref() {
        if cached.expires_at > Utc::now() {
            return Ok(cached.jwks.clone());
        }
    }

    let resp = reqwest::get(GOOGLE_JWKS_URL.as_str())
        .await
        .map_err(|e| OAuth2Error::JwksFetch(e.to_string()))?;
    let jwks: Jwks = resp
        .json()
        .await
        .map_err(|e| OAuth2Error::JwksFetch(e.to_string()))?;

    tracing::debug!("Fetched {} JWKS keys from Google", jwks.keys.len());

    *cache = Some(JwksCache {
        jwks: jwks.clone(),
        expires_at: Utc::now() + Duration::seconds(JWKS_CACHE_TTL_SECS),
    });

    Ok(jwks)
}

fn decoding_key_from_jwk(jwk: &Jwk) -> Result<DecodingKey, OAuth2Error> {
    if jwk.kty != "RSA" {
        return Err(OAuth2Error::UnsupportedAlgorithm(jwk.kty.clone()));
    }

    let n = jwk
        .n
        .as_deref()
        .ok_or_else(|| OAuth2Error::MissingKeyComponent("n".to_string()))?;
    let e = jwk
        .e
        .as_deref()
        .ok_or_else(|| OAuth2Error::MissingKeyComponent("e".to_string()))?;

    DecodingKey::from_rsa_components(n, e).map_err(|e| OAuth2Error::IdToken(e.to_string()))
}

/// Validate a Google ID token and return its verified claims.
///
/// Checks, in order: token header parses, a JWKS key matches the header kid,
/// the RS256 signature verifies, and iss/aud/exp are acceptable.
pub async fn verify_google_id_token(id_token: &str) -> Result<IdInfo, OAuth2Error> {
    let header =
        decode_header(id_token).map_err(|e| OAuth2Error::IdToken(e.to_string()))?;

    if header.alg != Algorithm::RS256 {
        return Err(OAuth2Error::UnsupportedAlgorithm(format!("{:?}", header.alg)));
    }

    let kid = header
        .kid
        .ok_or_else(|| OAuth2Error::IdToken("Missing kid in token header".to_string()))?;

    let jwks = fetch_jwks().await?;
    let jwk = jwks
        .keys
        .iter()
        .find(|key| key.kid == kid)
        .ok_or(OAuth2Error::NoMatchingKey)?;

    let key = decoding_key_from_jwk(jwk)?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[OAUTH2_GOOGLE_CLIENT_ID.as_str()]);
    validation.set_issuer(&GOOGLE_ISSUERS);

    let idinfo = decode::<IdInfo>(id_token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| OAuth2Error::IdToken(e.to_string()))?;

    Ok(idinfo)
}
