use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time},
};

use crate::{
    config::{AppConfig, Env},
    error::AppError,
};

/// Name of the cookie holding the signed session.
pub const SESSION_COOKIE_NAME: &str = "reminders_session";

/// Claims
///
/// Payload of the signed session token stored in the `reminders_session` cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the username the session was issued to.
    pub sub: String,
    /// Expiration Time (exp): seconds since the epoch.
    pub exp: i64,
    /// Issued At (iat): seconds since the epoch.
    pub iat: i64,
}

/// AuthCookie
///
/// The identity of a logged-in caller, derived fresh on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCookie {
    pub username: String,
}

/// AuthResult
///
/// Outcome of resolving the session cookie. Route guards branch on this value
/// instead of raising an error: the composer turns `Unauthenticated` into a
/// login redirect for pages and into a 401 for the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authenticated(AuthCookie),
    Unauthenticated,
}

impl AuthResult {
    pub fn cookie(&self) -> Option<&AuthCookie> {
        match self {
            AuthResult::Authenticated(cookie) => Some(cookie),
            AuthResult::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthResult::Authenticated(_))
    }
}

/// AuthResult Extractor
///
/// Reads the session cookie and validates it against the configured secret and
/// user table. Never rejects: a missing cookie manager, a missing cookie or a
/// bad token all resolve to `Unauthenticated`.
impl<S> FromRequestParts<S> for AuthResult
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let Ok(cookies) = Cookies::from_request_parts(parts, state).await else {
            tracing::warn!("cookie manager layer missing; treating request as anonymous");
            return Ok(AuthResult::Unauthenticated);
        };

        Ok(resolve_auth_cookie(&cookies, &config))
    }
}

/// Resolves the caller's identity from the request cookies.
pub fn resolve_auth_cookie(cookies: &Cookies, config: &AppConfig) -> AuthResult {
    cookies
        .get(SESSION_COOKIE_NAME)
        .and_then(|cookie| decode_session_token(config, cookie.value()))
        .map_or(AuthResult::Unauthenticated, AuthResult::Authenticated)
}

/// issue_session_token
///
/// Signs a session for `username` that expires after the configured max age.
pub fn issue_session_token(config: &AppConfig, username: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = Duration::try_hours(config.session_max_age_hours)
        .and_then(|max_age| now.checked_add_signed(max_age))
        .ok_or_else(|| {
            AppError::Session(format!(
                "session max age of {} hours is out of range",
                config.session_max_age_hours
            ))
        })?;

    let claims = Claims {
        sub: username.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    let key = EncodingKey::from_secret(config.session_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| AppError::Session(e.to_string()))
}

/// decode_session_token
///
/// Validates signature and expiry. A token for a user that is no longer
/// configured is rejected as well.
pub fn decode_session_token(config: &AppConfig, token: &str) -> Option<AuthCookie> {
    let key = DecodingKey::from_secret(config.session_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    let data = match decode::<Claims>(token, &key, &validation) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(error = %e, "rejected session token");
            return None;
        }
    };

    let username = data.claims.sub;
    if !config.users.contains_key(&username) {
        tracing::debug!(%username, "session for unknown user");
        return None;
    }
    Some(AuthCookie { username })
}

/// Checks a login attempt against the configured users in constant time.
pub fn verify_credentials(config: &AppConfig, username: &str, password: &str) -> bool {
    match config.users.get(username) {
        Some(expected) => expected.as_bytes().ct_eq(password.as_bytes()).into(),
        None => false,
    }
}

/// Builds the session cookie carrying `token`.
pub fn create_session_cookie(config: &AppConfig, token: &str) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.env == Env::Production)
        .same_site(SameSite::Lax)
        // Saturates instead of panicking on an oversized lifetime.
        .max_age(time::Duration::seconds(
            config.session_max_age_hours.saturating_mul(3600),
        ))
        .build()
}

/// Builds a cookie that clears the session (for logout).
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build()
}
