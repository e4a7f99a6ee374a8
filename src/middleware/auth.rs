use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::auth::SessionCookies;
use crate::error::ApiError;
use crate::state::AppState;

/// Principal behind a verified session cookie.
///
/// Extracting it runs the first half of the authorization gate: a missing or
/// unverifiable credential rejects the request with 401 before the handler
/// body runs. Owner-scoped handlers then call [`AuthUser::ensure_identity`].
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub email: String,
}

impl AuthUser {
    /// Second half of the gate: the requested owner must be the caller.
    pub fn ensure_identity(&self, requested: Option<&str>) -> Result<(), ApiError> {
        if requested == Some(self.email.as_str()) {
            Ok(())
        } else {
            tracing::warn!("Owner mismatch: session '{}' requested '{}'", self.email, requested.unwrap_or_default());
            Err(ApiError::forbidden("forbidden access"))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);

        let token = SessionCookies::read(&jar).ok_or_else(|| ApiError::unauthorized("unauthorized access"))?;
        let email = state.tokens.verify(&token).map_err(|e| {
            tracing::warn!("Session cookie rejected: {}", e);
            ApiError::from(e)
        })?;

        Ok(AuthUser { email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::http::{header, Request, StatusCode};
    use chrono::{Duration, Utc};

    use crate::auth::TokenIssuer;
    use crate::config::Environment;
    use crate::database::MemoryStore;

    fn state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
            tokens: Arc::new(TokenIssuer::new("gate-secret", Duration::hours(1))),
            cookies: SessionCookies::new(Environment::Development),
        }
    }

    fn parts(cookie: Option<String>) -> Parts {
        let mut builder = Request::builder();
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn missing_cookie_is_unauthorized() {
        let mut parts = parts(None);
        let err = AuthUser::from_request_parts(&mut parts, &state()).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn expired_cookie_is_unauthorized() {
        let state = state();
        let token = state.tokens.issue_at("a@b.c", Utc::now() - Duration::hours(2)).unwrap();
        let mut parts = parts(Some(format!("token={}", token)));
        let err = AuthUser::from_request_parts(&mut parts, &state).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_cookie_yields_identity() {
        let state = state();
        let token = state.tokens.issue("a@b.c").unwrap();
        let mut parts = parts(Some(format!("theme=dark; token={}", token)));
        let user = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.email, "a@b.c");
    }

    #[test]
    fn identity_mismatch_is_forbidden() {
        let user = AuthUser { email: "a@b.c".to_string() };
        assert!(user.ensure_identity(Some("a@b.c")).is_ok());
        assert_eq!(user.ensure_identity(Some("x@y.z")).unwrap_err().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(user.ensure_identity(None).unwrap_err().status_code(), StatusCode::FORBIDDEN);
    }
}
