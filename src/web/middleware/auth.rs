//! Session authentication middleware.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::{SessionStore, SESSION_COOKIE};
use crate::web::error::ApiError;

/// The authenticated user resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// User ID.
    pub user_id: i64,
    /// Username.
    pub username: String,
    /// Session token backing this request.
    pub token: String,
}

/// Extractor for authenticated users.
///
/// Resolves the session cookie against the [`SessionStore`] injected by
/// [`session_auth`]; rejects the request with 401 when the cookie is
/// missing, unknown, or expired.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = session_token(parts)
                .ok_or_else(|| ApiError::unauthorized("Not logged in"))?;

            let store = parts
                .extensions
                .get::<SessionStore>()
                .ok_or_else(|| ApiError::internal("Session store not configured"))?;

            let session = store
                .get(&token)
                .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

            Ok(AuthUser(SessionUser {
                user_id: session.user_id,
                username: session.username,
                token: session.token,
            }))
        })
    }
}

/// Pull the session token out of the Cookie header.
fn session_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Some(value.to_string())
        } else {
            None
        }
    })
}

/// Middleware function injecting the session store into request extensions.
pub async fn session_auth(
    store: SessionStore,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(store);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts_with_cookie(cookie: &str) -> Parts {
        let request = HttpRequest::builder()
            .uri("/api/feeds")
            .header(COOKIE, cookie)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    #[test]
    fn test_session_token_found() {
        let parts = parts_with_cookie("feedmill_session=abc123");
        assert_eq!(session_token(&parts), Some("abc123".to_string()));
    }

    #[test]
    fn test_session_token_among_other_cookies() {
        let parts = parts_with_cookie("theme=dark; feedmill_session=tok; lang=en");
        assert_eq!(session_token(&parts), Some("tok".to_string()));
    }

    #[test]
    fn test_session_token_absent() {
        let parts = parts_with_cookie("theme=dark");
        assert_eq!(session_token(&parts), None);
    }

    #[test]
    fn test_session_token_no_cookie_header() {
        let request = HttpRequest::builder().uri("/").body(()).unwrap();
        let parts = request.into_parts().0;
        assert_eq!(session_token(&parts), None);
    }
}
