use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::AppState;

/// Login entry point unauthenticated page requests are bounced to
pub const LOGIN_PATH: &str = "/auth/login";

/// Coarse pre-check on protected page prefixes: is a session cookie present
/// and non-trivially sized? No cryptographic verification happens here - the
/// cookie is opaque to this layer. Requests that pass still hit the
/// authoritative verifier downstream; this only saves backend work for
/// requests that obviously carry no session.
pub async fn edge_gate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let cookie_ok = session_cookie_value(request.headers(), &state.config.auth.cookie_name)
        .map(|v| v.len() >= state.config.auth.min_cookie_len)
        .unwrap_or(false);

    if cookie_ok {
        next.run(request).await
    } else {
        Redirect::temporary(LOGIN_PATH).into_response()
    }
}

/// Pull one cookie's value out of the Cookie header, if present
fn session_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in raw.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let name = parts.next()?;
        if name == cookie_name {
            return parts.next().map(|v| v.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(raw).unwrap());
        headers
    }

    #[test]
    fn finds_session_cookie_among_others() {
        let headers =
            headers_with_cookie("theme=dark; better-auth.session_token=abcdef0123456789; lang=en");
        let value = session_cookie_value(&headers, "better-auth.session_token");
        assert_eq!(value.as_deref(), Some("abcdef0123456789"));
    }

    #[test]
    fn missing_cookie_is_none() {
        let headers = headers_with_cookie("theme=dark");
        assert!(session_cookie_value(&headers, "better-auth.session_token").is_none());
        assert!(session_cookie_value(&HeaderMap::new(), "better-auth.session_token").is_none());
    }
}
