//! Editor authentication middleware.
//!
//! Guards editor-only endpoints with `Authorization: Bearer <token>`,
//! checked against the configured editor tokens:
//! - Valid token -> request passes through
//! - Missing or unknown token -> 401 JSON error
//! - No tokens configured -> allowed only in the local environment

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Middleware requiring an editor bearer token.
pub async fn require_editor(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let config = state.config();

    if config.editor_tokens.is_empty() {
        if config.environment.is_local() {
            return next.run(request).await;
        }
        debug!("editor endpoint requested but no editor tokens are configured");
        return unauthorized();
    }

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let Some(token) = token else {
        debug!("missing editor bearer token");
        return unauthorized();
    };

    if is_valid_token(&config.editor_tokens, token) {
        next.run(request).await
    } else {
        debug!("invalid editor bearer token");
        unauthorized()
    }
}

/// Compare against every configured token in constant time.
fn is_valid_token(tokens: &[String], presented: &str) -> bool {
    tokens.iter().fold(false, |found, token| {
        found | bool::from(token.as_bytes().ct_eq(presented.as_bytes()))
    })
}

fn unauthorized() -> Response {
    let mut response = AppError::Unauthorized.into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn token_must_match_exactly() {
        let tokens = vec!["alpha".to_string(), "beta".to_string()];
        assert!(is_valid_token(&tokens, "beta"));
        assert!(!is_valid_token(&tokens, "bet"));
        assert!(!is_valid_token(&tokens, "betaa"));
        assert!(!is_valid_token(&tokens, ""));
        assert!(!is_valid_token(&[], "alpha"));
    }

    #[test]
    fn unauthorized_advertises_bearer() {
        let response = unauthorized();
        assert_eq!(response.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
