use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::repository::UserRepository;
use service::expense::repository::ExpenseRepository;
use service::expense::ExpenseService;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub auth: ServerAuthConfig,
    pub users: Arc<dyn UserRepository>,
    pub expenses: Arc<ExpenseService<dyn ExpenseRepository>>,
}

/// Claims of tokens issued by the login service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub uid: Uuid,
    pub exp: usize,
}

/// Bearer token from `Authorization`, falling back to the `auth_token` cookie.
/// `Err(())` means an Authorization header that is not `Bearer`.
fn extract_token(req: &Request) -> Result<Option<String>, ()> {
    if let Some(h) = req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(token) => Ok(Some(token.trim().to_string())),
            None => Err(()),
        };
    }
    let cookie_header = req.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or("");
    Ok(cookie_header
        .split(';')
        .filter_map(|part| part.trim().strip_prefix("auth_token="))
        .find(|t| !t.is_empty())
        .map(str::to_string))
}

/// Verifies the HS256 token and puts the active user into request extensions
/// as a `CurrentUser`. Missing token is 400; bad, expired, or unknown user is 401.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path().to_string();

    let token = match extract_token(&req) {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
            return Err(StatusCode::BAD_REQUEST);
        }
        Err(()) => {
            tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let key = DecodingKey::from_secret(state.auth.jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let claims = match decode::<Claims>(&token, &key, &validation) {
        Ok(data) => data.claims,
        Err(e) => {
            tracing::error!(path = %path, err = %e, "token validation failed");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let user = match state.users.find_active(claims.uid).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(path = %path, user_id = %claims.uid, "token for unknown or deleted user");
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(e) => {
            tracing::error!(path = %path, err = %e, "user lookup failed");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
