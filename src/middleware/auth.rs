use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::user::{Role, User};

pub const SESSION_COOKIE: &str = "quiz_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        Role::parse(&self.role) == Role::Admin
    }
}

pub fn issue_token(user: &User) -> Result<String> {
    let config = crate::config::get_config();
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(config.session_ttl_secs))
        .ok_or_else(|| Error::Internal("session expiry overflow".to_string()))?
        .timestamp() as usize;
    let claims = Claims {
        sub: user.username.clone(),
        role: user.role.as_str().to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("token signing failed: {}", e)))
}

/// Session cookie carrying the signed token. HttpOnly so browser scripts
/// never see it; API clients may send the same token as a bearer header.
pub fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

fn token_from_request(req: &Request) -> Option<String> {
    if let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }
    CookieJar::from_headers(req.headers())
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

fn decode_claims(token: &str) -> Option<Claims> {
    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

pub async fn require_session(mut req: Request, next: Next) -> Response {
    let Some(token) = token_from_request(&req) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_session"})),
        )
            .into_response();
    };
    match decode_claims(&token) {
        Some(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_session"})),
        )
            .into_response(),
    }
}

pub async fn require_admin(mut req: Request, next: Next) -> Response {
    let Some(token) = token_from_request(&req) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_session"})),
        )
            .into_response();
    };
    match decode_claims(&token) {
        Some(claims) => {
            if !claims.is_admin() {
                return (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response();
            }
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_session"})),
        )
            .into_response(),
    }
}
