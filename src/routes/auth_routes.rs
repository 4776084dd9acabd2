use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::auth_dto::{LoginPayload, RegisterPayload, RegisterResponse, SessionResponse},
    error::Result,
    middleware::auth::{issue_token, session_cookie, SESSION_COOKIE},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterPayload,
    responses(
        (status = 201, description = "Account created"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Username already taken")
    )
)]
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.auth_service.register(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            username: user.username,
            fullname: user.fullname,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Session issued"),
        (status = 401, description = "Invalid credentials")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state
        .auth_service
        .verify_credentials(&payload.username, &payload.password)
        .await?;
    let token = issue_token(&user)?;
    let jar = jar.add(session_cookie(token.clone()));
    Ok((
        jar,
        Json(SessionResponse {
            username: user.username,
            fullname: user.fullname,
            role: user.role,
            token,
        }),
    ))
}

#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    (jar.remove(removal), Json(json!({ "logged_out": true })))
}
