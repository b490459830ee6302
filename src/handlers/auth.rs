use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;

use crate::{
    error::AppError,
    extract::AppJson,
    models::user::{AuthResponse, LoginPayload, RegisterPayload, SessionStatus, StatusMessage},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterPayload>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginPayload>,
) -> Result<(CookieJar, Json<StatusMessage>), AppError> {
    let (jar, body) = state.auth.login(jar, payload).await?;
    Ok((jar, Json(body)))
}

pub async fn verify(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SessionStatus>) {
    let (jar, status) = state.auth.verify_session(jar);
    (jar, Json(status))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<StatusMessage>) {
    let (jar, body) = state.auth.logout(jar);
    (jar, Json(body))
}
