//! Registration and login.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::http::{ApiError, AppState, JsonBody, MessageBody};
use crate::store::NewUser;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub role: String,
}

/// Absent and empty both count as missing.
fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<Json<MessageBody>, ApiError> {
    tracing::info!(username = ?body.username, role = ?body.role, "Incoming registration");

    let (Some(username), Some(password), Some(role)) =
        (present(body.username), present(body.password), present(body.role))
    else {
        return Err(ApiError::Validation("Missing fields"));
    };

    let hasher = state.hasher.clone();
    let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| ApiError::operation("Error hashing password", "register", e))?
        .map_err(|e| ApiError::operation("Error hashing password", "register", e))?;

    let user = NewUser {
        username,
        password: hashed,
        role: role.to_lowercase(),
    };
    state
        .store
        .insert_user(&user)
        .await
        .map_err(|e| ApiError::operation("Registration failed", "register", e))?;

    tracing::info!(username = %user.username, role = %user.role, "Registered user");
    Ok(Json(MessageBody::new("Registered successfully")))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    tracing::info!(username = ?body.username, "Login attempt");

    let (Some(username), Some(password)) = (present(body.username), present(body.password)) else {
        return Err(ApiError::Validation("Missing credentials"));
    };

    let user = state
        .store
        .find_user(&username)
        .await
        .map_err(|e| ApiError::operation("Login failed", "login", e))?;
    let Some(user) = user else {
        tracing::warn!(username = %username, "No user found");
        return Err(ApiError::Unauthorized);
    };

    let hasher = state.hasher.clone();
    let stored = user.password.clone();
    let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
        .await
        .map_err(|e| ApiError::operation("Login failed", "login", e))?
        .map_err(|e| ApiError::operation("Login failed", "login", e))?;
    if !matched {
        tracing::warn!(username = %username, "Password mismatch");
        return Err(ApiError::Unauthorized);
    }

    tracing::info!(username = %username, "Login successful");
    Ok(Json(LoginResponse { role: user.role }))
}
