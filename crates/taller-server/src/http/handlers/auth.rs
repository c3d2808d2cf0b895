//! Login, registration and user administration

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use taller_app::app::{AccountUpdate, Credentials, Registration};

use super::{body, ok, AdminAuth, Body};
use crate::http::de;
use crate::http::{run_blocking, ApiError, AppState};

pub(crate) async fn health() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Body<Credentials>,
) -> Result<Json<Value>, ApiError> {
    let creds = body(payload)?;
    let auth = state.services.auth.clone();
    let user = run_blocking(move || auth.login(&creds)).await?;
    Ok(Json(json!({"ok": true, "user": user})))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    reg_key: Option<String>,
    #[serde(flatten)]
    admin: AdminAuth,
}

pub(crate) async fn register_user(
    State(state): State<AppState>,
    payload: Body<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let registration = Registration {
        username: req.username,
        password: req.password,
        registration_key: req.reg_key.filter(|k| !k.is_empty()),
        admin: req.admin.is_present().then(|| req.admin.credentials()),
    };
    let auth = state.services.auth.clone();
    run_blocking(move || auth.register(&registration)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"ok": true, "message": "Usuario creado"})),
    ))
}

#[derive(Serialize)]
pub(crate) struct ListedUser {
    username: String,
    suspended: bool,
}

pub(crate) async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<ListedUser>>, ApiError> {
    let auth = state.services.auth.clone();
    let users = run_blocking(move || auth.list_users()).await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| ListedUser {
                username: u.username,
                suspended: u.suspended,
            })
            .collect(),
    ))
}

pub(crate) async fn admin_authenticate(
    State(state): State<AppState>,
    payload: Body<AdminAuth>,
) -> Result<Json<Value>, ApiError> {
    let creds = body(payload)?.credentials();
    let auth = state.services.auth.clone();
    run_blocking(move || auth.require_admin(&creds)).await?;
    Ok(ok())
}

pub(crate) async fn admin_list(
    State(state): State<AppState>,
    payload: Body<AdminAuth>,
) -> Result<Json<Value>, ApiError> {
    let creds = body(payload)?.credentials();
    let auth = state.services.auth.clone();
    let users = run_blocking(move || auth.admin_list(&creds)).await?;
    Ok(Json(json!({"ok": true, "users": users})))
}

#[derive(Deserialize)]
pub(crate) struct AdminUserRequest {
    #[serde(flatten)]
    auth: AdminAuth,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: Option<String>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    suspended: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    admin: Option<bool>,
}

pub(crate) async fn admin_create(
    State(state): State<AppState>,
    payload: Body<AdminUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let creds = req.auth.credentials();
    let auth = state.services.auth.clone();
    run_blocking(move || {
        auth.admin_create(
            &creds,
            &req.username,
            req.password.as_deref().unwrap_or(""),
            req.admin.unwrap_or(false),
        )
    })
    .await?;
    Ok((StatusCode::CREATED, ok()))
}

pub(crate) async fn admin_update(
    State(state): State<AppState>,
    payload: Body<AdminUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let creds = req.auth.credentials();
    let update = AccountUpdate {
        password: req.password.filter(|p| !p.is_empty()),
        suspended: req.suspended,
        admin: req.admin,
    };
    let auth = state.services.auth.clone();
    let username = req.username;
    run_blocking(move || auth.admin_update(&creds, &username, &update)).await?;
    Ok(ok())
}

pub(crate) async fn admin_delete(
    State(state): State<AppState>,
    payload: Body<AdminUserRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let creds = req.auth.credentials();
    let auth = state.services.auth.clone();
    run_blocking(move || auth.admin_delete(&creds, &req.username)).await?;
    Ok(ok())
}
