//! Client card endpoints

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use taller_app::app::NewClient;
use taller_domain::model::{ClientChanges, ClientRecord};

use super::{body, ok, AdminAuth, Body};
use crate::http::de;
use crate::http::{run_blocking, ApiError, AppState};

pub(crate) async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientRecord>>, ApiError> {
    let clients = state.services.clients.clone();
    Ok(Json(run_blocking(move || clients.list()).await?))
}

#[derive(Deserialize)]
pub(crate) struct SearchQuery {
    name: Option<String>,
    email: Option<String>,
}

pub(crate) async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<ClientRecord>>, ApiError> {
    let Query(q) = query?;
    let clients = state.services.clients.clone();
    let found = run_blocking(move || clients.search(q.name.as_deref(), q.email.as_deref())).await?;
    Ok(Json(found))
}

#[derive(Deserialize)]
pub(crate) struct SurnameQuery {
    apellido: Option<String>,
}

pub(crate) async fn count_by_surname(
    State(state): State<AppState>,
    query: Result<Query<SurnameQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let clients = state.services.clients.clone();
    let surname = q.apellido.unwrap_or_default();
    let count = run_blocking(move || clients.count_by_surname(&surname)).await?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Deserialize)]
pub(crate) struct ClientRequest {
    #[serde(default, deserialize_with = "de::opt_u64")]
    id: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    nombre: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    telefono: Option<String>,
    #[serde(flatten)]
    auth: AdminAuth,
}

impl ClientRequest {
    fn id(&self) -> Result<usize, ApiError> {
        self.id
            .and_then(|id| usize::try_from(id).ok())
            .ok_or_else(|| ApiError::bad_request("Falta id de cliente"))
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Body<ClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let input = NewClient {
        name: req.nombre.unwrap_or_default(),
        email: req.email.unwrap_or_default(),
        phone: req.telefono,
    };
    let clients = state.services.clients.clone();
    let id = run_blocking(move || clients.create(&input)).await?;
    Ok((StatusCode::CREATED, Json(json!({"ok": true, "id": id}))))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    payload: Body<ClientRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let id = req.id()?;
    let changes = ClientChanges {
        name: req.nombre,
        email: req.email,
        phone: req.telefono,
    };
    let clients = state.services.clients.clone();
    let record = run_blocking(move || clients.update(id, &changes)).await?;
    Ok(Json(json!({"ok": true, "cliente": record})))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    payload: Body<ClientRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let id = req.id()?;
    let creds = req.auth.credentials();
    let clients = state.services.clients.clone();
    run_blocking(move || clients.delete(id, &creds)).await?;
    Ok(ok())
}
