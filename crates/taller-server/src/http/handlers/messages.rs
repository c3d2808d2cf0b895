//! Internal inbox endpoints
//!
//! Every request carries the caller's `username`/`password`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use taller_app::app::Credentials;
use taller_domain::model::ReadFilter;

use super::{body, ok, Body};
use crate::http::de;
use crate::http::{run_blocking, ApiError, AppState};

#[derive(Deserialize)]
pub(crate) struct MessageRequest {
    #[serde(flatten)]
    caller: Credentials,
    #[serde(default)]
    destinatario: String,
    #[serde(default)]
    asunto: String,
    #[serde(default)]
    mensaje: String,
    #[serde(default)]
    buscar: Option<String>,
    #[serde(default)]
    estado: Option<ReadFilter>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    id: Option<u64>,
}

impl MessageRequest {
    fn id(&self) -> Result<u64, ApiError> {
        self.id.ok_or_else(|| ApiError::bad_request("Falta id de mensaje"))
    }
}

pub(crate) async fn send(
    State(state): State<AppState>,
    payload: Body<MessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let messages = state.services.messages.clone();
    let sent = run_blocking(move || {
        messages.send(&req.caller, &req.destinatario, &req.asunto, &req.mensaje)
    })
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"ok": true, "mensaje": sent})),
    ))
}

pub(crate) async fn inbox(
    State(state): State<AppState>,
    payload: Body<MessageRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let messages = state.services.messages.clone();
    let (listed, unread) = run_blocking(move || {
        messages.inbox(
            &req.caller,
            req.buscar.as_deref(),
            req.estado.unwrap_or_default(),
        )
    })
    .await?;
    Ok(Json(json!({"ok": true, "mensajes": listed, "noLeidos": unread})))
}

pub(crate) async fn sent(
    State(state): State<AppState>,
    payload: Body<MessageRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let messages = state.services.messages.clone();
    let listed = run_blocking(move || messages.sent(&req.caller, req.buscar.as_deref())).await?;
    Ok(Json(json!({"ok": true, "mensajes": listed})))
}

pub(crate) async fn mark_read(
    State(state): State<AppState>,
    payload: Body<MessageRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let id = req.id()?;
    let messages = state.services.messages.clone();
    run_blocking(move || messages.mark_read(&req.caller, id)).await?;
    Ok(ok())
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    payload: Body<MessageRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let id = req.id()?;
    let messages = state.services.messages.clone();
    run_blocking(move || messages.delete(&req.caller, id)).await?;
    Ok(ok())
}

