//! Vehicle to filter catalog endpoints

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::{run_blocking, ApiError, AppState};

#[derive(Deserialize)]
pub(crate) struct VehicleQuery {
    marca: Option<String>,
    modelo: Option<String>,
    motor: Option<String>,
}

pub(crate) async fn makes(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let quotes = state.services.quotes.clone();
    let makes = run_blocking(move || quotes.catalog_makes()).await?;
    Ok(Json(json!({"ok": true, "data": makes})))
}

pub(crate) async fn models(
    State(state): State<AppState>,
    query: Result<Query<VehicleQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let quotes = state.services.quotes.clone();
    let models = run_blocking(move || quotes.catalog_models(q.marca.as_deref())).await?;
    Ok(Json(json!({"ok": true, "data": models})))
}

pub(crate) async fn engines(
    State(state): State<AppState>,
    query: Result<Query<VehicleQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let quotes = state.services.quotes.clone();
    let engines =
        run_blocking(move || quotes.catalog_engines(q.marca.as_deref(), q.modelo.as_deref()))
            .await?;
    Ok(Json(json!({"ok": true, "data": engines})))
}

pub(crate) async fn selection(
    State(state): State<AppState>,
    query: Result<Query<VehicleQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let quotes = state.services.quotes.clone();
    let selection = run_blocking(move || {
        quotes.filters_for(
            q.marca.as_deref().unwrap_or(""),
            q.modelo.as_deref().unwrap_or(""),
            q.motor.as_deref().unwrap_or(""),
        )
    })
    .await?;
    Ok(Json(json!({"ok": true, "filtros": selection})))
}
