//! Price list and quote endpoints

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use taller_domain::model::QuoteRequestLine;

use super::{body, Body};
use crate::http::de;
use crate::http::{run_blocking, ApiError, AppState};

#[derive(Deserialize)]
pub(crate) struct StockQuery {
    codigo: Option<String>,
}

pub(crate) async fn stock(
    State(state): State<AppState>,
    query: Result<Query<StockQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let code = query?.0.codigo.unwrap_or_default();
    let quotes = state.services.quotes.clone();
    let item = run_blocking(move || quotes.lookup(&code)).await?;
    Ok(Json(match item {
        Some(item) => json!({
            "ok": true,
            "encontrado": true,
            "data": {
                "codigo": item.code,
                "descripcion": item.description,
                "precioUnidad": item.unit_price,
                "existencia": item.stock,
            }
        }),
        None => json!({"ok": true, "encontrado": false}),
    }))
}

#[derive(Deserialize)]
pub(crate) struct PartsQuery {
    q: Option<String>,
    categoria: Option<String>,
}

pub(crate) async fn search(
    State(state): State<AppState>,
    query: Result<Query<PartsQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(q) = query?;
    let quotes = state.services.quotes.clone();
    let items = run_blocking(move || {
        quotes.search(q.q.as_deref().unwrap_or(""), q.categoria.as_deref())
    })
    .await?;
    Ok(Json(json!({"ok": true, "data": items})))
}

pub(crate) async fn oils(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let quotes = state.services.quotes.clone();
    let items = run_blocking(move || quotes.oils()).await?;
    Ok(Json(json!({"ok": true, "data": items})))
}

pub(crate) async fn accessories(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let quotes = state.services.quotes.clone();
    let items = run_blocking(move || quotes.accessories()).await?;
    Ok(Json(json!({"ok": true, "data": items})))
}

#[derive(Deserialize)]
pub(crate) struct CartLine {
    #[serde(default)]
    codigo: String,
    #[serde(default, deserialize_with = "de::opt_f64")]
    cantidad: Option<f64>,
}

#[derive(Deserialize)]
pub(crate) struct QuoteRequest {
    #[serde(default)]
    items: Vec<CartLine>,
}

pub(crate) async fn quote(
    State(state): State<AppState>,
    payload: Body<QuoteRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let mut lines = Vec::with_capacity(req.items.len());
    for line in req.items {
        let cantidad = line
            .cantidad
            .ok_or_else(|| ApiError::bad_request(format!("Cantidad inválida para {}", line.codigo)))?;
        lines.push(QuoteRequestLine {
            codigo: line.codigo,
            cantidad,
        });
    }
    let quotes = state.services.quotes.clone();
    let quote = run_blocking(move || quotes.quote(&lines)).await?;
    Ok(Json(json!({"ok": true, "lineas": quote.lineas, "total": quote.total})))
}
