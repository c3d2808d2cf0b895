//! Vehicle endpoints

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use taller_domain::model::{NewVehicle, Vehicle, VehicleChanges};

use super::{body, ok, AdminAuth, Body};
use crate::http::de;
use crate::http::{run_blocking, ApiError, AppState};

pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let vehicles = state.services.vehicles.clone();
    Ok(Json(run_blocking(move || vehicles.list()).await?))
}

#[derive(Deserialize)]
pub(crate) struct PlateQuery {
    patente: Option<String>,
}

pub(crate) async fn search(
    State(state): State<AppState>,
    query: Result<Query<PlateQuery>, QueryRejection>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let plate = query?.0.patente.unwrap_or_default();
    let vehicles = state.services.vehicles.clone();
    Ok(Json(run_blocking(move || vehicles.search(&plate)).await?))
}

pub(crate) async fn history(
    State(state): State<AppState>,
    query: Result<Query<PlateQuery>, QueryRejection>,
) -> Result<Json<Vec<Vehicle>>, ApiError> {
    let plate = query?.0.patente.unwrap_or_default();
    let vehicles = state.services.vehicles.clone();
    Ok(Json(run_blocking(move || vehicles.history(&plate)).await?))
}

pub(crate) async fn next_id(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let vehicles = state.services.vehicles.clone();
    let next = run_blocking(move || vehicles.next_id()).await?;
    Ok(Json(json!({ "nextId": next })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VehicleRequest {
    #[serde(default, deserialize_with = "de::opt_u64")]
    idauto: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_string")]
    patente: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    marca: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    modelo: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    kilometraje: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    tipo_aceite: Option<String>,
    #[serde(default, deserialize_with = "de::opt_string")]
    fecha: Option<String>,
    #[serde(flatten)]
    auth: AdminAuth,
}

impl VehicleRequest {
    fn id(&self) -> Result<u64, ApiError> {
        self.idauto
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::bad_request("Falta idauto"))
    }
}

pub(crate) async fn create(
    State(state): State<AppState>,
    payload: Body<VehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body(payload)?;
    let vehicle = NewVehicle {
        id: req.idauto,
        plate: req.patente.unwrap_or_default(),
        make: req.marca.unwrap_or_default(),
        model: req.modelo.unwrap_or_default(),
        mileage: req.kilometraje.unwrap_or_default(),
        oil_type: req.tipo_aceite.unwrap_or_default(),
        date: req.fecha.unwrap_or_default(),
    };
    let vehicles = state.services.vehicles.clone();
    let id = run_blocking(move || vehicles.create(vehicle)).await?;
    Ok((StatusCode::CREATED, Json(json!({"ok": true, "id": id}))))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    payload: Body<VehicleRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let id = req.id()?;
    let changes = VehicleChanges {
        plate: req.patente,
        make: req.marca,
        model: req.modelo,
        mileage: req.kilometraje,
        oil_type: req.tipo_aceite,
        date: req.fecha,
    };
    let vehicles = state.services.vehicles.clone();
    let vehicle = run_blocking(move || vehicles.update(id, &changes)).await?;
    Ok(Json(json!({"ok": true, "vehiculo": vehicle})))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    payload: Body<VehicleRequest>,
) -> Result<Json<Value>, ApiError> {
    let req = body(payload)?;
    let id = req.id()?;
    let creds = req.auth.credentials();
    let vehicles = state.services.vehicles.clone();
    run_blocking(move || vehicles.delete(id, &creds)).await?;
    Ok(ok())
}
