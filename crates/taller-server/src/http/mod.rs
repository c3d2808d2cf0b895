//! Router and shared request plumbing

mod de;
mod error;
mod handlers;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tracing::{info, Instrument};

use taller_app::Services;
use taller_types::Error;

pub use error::ApiError;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self { services }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::auth::health))
        .route("/login", post(handlers::auth::login))
        .route("/register-user", post(handlers::auth::register_user))
        .route("/api/usuarios", get(handlers::auth::list_users))
        .route("/admin/authenticate", post(handlers::auth::admin_authenticate))
        .route("/admin/list", post(handlers::auth::admin_list))
        .route("/admin/create", post(handlers::auth::admin_create))
        .route("/admin/update", post(handlers::auth::admin_update))
        .route("/admin/delete", post(handlers::auth::admin_delete))
        .route("/clientes-todos", get(handlers::clients::list))
        .route("/buscar-clientes", get(handlers::clients::search))
        .route("/contar-por-apellido", get(handlers::clients::count_by_surname))
        .route("/crear-cliente", post(handlers::clients::create))
        .route("/actualizar-cliente", post(handlers::clients::update))
        .route("/borrar-cliente", post(handlers::clients::delete))
        .route("/vehiculos-todos", get(handlers::vehicles::list))
        .route("/buscar-vehiculos", get(handlers::vehicles::search))
        .route("/historial-vehiculo", get(handlers::vehicles::history))
        .route("/vehiculos/next-id", get(handlers::vehicles::next_id))
        .route("/vehiculos/crear", post(handlers::vehicles::create))
        .route("/vehiculos/actualizar", post(handlers::vehicles::update))
        .route("/vehiculos/borrar", post(handlers::vehicles::delete))
        .route("/api/mensajes/enviar", post(handlers::messages::send))
        .route("/api/mensajes/recibidos", post(handlers::messages::inbox))
        .route("/api/mensajes/enviados", post(handlers::messages::sent))
        .route("/api/mensajes/marcar-leido", post(handlers::messages::mark_read))
        .route("/api/mensajes/eliminar", post(handlers::messages::delete))
        .route("/api/existencia", get(handlers::quotes::stock))
        .route("/api/repuestos", get(handlers::quotes::search))
        .route("/api/aceites", get(handlers::quotes::oils))
        .route("/api/complementos", get(handlers::quotes::accessories))
        .route("/api/presupuesto", post(handlers::quotes::quote))
        .route("/api/filtros", get(handlers::filters::selection))
        .route("/api/filtros/marcas", get(handlers::filters::makes))
        .route("/api/filtros/modelos", get(handlers::filters::models))
        .route("/api/filtros/motores", get(handlers::filters::engines))
        .fallback(unknown_route)
        .layer(middleware::from_fn(cors))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

async fn unknown_route() -> ApiError {
    ApiError::from(Error::not_found("Ruta no encontrada"))
}

/// Run synchronous file work on the blocking pool
///
/// A panic inside `work` becomes an internal error for this request only.
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> taller_types::Result<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Task(e.to_string()))?;
    Ok(result?)
}

async fn trace_request(req: Request, next: Next) -> Response {
    let span = tracing::info_span!("request", method = %req.method(), path = %req.uri().path());
    async move {
        let response = next.run(req).await;
        info!(status = response.status().as_u16(), "request handled");
        response
    }
    .instrument(span)
    .await
}

async fn cors(req: Request, next: Next) -> Response {
    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(req).await
    };
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
