use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use entity::employees::{self, Model};
use platform_api::{ApiError, ApiResult};
use platform_db::DbPool;
use products_hr::{EmployeeDraft, EmployeeError, EmployeeService, OrmEmployeeStore};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub service: Arc<EmployeeService<OrmEmployeeStore>>,
    pub config: Arc<AppConfig>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "hr server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/{id}",
            get(get_employee_handler).put(update_employee_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeGender {
    Male,
    Female,
}

impl From<employees::Gender> for EmployeeGender {
    fn from(value: employees::Gender) -> Self {
        match value {
            employees::Gender::Male => EmployeeGender::Male,
            employees::Gender::Female => EmployeeGender::Female,
        }
    }
}

impl From<EmployeeGender> for employees::Gender {
    fn from(value: EmployeeGender) -> Self {
        match value {
            EmployeeGender::Male => employees::Gender::Male,
            EmployeeGender::Female => employees::Gender::Female,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeBody {
    pub name: String,
    pub age: i32,
    pub gender: EmployeeGender,
    pub salary: f64,
    #[serde(default)]
    pub active: bool,
}

impl From<EmployeeBody> for EmployeeDraft {
    fn from(body: EmployeeBody) -> Self {
        Self {
            name: body.name,
            age: body.age,
            gender: body.gender.into(),
            salary: body.salary,
            active: body.active,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: EmployeeGender,
    pub salary: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for EmployeePayload {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            age: model.age,
            gender: model.gender.into(),
            salary: model.salary,
            active: model.active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

async fn list_employees_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<EmployeePayload>>> {
    let records = state.service.list_all().await.map_err(employee_error)?;
    Ok(Json(
        records.into_iter().map(EmployeePayload::from).collect(),
    ))
}

async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<EmployeePayload>> {
    let record = state.service.find_by_id(id).await.map_err(employee_error)?;
    Ok(Json(record.into()))
}

async fn create_employee_handler(
    State(state): State<AppState>,
    Json(body): Json<EmployeeBody>,
) -> ApiResult<(StatusCode, Json<EmployeePayload>)> {
    let record = state
        .service
        .create(body.into())
        .await
        .map_err(employee_error)?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<EmployeeBody>,
) -> ApiResult<Json<EmployeePayload>> {
    let record = state
        .service
        .update(id, body.into())
        .await
        .map_err(employee_error)?;
    Ok(Json(record.into()))
}

/// Status-code translation for the core error taxonomy lives here, not in
/// the service.
fn employee_error(err: EmployeeError) -> ApiError {
    match err {
        EmployeeError::AgeNotValid(_) | EmployeeError::SalaryNotValid { .. } => {
            ApiError::InvalidInput(err.to_string())
        }
        EmployeeError::EmployeeInactive(_) => ApiError::Conflict(err.to_string()),
        EmployeeError::NotFound(_) => ApiError::NotFound,
        EmployeeError::Store(source) => ApiError::internal(source),
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.pool.ping().await.is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
