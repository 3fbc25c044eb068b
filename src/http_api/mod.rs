use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AllocationQuery, AllocationStatus, AllocationStore, NewAllocation, ResourceAllocation,
    ResourceType, ScheduleReport, SchedulingConfig, StoreError, WeekWindow,
};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn AllocationStore>,
    config: Arc<SchedulingConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn AllocationStore>, config: SchedulingConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    fn store(&self) -> Arc<dyn AllocationStore> {
        self.store.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(_) => ApiError::NotFound(value.to_string()),
            StoreError::Duplicate(_) | StoreError::InvalidTransition { .. } => {
                ApiError::Conflict(value.to_string())
            }
            StoreError::Invalid(_) => ApiError::Invalid(value.to_string()),
            StoreError::Serialization(_) | StoreError::Backend(_) => {
                tracing::error!(error = %value, "allocation store failure");
                ApiError::Internal(value.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListParams {
    project_id: Option<String>,
    resource_id: Option<String>,
    resource_type: Option<ResourceType>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl From<ListParams> for AllocationQuery {
    fn from(params: ListParams) -> Self {
        AllocationQuery {
            project_id: params.project_id,
            resource_id: params.resource_id,
            resource_type: params.resource_type,
            from: params.from,
            to: params.to,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    status: AllocationStatus,
}

#[derive(Debug, Deserialize)]
struct WeekParams {
    date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct WeekBody {
    window: WeekWindow,
    days: Vec<NaiveDate>,
    previous: NaiveDate,
    next: NaiveDate,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/allocations", get(list_allocations).post(create_allocation))
        .route("/allocations/:id", get(get_allocation))
        .route("/allocations/:id/status", put(update_status))
        .route("/report", get(report))
        .route("/week", get(week))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_allocations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ResourceAllocation>>, ApiError> {
    let query = AllocationQuery::from(params);
    let allocations = state.store().list_allocations(&query)?;
    Ok(Json(allocations))
}

async fn get_allocation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResourceAllocation>, ApiError> {
    match state.store().get_allocation(&id)? {
        Some(allocation) => Ok(Json(allocation)),
        None => Err(ApiError::not_found(format!("allocation {id} not found"))),
    }
}

async fn create_allocation(
    State(state): State<AppState>,
    Json(payload): Json<NewAllocation>,
) -> Result<(StatusCode, Json<ResourceAllocation>), ApiError> {
    let created = state.store().create_allocation(payload)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<ResourceAllocation>, ApiError> {
    let updated = state
        .store()
        .update_allocation_status(&id, payload.status)?;
    Ok(Json(updated))
}

async fn report(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ScheduleReport>, ApiError> {
    let query = AllocationQuery::from(params);
    let snapshot = state.store().list_allocations(&query)?;
    Ok(Json(ScheduleReport::build(&snapshot, &state.config)))
}

async fn week(
    State(state): State<AppState>,
    Query(params): Query<WeekParams>,
) -> Result<Json<WeekBody>, ApiError> {
    let date = params
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let navigator = state.config.week_navigator();
    let out_of_range = || ApiError::invalid(format!("week around {date} is out of range"));
    let window = navigator.window(date).ok_or_else(out_of_range)?;
    Ok(Json(WeekBody {
        window,
        days: window.days(),
        previous: navigator.previous_week(date).ok_or_else(out_of_range)?,
        next: navigator.next_week(date).ok_or_else(out_of_range)?,
    }))
}
