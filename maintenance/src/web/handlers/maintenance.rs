// Maintenance window endpoints
//
// Routes are mounted under `/api` (see `web::server`). Window summaries carry
// `status` (`pending|running|finished|cancelled`) next to id, start, end and items.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use super::common::{error_response, parse_body, response_message, ApiResult};
use crate::errors::MaintenanceError;
use crate::window::{MaintenanceRequest, UpdateRequest, WindowSummary};
use crate::web::AppState;

fn reject(err: MaintenanceError) -> (StatusCode, Json<Value>) {
    match &err {
        MaintenanceError::Storage { .. } | MaintenanceError::Other(_) => {
            error!("Maintenance request failed: {}", err)
        }
        _ => info!("Maintenance request rejected: {}", err),
    }
    error_response(&err)
}

/// Create a maintenance window
pub async fn create_maintenance(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let request: MaintenanceRequest = parse_body(payload).map_err(reject)?;

    let id = state
        .maintenance_service
        .create(&request)
        .await
        .map_err(reject)?;

    Ok((StatusCode::CREATED, Json(json!({ "mw_id": id }))))
}

/// List all maintenance windows in creation order.
///
/// Each entry is `{id, start, end, items, status}`.
pub async fn list_maintenance(State(state): State<AppState>) -> ApiResult<Vec<WindowSummary>> {
    let windows = state.maintenance_service.list().await;
    Ok((StatusCode::OK, Json(windows)))
}

/// Get one maintenance window as `{id, start, end, items, status}`
pub async fn get_maintenance(
    Path(mw_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<WindowSummary> {
    let window = state
        .maintenance_service
        .get(&mw_id)
        .await
        .map_err(reject)?;

    Ok((StatusCode::OK, Json(window)))
}

/// Update a pending maintenance window
pub async fn update_maintenance(
    Path(mw_id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let changes: UpdateRequest = parse_body(payload).map_err(reject)?;

    state
        .maintenance_service
        .update(&mw_id, &changes)
        .await
        .map_err(reject)?;

    Ok((
        StatusCode::OK,
        response_message(format!("Maintenance {} updated", mw_id)),
    ))
}

/// Remove a maintenance window
pub async fn remove_maintenance(
    Path(mw_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Value> {
    state
        .maintenance_service
        .remove(&mw_id)
        .await
        .map_err(reject)?;

    Ok((
        StatusCode::OK,
        response_message(format!("Maintenance with id {} successfully removed", mw_id)),
    ))
}

/// Finish a running maintenance window now
pub async fn end_maintenance(
    Path(mw_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Value> {
    state
        .maintenance_service
        .end(&mw_id)
        .await
        .map_err(reject)?;

    Ok((
        StatusCode::OK,
        response_message(format!("Maintenance window {} finished.", mw_id)),
    ))
}
