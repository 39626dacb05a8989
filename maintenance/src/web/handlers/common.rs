// Common types and utilities for API handlers

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::errors::{MaintenanceError, ValidationError};

// Success carries its own status; errors are a status plus JSON body
pub type ApiResult<T> = Result<(StatusCode, Json<T>), (StatusCode, Json<Value>)>;

/// `{"response": <message>}`
pub fn response_message(message: impl Into<String>) -> Json<Value> {
    Json(json!({ "response": message.into() }))
}

/// Validation reasons go out as a bare JSON string, everything else wrapped
/// in a `response` object.
pub fn error_response(err: &MaintenanceError) -> (StatusCode, Json<Value>) {
    match err {
        MaintenanceError::Validation(e) => {
            (StatusCode::BAD_REQUEST, Json(Value::String(e.to_string())))
        }
        MaintenanceError::NotFound { .. } => {
            (StatusCode::NOT_FOUND, response_message(err.to_string()))
        }
        MaintenanceError::InvalidState { .. } => {
            (StatusCode::BAD_REQUEST, response_message(err.to_string()))
        }
        MaintenanceError::Storage { .. } | MaintenanceError::Other(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            response_message(err.to_string()),
        ),
    }
}

/// Turns an extracted JSON body into a typed request, mapping every failure
/// to a 400-class validation error.
pub fn parse_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<T, MaintenanceError> {
    let Json(value) = payload.map_err(|e| ValidationError::MalformedRequest {
        reason: e.body_text(),
    })?;

    serde_json::from_value(value).map_err(|e| {
        ValidationError::MalformedRequest {
            reason: e.to_string(),
        }
        .into()
    })
}
