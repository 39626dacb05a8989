//! Custom error types for the maintenance scheduler
//!
//! Validation failures carry the exact reason string shown to API callers;
//! everything else is wrapped in `MaintenanceError` with enough context to log.

use std::fmt;

use crate::constants::messages;

/// Main error type for window operations
#[derive(Debug)]
pub enum MaintenanceError {
    /// Candidate window rejected before any state change
    Validation(ValidationError),

    /// No window with this id is registered
    NotFound { id: String },

    /// Operation not allowed in the window's current status
    InvalidState {
        id: String,
        status: String,
        action: String,
    },

    /// Persisting the window failed
    Storage { reason: String },

    /// Other errors with context
    Other(String),
}

/// Reasons a candidate window is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more item descriptors did not resolve
    InvalidItems(Vec<InvalidItem>),

    /// Item list is empty
    NoItems,

    /// Request body is missing fields or has the wrong shape
    MalformedRequest { reason: String },

    /// Timestamp does not match the fixed format or does not exist locally
    InvalidTimestamp { field: String, value: String },

    /// Start lies strictly before the current instant
    StartInPast,

    /// End is not strictly after start
    EndBeforeStart,
}

/// Why a single item descriptor failed to resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidItem {
    /// Bare id names neither a switch nor an interface
    UnknownElement { id: String },

    /// Structured descriptor names an interface that does not exist
    UnknownInterface { interface_id: String },

    /// Tag type is not supported
    UnknownTagType { tag_type: String },

    /// Tag value is out of range for its type
    TagOutOfRange { tag_type: String, value: i64 },

    /// Descriptor is neither a string nor an interface object
    Malformed { reason: String },
}

impl MaintenanceError {
    pub fn not_found(id: &str) -> Self {
        MaintenanceError::NotFound { id: id.to_string() }
    }
}

impl fmt::Display for MaintenanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceError::Validation(e) => write!(f, "{}", e),
            MaintenanceError::NotFound { id } => {
                write!(f, "Maintenance with id {} not found", id)
            }
            MaintenanceError::InvalidState { id, status, action } => {
                write!(
                    f,
                    "Maintenance with id {} is {}, {} not allowed",
                    id, status, action
                )
            }
            MaintenanceError::Storage { reason } => {
                write!(f, "Failed to store maintenance window: {}", reason)
            }
            MaintenanceError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidItems(_) => write!(f, "{}", messages::INVALID_ITEMS),
            ValidationError::NoItems => write!(f, "{}", messages::NO_ITEMS),
            ValidationError::MalformedRequest { reason } => {
                write!(f, "Invalid maintenance request: {}", reason)
            }
            ValidationError::InvalidTimestamp { field, value } => {
                write!(
                    f,
                    "Invalid {} time '{}', expected format YYYY-MM-DDTHH:MM:SS",
                    field, value
                )
            }
            ValidationError::StartInPast => write!(f, "{}", messages::START_IN_PAST),
            ValidationError::EndBeforeStart => write!(f, "{}", messages::END_BEFORE_START),
        }
    }
}

impl fmt::Display for InvalidItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidItem::UnknownElement { id } => {
                write!(f, "'{}' is neither a known switch nor interface", id)
            }
            InvalidItem::UnknownInterface { interface_id } => {
                write!(f, "Interface '{}' not found", interface_id)
            }
            InvalidItem::UnknownTagType { tag_type } => {
                write!(f, "Unsupported tag type '{}'", tag_type)
            }
            InvalidItem::TagOutOfRange { tag_type, value } => {
                write!(f, "Tag value {} out of range for {}", value, tag_type)
            }
            InvalidItem::Malformed { reason } => write!(f, "Malformed item: {}", reason),
        }
    }
}

impl std::error::Error for MaintenanceError {}
impl std::error::Error for ValidationError {}
impl std::error::Error for InvalidItem {}

impl From<anyhow::Error> for MaintenanceError {
    fn from(err: anyhow::Error) -> Self {
        MaintenanceError::Other(err.to_string())
    }
}

impl From<ValidationError> for MaintenanceError {
    fn from(err: ValidationError) -> Self {
        MaintenanceError::Validation(err)
    }
}
