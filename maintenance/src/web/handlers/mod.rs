//! HTTP request handlers for the maintenance API.
//!
//! - `common` - Error mapping and response helpers
//! - `maintenance` - Window create, query, update, remove and end endpoints

pub mod common;
pub mod maintenance;

pub use maintenance::*;
