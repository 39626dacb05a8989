//! Common test data used across integration tests

use chrono::{DateTime, Duration, Utc};
use maintenance::window::format_timestamp;
use serde_json::{json, Value};

pub mod switches {
    pub const SWITCH_1: &str = "00:00:00:00:00:00:00:01";
    pub const SWITCH_2: &str = "00:00:00:00:00:00:00:02";
    pub const SWITCH_3: &str = "00:00:00:00:00:00:00:03";
    pub const UNKNOWN: &str = "00:00:00:00:00:00:02";
}

pub mod interfaces {
    pub const SWITCH_1_PORT_1: &str = "00:00:00:00:00:00:00:01:1";
    pub const SWITCH_1_PORT_2: &str = "00:00:00:00:00:00:00:01:2";
    pub const SWITCH_3_PORT_3: &str = "00:00:00:00:00:00:00:03:3";
    pub const UNKNOWN: &str = "00:00:00:00:00:00:00:03:9";
}

pub mod messages {
    pub const INVALID_ITEMS: &str = "One or more items are invalid";
    pub const NO_ITEMS: &str = "At least one item must be provided";
    pub const START_IN_PAST: &str = "Start in the past not allowed";
    pub const END_BEFORE_START: &str = "End before start not allowed";
}

/// Fixed-format UTC timestamp `offset` from now
pub fn timestamp_in(offset: Duration) -> String {
    format_timestamp(Utc::now() + offset, chrono_tz::UTC)
}

pub fn at(offset: Duration) -> DateTime<Utc> {
    Utc::now() + offset
}

pub fn request_body(start: &str, end: &str, items: Vec<Value>) -> Value {
    json!({
        "start": start,
        "end": end,
        "items": items,
    })
}

pub fn vlan_item(interface_id: &str, value: i64) -> Value {
    json!({
        "interface_id": interface_id,
        "tag": {"tag_type": "VLAN", "value": value}
    })
}
